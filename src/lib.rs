//! # dsdb: Classic Data Structures Behind a Text Shell
//!
//! This crate provides six classic containers, a registry that owns them by
//! name, a flat text format that persists the whole registry, and a small
//! command language to drive it all interactively.
//!
//! ## Key Features
//!
//! - **Array**: growable string array with doubling growth and quarter-full shrinking
//! - **Linked Lists**: singly and doubly linked lists over index arenas with
//!   value-relative insert and remove
//! - **Stack / Queue**: LIFO and circular FIFO buffers that grow by doubling
//! - **Complete Binary Tree**: integer keys filled breadth-first, with pre-,
//!   in-, post- and level-order traversal
//! - **Store**: one name-keyed map per container kind
//! - **Codec**: one-line-per-container text format that round-trips every kind
//! - **Shell**: `MPUSH`/`FDEL`/`TTRAVERSE`-style commands with autosave
//!
//! ## Quick Start
//!
//! ```rust
//! use dsdb::{codec, Store, TraversalOrder};
//!
//! let mut store = Store::new();
//!
//! let array = store.create_array("a")?;
//! array.push_back("x");
//! array.push_back("y");
//! assert_eq!(array.get(1), Some("y"));
//!
//! let stack = store.create_stack("s")?;
//! stack.push("1");
//! stack.push("2");
//! assert_eq!(stack.pop().as_deref(), Some("2"));
//!
//! let tree = store.create_tree("t")?;
//! for key in [10, 20, 30] {
//!     tree.insert(key, format!("v{}", key));
//! }
//! assert_eq!(
//!     tree.render(TraversalOrder::LevelOrder),
//!     "LEVEL ORDER: (10: v10) (20: v20) (30: v30)"
//! );
//!
//! // Persist and restore
//! let text = codec::encode(&store)?;
//! let (restored, report) = codec::decode(&text);
//! assert_eq!(report.skipped, 0);
//! assert_eq!(restored, store);
//! # Ok::<(), dsdb::DsdbError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod config;
pub mod containers;
pub mod error;
pub mod shell;
pub mod store;

// Re-export core types
pub use codec::LoadReport;
pub use containers::{
    Array, CompleteBinaryTree, DoublyList, NodeId, Queue, SinglyList, Stack, Traversal, TraversalOrder,
};
pub use error::{DsdbError, Result};
pub use shell::{Command, Session};
pub use store::{ContainerKind, Store};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library (currently only logs the version)
pub fn init() {
    log::debug!("Initializing dsdb v{}", VERSION);
}
