//! The six container types held by a [`Store`](crate::store::Store)
//!
//! ## Sequences
//!
//! - **`Array`** - growable array with index access, doubling/halving capacity
//! - **`SinglyList`** - forward-linked list over an index arena
//! - **`DoublyList`** - forward- and backward-linked list over an index arena
//! - **`Stack`** - LIFO over a growable buffer
//! - **`Queue`** - FIFO over a circular growable buffer
//!
//! ## Trees
//!
//! - **`CompleteBinaryTree`** - integer-keyed tree filled breadth-first, with
//!   pre/in/post/level-order traversal

pub mod array;
pub mod doubly_list;
pub mod queue;
pub mod singly_list;
pub mod stack;
pub mod tree;

pub use array::Array;
pub use doubly_list::DoublyList;
pub use queue::Queue;
pub use singly_list::SinglyList;
pub use stack::Stack;
pub use tree::{CompleteBinaryTree, Traversal, TraversalOrder};

/// End-of-chain marker for arena links
pub(crate) const INVALID_NODE: u32 = u32::MAX;

/// Handle to a node of a [`SinglyList`] or [`DoublyList`]
///
/// Valid until the node it names is removed; the slot may later be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);
