//! Name-keyed registry owning every live container
//!
//! One map per container kind; a name is unique within its kind but may be
//! reused across kinds. Maps are ordered so listings and the persisted file
//! come out in a stable order.

use crate::config::ContainerConfig;
use crate::containers::{Array, CompleteBinaryTree, DoublyList, Queue, SinglyList, Stack};
use crate::error::{DsdbError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The six container kinds a [`Store`] holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContainerKind {
    /// [`Array`]
    Array,
    /// [`SinglyList`]
    SinglyList,
    /// [`DoublyList`]
    DoublyList,
    /// [`Stack`]
    Stack,
    /// [`Queue`]
    Queue,
    /// [`CompleteBinaryTree`]
    Tree,
}

impl ContainerKind {
    /// All kinds, in probe and persistence order
    pub const ALL: [ContainerKind; 6] = [
        ContainerKind::Array,
        ContainerKind::SinglyList,
        ContainerKind::DoublyList,
        ContainerKind::Stack,
        ContainerKind::Queue,
        ContainerKind::Tree,
    ];

    /// Tag written at the start of each database line
    pub fn tag(self) -> &'static str {
        match self {
            Self::Array => "ARRAY",
            Self::SinglyList => "SINGLY_LIST",
            Self::DoublyList => "DOUBLY_LIST",
            Self::Stack => "STACK",
            Self::Queue => "QUEUE",
            Self::Tree => "TREE",
        }
    }

    /// Human-readable name used in messages
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Array => "Array",
            Self::SinglyList => "Singly list",
            Self::DoublyList => "Doubly list",
            Self::Stack => "Stack",
            Self::Queue => "Queue",
            Self::Tree => "Tree",
        }
    }

    /// Look a kind up by its database tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ContainerKind {
    type Err = DsdbError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tag(&s.to_ascii_uppercase())
            .ok_or_else(|| DsdbError::invalid_argument(format!("unknown container kind '{}'", s)))
    }
}

/// Registry of named containers
///
/// # Examples
///
/// ```rust
/// use dsdb::{ContainerKind, Store};
///
/// let mut store = Store::new();
/// store.create_array("a")?.push_back("x");
/// store.create_stack("a")?.push("1");
/// assert_eq!(store.kinds_of("a"), vec![ContainerKind::Array, ContainerKind::Stack]);
/// assert_eq!(store.size_of("a")?, 1);
/// assert!(store.create_array("a").is_err());
/// # Ok::<(), dsdb::DsdbError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Store {
    config: ContainerConfig,
    arrays: BTreeMap<String, Array>,
    singly_lists: BTreeMap<String, SinglyList>,
    doubly_lists: BTreeMap<String, DoublyList>,
    stacks: BTreeMap<String, Stack>,
    queues: BTreeMap<String, Queue>,
    trees: BTreeMap<String, CompleteBinaryTree>,
}

/// Typed lookup, mutable lookup and replace-insert for one registry
macro_rules! registry_accessors {
    ($field:ident, $ty:ty, $kind:expr, $get:ident, $get_mut:ident, $put:ident) => {
        #[doc = concat!("Borrow the `", stringify!($ty), "` named `name`")]
        pub fn $get(&self, name: &str) -> Result<&$ty> {
            self.$field.get(name).ok_or_else(|| not_found($kind, name))
        }

        #[doc = concat!("Mutably borrow the `", stringify!($ty), "` named `name`")]
        pub fn $get_mut(&mut self, name: &str) -> Result<&mut $ty> {
            self.$field.get_mut(name).ok_or_else(|| not_found($kind, name))
        }

        #[doc = concat!("Insert a `", stringify!($ty), "`, returning the one it replaces")]
        pub fn $put<S: Into<String>>(&mut self, name: S, container: $ty) -> Option<$ty> {
            self.$field.insert(name.into(), container)
        }
    };
}

fn not_found(kind: ContainerKind, name: &str) -> DsdbError {
    DsdbError::not_found(format!("{} '{}'", kind.display_name(), name))
}

fn create_in<'a, T>(
    map: &'a mut BTreeMap<String, T>,
    kind: ContainerKind,
    name: &str,
    make: impl FnOnce() -> T,
) -> Result<&'a mut T> {
    use std::collections::btree_map::Entry;
    match map.entry(name.to_string()) {
        Entry::Occupied(_) => Err(DsdbError::already_exists(kind.display_name(), name)),
        Entry::Vacant(slot) => {
            log::debug!("created {} '{}'", kind.tag(), name);
            Ok(slot.insert(make()))
        }
    }
}

impl Store {
    /// Create an empty store with default container capacities
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store whose `create_*` calls use `config`
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Capacities used by `create_*`
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Create an empty array; fails if an array with this name exists
    pub fn create_array(&mut self, name: &str) -> Result<&mut Array> {
        let capacity = self.config.initial_capacity();
        create_in(&mut self.arrays, ContainerKind::Array, name, || Array::with_capacity(capacity))
    }

    /// Create an empty singly linked list
    pub fn create_singly_list(&mut self, name: &str) -> Result<&mut SinglyList> {
        create_in(&mut self.singly_lists, ContainerKind::SinglyList, name, SinglyList::new)
    }

    /// Create an empty doubly linked list
    pub fn create_doubly_list(&mut self, name: &str) -> Result<&mut DoublyList> {
        create_in(&mut self.doubly_lists, ContainerKind::DoublyList, name, DoublyList::new)
    }

    /// Create an empty stack
    pub fn create_stack(&mut self, name: &str) -> Result<&mut Stack> {
        let capacity = self.config.initial_capacity();
        create_in(&mut self.stacks, ContainerKind::Stack, name, || Stack::with_capacity(capacity))
    }

    /// Create an empty queue
    pub fn create_queue(&mut self, name: &str) -> Result<&mut Queue> {
        let capacity = self.config.initial_capacity();
        create_in(&mut self.queues, ContainerKind::Queue, name, || Queue::with_capacity(capacity))
    }

    /// Create an empty tree
    pub fn create_tree(&mut self, name: &str) -> Result<&mut CompleteBinaryTree> {
        create_in(&mut self.trees, ContainerKind::Tree, name, CompleteBinaryTree::new)
    }

    /// Create an empty container of `kind`
    pub fn create(&mut self, kind: ContainerKind, name: &str) -> Result<()> {
        match kind {
            ContainerKind::Array => self.create_array(name).map(|_| ()),
            ContainerKind::SinglyList => self.create_singly_list(name).map(|_| ()),
            ContainerKind::DoublyList => self.create_doubly_list(name).map(|_| ()),
            ContainerKind::Stack => self.create_stack(name).map(|_| ()),
            ContainerKind::Queue => self.create_queue(name).map(|_| ()),
            ContainerKind::Tree => self.create_tree(name).map(|_| ()),
        }
    }

    registry_accessors!(arrays, Array, ContainerKind::Array, array, array_mut, insert_array);
    registry_accessors!(singly_lists, SinglyList, ContainerKind::SinglyList, singly_list, singly_list_mut, insert_singly_list);
    registry_accessors!(doubly_lists, DoublyList, ContainerKind::DoublyList, doubly_list, doubly_list_mut, insert_doubly_list);
    registry_accessors!(stacks, Stack, ContainerKind::Stack, stack, stack_mut, insert_stack);
    registry_accessors!(queues, Queue, ContainerKind::Queue, queue, queue_mut, insert_queue);
    registry_accessors!(trees, CompleteBinaryTree, ContainerKind::Tree, tree, tree_mut, insert_tree);

    /// Check whether a container of `kind` is named `name`
    pub fn contains(&self, kind: ContainerKind, name: &str) -> bool {
        match kind {
            ContainerKind::Array => self.arrays.contains_key(name),
            ContainerKind::SinglyList => self.singly_lists.contains_key(name),
            ContainerKind::DoublyList => self.doubly_lists.contains_key(name),
            ContainerKind::Stack => self.stacks.contains_key(name),
            ContainerKind::Queue => self.queues.contains_key(name),
            ContainerKind::Tree => self.trees.contains_key(name),
        }
    }

    /// Remove a container; fails if none of `kind` has this name
    pub fn remove(&mut self, kind: ContainerKind, name: &str) -> Result<()> {
        let removed = match kind {
            ContainerKind::Array => self.arrays.remove(name).is_some(),
            ContainerKind::SinglyList => self.singly_lists.remove(name).is_some(),
            ContainerKind::DoublyList => self.doubly_lists.remove(name).is_some(),
            ContainerKind::Stack => self.stacks.remove(name).is_some(),
            ContainerKind::Queue => self.queues.remove(name).is_some(),
            ContainerKind::Tree => self.trees.remove(name).is_some(),
        };
        if removed {
            Ok(())
        } else {
            Err(not_found(kind, name))
        }
    }

    /// Every kind that has a container called `name`, in probe order
    pub fn kinds_of(&self, name: &str) -> Vec<ContainerKind> {
        ContainerKind::ALL
            .into_iter()
            .filter(|&kind| self.contains(kind, name))
            .collect()
    }

    fn first_kind(&self, name: &str) -> Result<ContainerKind> {
        ContainerKind::ALL
            .into_iter()
            .find(|&kind| self.contains(kind, name))
            .ok_or_else(|| DsdbError::not_found(format!("Container '{}'", name)))
    }

    /// Rendering of the first container called `name`, probing array,
    /// singly list, doubly list, stack, queue and tree in that order
    pub fn describe(&self, name: &str) -> Result<String> {
        Ok(match self.first_kind(name)? {
            ContainerKind::Array => self.array(name)?.to_string(),
            ContainerKind::SinglyList => self.singly_list(name)?.to_string(),
            ContainerKind::DoublyList => self.doubly_list(name)?.to_string(),
            ContainerKind::Stack => self.stack(name)?.to_string(),
            ContainerKind::Queue => self.queue(name)?.to_string(),
            ContainerKind::Tree => self.tree(name)?.to_string(),
        })
    }

    /// Element count of the first container called `name`, same probe order
    /// as [`describe`](Self::describe)
    pub fn size_of(&self, name: &str) -> Result<usize> {
        Ok(match self.first_kind(name)? {
            ContainerKind::Array => self.array(name)?.len(),
            ContainerKind::SinglyList => self.singly_list(name)?.len(),
            ContainerKind::DoublyList => self.doubly_list(name)?.len(),
            ContainerKind::Stack => self.stack(name)?.len(),
            ContainerKind::Queue => self.queue(name)?.len(),
            ContainerKind::Tree => self.tree(name)?.len(),
        })
    }

    /// Sorted names of the containers of `kind`
    pub fn names(&self, kind: ContainerKind) -> Vec<&str> {
        fn keys<T>(map: &BTreeMap<String, T>) -> Vec<&str> {
            map.keys().map(String::as_str).collect()
        }
        match kind {
            ContainerKind::Array => keys(&self.arrays),
            ContainerKind::SinglyList => keys(&self.singly_lists),
            ContainerKind::DoublyList => keys(&self.doubly_lists),
            ContainerKind::Stack => keys(&self.stacks),
            ContainerKind::Queue => keys(&self.queues),
            ContainerKind::Tree => keys(&self.trees),
        }
    }

    /// Total number of containers across all kinds
    pub fn len(&self) -> usize {
        self.arrays.len()
            + self.singly_lists.len()
            + self.doubly_lists.len()
            + self.stacks.len()
            + self.queues.len()
            + self.trees.len()
    }

    /// Check if the store holds no containers
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every container, keeping the configuration
    pub fn clear(&mut self) {
        self.arrays.clear();
        self.singly_lists.clear();
        self.doubly_lists.clear();
        self.stacks.clear();
        self.queues.clear();
        self.trees.clear();
    }

    pub(crate) fn arrays(&self) -> impl Iterator<Item = (&str, &Array)> {
        self.arrays.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn singly_lists(&self) -> impl Iterator<Item = (&str, &SinglyList)> {
        self.singly_lists.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn doubly_lists(&self) -> impl Iterator<Item = (&str, &DoublyList)> {
        self.doubly_lists.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn stacks(&self) -> impl Iterator<Item = (&str, &Stack)> {
        self.stacks.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn queues(&self) -> impl Iterator<Item = (&str, &Queue)> {
        self.queues.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn trees(&self) -> impl Iterator<Item = (&str, &CompleteBinaryTree)> {
        self.trees.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Stores compare by contents; capacities and configuration are ignored.
impl PartialEq for Store {
    fn eq(&self, other: &Self) -> bool {
        self.arrays == other.arrays
            && self.singly_lists == other.singly_lists
            && self.doubly_lists == other.doubly_lists
            && self.stacks == other.stacks
            && self.queues == other.queues
            && self.trees == other.trees
    }
}

impl Eq for Store {}
