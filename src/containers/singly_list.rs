//! Singly-linked list of strings
//!
//! Nodes live in an index arena; `u32` slot indices stand in for links and
//! [`INVALID_NODE`] marks the end of the chain. Freed slots are recycled.
//!
//! There is no backward link, so [`SinglyList::pop_back`] and
//! [`SinglyList::remove_before`] walk the chain from the head: O(n), unlike
//! the O(1) counterparts on [`DoublyList`](super::DoublyList).

use super::{NodeId, INVALID_NODE};
use std::fmt;

#[derive(Debug, Clone)]
struct Node {
    value: String,
    next: u32,
}

/// Singly-linked list with head and tail tracking
///
/// # Examples
///
/// ```rust
/// use dsdb::SinglyList;
///
/// let mut list = SinglyList::new();
/// list.push_back("b");
/// list.push_front("a");
/// assert!(list.insert_after("b", "c"));
/// assert_eq!(list.to_vec(), vec!["a", "b", "c"]);
/// ```
#[derive(Clone)]
pub struct SinglyList {
    slots: Vec<Option<Node>>,
    free: Vec<u32>,
    head: u32,
    tail: u32,
    len: usize,
}

impl SinglyList {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: INVALID_NODE,
            tail: INVALID_NODE,
            len: 0,
        }
    }

    /// Number of reachable nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn node(&self, idx: u32) -> &Node {
        match self.slots.get(idx as usize) {
            Some(Some(node)) => node,
            _ => unreachable!("dangling list link {}", idx),
        }
    }

    fn node_mut(&mut self, idx: u32) -> &mut Node {
        match self.slots.get_mut(idx as usize) {
            Some(Some(node)) => node,
            _ => unreachable!("dangling list link {}", idx),
        }
    }

    fn allocate(&mut self, value: String, next: u32) -> u32 {
        let node = Node { value, next };
        self.len += 1;
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx as usize] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                (self.slots.len() - 1) as u32
            }
        }
    }

    fn release(&mut self, idx: u32) -> Node {
        let node = self.slots[idx as usize].take();
        self.free.push(idx);
        self.len -= 1;
        match node {
            Some(node) => node,
            None => unreachable!("double release of list node {}", idx),
        }
    }

    /// First node holding `value`, with its predecessor (or `INVALID_NODE`)
    fn locate(&self, value: &str) -> Option<(u32, u32)> {
        let mut prev = INVALID_NODE;
        let mut cur = self.head;
        while cur != INVALID_NODE {
            let node = self.node(cur);
            if node.value == value {
                return Some((prev, cur));
            }
            prev = cur;
            cur = node.next;
        }
        None
    }

    /// Unlink `idx`, whose predecessor is `prev`
    fn unlink(&mut self, prev: u32, idx: u32) -> String {
        let next = self.node(idx).next;
        if prev == INVALID_NODE {
            self.head = next;
        } else {
            self.node_mut(prev).next = next;
        }
        if self.tail == idx {
            self.tail = prev;
        }
        self.release(idx).value
    }

    /// Prepend a value
    pub fn push_front<S: Into<String>>(&mut self, value: S) {
        let idx = self.allocate(value.into(), self.head);
        self.head = idx;
        if self.tail == INVALID_NODE {
            self.tail = idx;
        }
    }

    /// Append a value
    pub fn push_back<S: Into<String>>(&mut self, value: S) {
        let idx = self.allocate(value.into(), INVALID_NODE);
        if self.tail == INVALID_NODE {
            self.head = idx;
        } else {
            self.node_mut(self.tail).next = idx;
        }
        self.tail = idx;
    }

    /// Insert `value` directly before the first node equal to `target`
    pub fn insert_before<S: Into<String>>(&mut self, target: &str, value: S) -> bool {
        let Some((prev, cur)) = self.locate(target) else {
            return false;
        };
        if prev == INVALID_NODE {
            self.push_front(value);
        } else {
            let idx = self.allocate(value.into(), cur);
            self.node_mut(prev).next = idx;
        }
        true
    }

    /// Insert `value` directly after the first node equal to `target`
    pub fn insert_after<S: Into<String>>(&mut self, target: &str, value: S) -> bool {
        let Some((_, cur)) = self.locate(target) else {
            return false;
        };
        let next = self.node(cur).next;
        let idx = self.allocate(value.into(), next);
        self.node_mut(cur).next = idx;
        if self.tail == cur {
            self.tail = idx;
        }
        true
    }

    /// Remove the head node
    pub fn pop_front(&mut self) -> bool {
        if self.head == INVALID_NODE {
            return false;
        }
        self.unlink(INVALID_NODE, self.head);
        true
    }

    /// Remove the tail node
    ///
    /// Walks from the head to find the new tail.
    pub fn pop_back(&mut self) -> bool {
        if self.tail == INVALID_NODE {
            return false;
        }
        let mut prev = INVALID_NODE;
        let mut cur = self.head;
        while cur != self.tail {
            prev = cur;
            cur = self.node(cur).next;
        }
        self.unlink(prev, cur);
        true
    }

    /// Remove the first node equal to `value`
    pub fn remove_value(&mut self, value: &str) -> bool {
        match self.locate(value) {
            Some((prev, cur)) => {
                self.unlink(prev, cur);
                true
            }
            None => false,
        }
    }

    /// Remove the node directly before the first node equal to `target`
    ///
    /// Fails when `target` is absent or is the head.
    pub fn remove_before(&mut self, target: &str) -> bool {
        let mut prev_prev = INVALID_NODE;
        let mut prev = INVALID_NODE;
        let mut cur = self.head;
        while cur != INVALID_NODE {
            let node = self.node(cur);
            if node.value == target {
                if prev == INVALID_NODE {
                    return false;
                }
                self.unlink(prev_prev, prev);
                return true;
            }
            prev_prev = prev;
            prev = cur;
            cur = node.next;
        }
        false
    }

    /// Remove the node directly after the first node equal to `target`
    ///
    /// Fails when `target` is absent or is the tail.
    pub fn remove_after(&mut self, target: &str) -> bool {
        let Some((_, cur)) = self.locate(target) else {
            return false;
        };
        let next = self.node(cur).next;
        if next == INVALID_NODE {
            return false;
        }
        self.unlink(cur, next);
        true
    }

    /// Handle of the first node equal to `value`
    pub fn find(&self, value: &str) -> Option<NodeId> {
        self.locate(value).map(|(_, cur)| NodeId(cur))
    }

    /// Value stored at a node handle
    ///
    /// Handles stay valid until their node is removed.
    pub fn value(&self, id: NodeId) -> Option<&str> {
        match self.slots.get(id.0 as usize) {
            Some(Some(node)) => Some(node.value.as_str()),
            _ => None,
        }
    }

    /// Successor of a node
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        match self.slots.get(id.0 as usize) {
            Some(Some(node)) if node.next != INVALID_NODE => Some(NodeId(node.next)),
            _ => None,
        }
    }

    /// Head value
    pub fn front(&self) -> Option<&str> {
        (self.head != INVALID_NODE).then(|| self.node(self.head).value.as_str())
    }

    /// Tail value
    pub fn back(&self) -> Option<&str> {
        (self.tail != INVALID_NODE).then(|| self.node(self.tail).value.as_str())
    }

    /// Remove every node
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = INVALID_NODE;
        self.tail = INVALID_NODE;
        self.len = 0;
    }

    /// Iterate head to tail
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cur: self.head,
        }
    }

    /// Values tail to head
    ///
    /// Built iteratively from a forward pass; list length is unbounded so no
    /// recursion is used.
    pub fn to_vec_rev(&self) -> Vec<&str> {
        let mut values: Vec<&str> = self.iter().collect();
        values.reverse();
        values
    }

    /// Copy the values head to tail into a `Vec`
    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_owned).collect()
    }

    /// Backward rendering, `tail <- ... <- head`
    pub fn backward(&self) -> String {
        format!("SINGLY LIST BACKWARD: {}", self.to_vec_rev().join(" <- "))
    }
}

/// Forward iterator over a [`SinglyList`]
pub struct Iter<'a> {
    list: &'a SinglyList,
    cur: u32,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cur == INVALID_NODE {
            return None;
        }
        let node = self.list.node(self.cur);
        self.cur = node.next;
        Some(node.value.as_str())
    }
}

impl Default for SinglyList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SinglyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for SinglyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SINGLY LIST: ")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for SinglyList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = SinglyList::new();
        for value in iter {
            list.push_back(value);
        }
        list
    }
}

impl PartialEq for SinglyList {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for SinglyList {}
