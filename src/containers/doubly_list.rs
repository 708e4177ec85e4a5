//! Doubly-linked list of strings
//!
//! Same index arena as [`SinglyList`](super::SinglyList), with a backward
//! link per node. Every mutation keeps `next.prev == node` and
//! `prev.next == node` for interior nodes; tail operations are O(1).

use super::{NodeId, INVALID_NODE};
use std::fmt;

#[derive(Debug, Clone)]
struct Node {
    value: String,
    prev: u32,
    next: u32,
}

/// Doubly-linked list with head and tail tracking
#[derive(Clone)]
pub struct DoublyList {
    slots: Vec<Option<Node>>,
    free: Vec<u32>,
    head: u32,
    tail: u32,
    len: usize,
}

impl DoublyList {
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

    fn allocate(&mut self, value: String, prev: u32, next: u32) -> u32 {
        let node = Node { value, prev, next };
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

    fn locate(&self, value: &str) -> Option<u32> {
        let mut cur = self.head;
        while cur != INVALID_NODE {
            let node = self.node(cur);
            if node.value == value {
                return Some(cur);
            }
            cur = node.next;
        }
        None
    }

    /// Link a new node between `prev` and `next` (either may be `INVALID_NODE`)
    fn link_between(&mut self, prev: u32, next: u32, value: String) -> u32 {
        let idx = self.allocate(value, prev, next);
        if prev == INVALID_NODE {
            self.head = idx;
        } else {
            self.node_mut(prev).next = idx;
        }
        if next == INVALID_NODE {
            self.tail = idx;
        } else {
            self.node_mut(next).prev = idx;
        }
        idx
    }

    fn unlink(&mut self, idx: u32) -> String {
        let (prev, next) = {
            let node = self.node(idx);
            (node.prev, node.next)
        };
        if prev == INVALID_NODE {
            self.head = next;
        } else {
            self.node_mut(prev).next = next;
        }
        if next == INVALID_NODE {
            self.tail = prev;
        } else {
            self.node_mut(next).prev = prev;
        }

        self.free.push(idx);
        self.len -= 1;
        match self.slots[idx as usize].take() {
            Some(node) => node.value,
            None => unreachable!("double release of list node {}", idx),
        }
    }

    /// Prepend a value
    pub fn push_front<S: Into<String>>(&mut self, value: S) {
        self.link_between(INVALID_NODE, self.head, value.into());
    }

    /// Append a value
    pub fn push_back<S: Into<String>>(&mut self, value: S) {
        self.link_between(self.tail, INVALID_NODE, value.into());
    }

    /// Insert `value` directly before the first node equal to `target`
    pub fn insert_before<S: Into<String>>(&mut self, target: &str, value: S) -> bool {
        let Some(cur) = self.locate(target) else {
            return false;
        };
        let prev = self.node(cur).prev;
        self.link_between(prev, cur, value.into());
        true
    }

    /// Insert `value` directly after the first node equal to `target`
    pub fn insert_after<S: Into<String>>(&mut self, target: &str, value: S) -> bool {
        let Some(cur) = self.locate(target) else {
            return false;
        };
        let next = self.node(cur).next;
        self.link_between(cur, next, value.into());
        true
    }

    /// Remove the head node
    pub fn pop_front(&mut self) -> bool {
        if self.head == INVALID_NODE {
            return false;
        }
        self.unlink(self.head);
        true
    }

    /// Remove the tail node
    pub fn pop_back(&mut self) -> bool {
        if self.tail == INVALID_NODE {
            return false;
        }
        self.unlink(self.tail);
        true
    }

    /// Remove the first node equal to `value`
    pub fn remove_value(&mut self, value: &str) -> bool {
        match self.locate(value) {
            Some(idx) => {
                self.unlink(idx);
                true
            }
            None => false,
        }
    }

    /// Remove the node directly before the first node equal to `target`
    ///
    /// Fails when `target` is absent or is the head.
    pub fn remove_before(&mut self, target: &str) -> bool {
        let Some(cur) = self.locate(target) else {
            return false;
        };
        let prev = self.node(cur).prev;
        if prev == INVALID_NODE {
            return false;
        }
        self.unlink(prev);
        true
    }

    /// Remove the node directly after the first node equal to `target`
    ///
    /// Fails when `target` is absent or is the tail.
    pub fn remove_after(&mut self, target: &str) -> bool {
        let Some(cur) = self.locate(target) else {
            return false;
        };
        let next = self.node(cur).next;
        if next == INVALID_NODE {
            return false;
        }
        self.unlink(next);
        true
    }

    /// Handle of the first node equal to `value`
    pub fn find(&self, value: &str) -> Option<NodeId> {
        self.locate(value).map(NodeId)
    }

    /// Value stored at a node handle
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

    /// Predecessor of a node
    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        match self.slots.get(id.0 as usize) {
            Some(Some(node)) if node.prev != INVALID_NODE => Some(NodeId(node.prev)),
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
            forward: true,
        }
    }

    /// Iterate tail to head over the backward links
    pub fn iter_rev(&self) -> Iter<'_> {
        Iter {
            list: self,
            cur: self.tail,
            forward: false,
        }
    }

    /// Copy the values head to tail into a `Vec`
    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_owned).collect()
    }

    /// Backward rendering, `tail <-> ... <-> head`
    pub fn backward(&self) -> String {
        let values: Vec<&str> = self.iter_rev().collect();
        format!("DOUBLY LIST BACKWARD: {}", values.join(" <-> "))
    }

    /// Verify link symmetry and the cached length
    #[cfg(test)]
    fn check_links(&self) {
        assert_eq!(self.head == INVALID_NODE, self.len == 0);
        assert_eq!(self.tail == INVALID_NODE, self.len == 0);
        let mut count = 0;
        let mut prev = INVALID_NODE;
        let mut cur = self.head;
        while cur != INVALID_NODE {
            let node = self.node(cur);
            assert_eq!(node.prev, prev);
            prev = cur;
            cur = node.next;
            count += 1;
        }
        assert_eq!(prev, self.tail);
        assert_eq!(count, self.len);
    }
}

/// Iterator over a [`DoublyList`] in either direction
pub struct Iter<'a> {
    list: &'a DoublyList,
    cur: u32,
    forward: bool,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cur == INVALID_NODE {
            return None;
        }
        let node = self.list.node(self.cur);
        self.cur = if self.forward { node.next } else { node.prev };
        Some(node.value.as_str())
    }
}

impl Default for DoublyList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DoublyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for DoublyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DOUBLY LIST: ")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " <-> ")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for DoublyList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = DoublyList::new();
        for value in iter {
            list.push_back(value);
        }
        list
    }
}

impl PartialEq for DoublyList {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for DoublyList {}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(values: &[&str]) -> DoublyList {
        values.iter().copied().collect()
    }

    #[test]
    fn test_push_and_links() {
        let mut l = DoublyList::new();
        l.push_back("b");
        l.push_front("a");
        l.push_back("c");
        l.check_links();
        assert_eq!(l.to_vec(), vec!["a", "b", "c"]);
        assert_eq!(l.iter_rev().collect::<Vec<_>>(), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_insert_before_after() {
        let mut l = list(&["a", "c"]);
        assert!(l.insert_before("c", "b"));
        assert!(l.insert_before("a", "start"));
        assert!(l.insert_after("c", "end"));
        l.check_links();
        assert_eq!(l.to_vec(), vec!["start", "a", "b", "c", "end"]);
        assert_eq!(l.front(), Some("start"));
        assert_eq!(l.back(), Some("end"));

        let b = l.find("b").unwrap();
        assert_eq!(l.prev(b).and_then(|p| l.value(p)), Some("a"));
        assert_eq!(l.next(b).and_then(|n| l.value(n)), Some("c"));
        assert!(!l.insert_after("zzz", "x"));
    }

    #[test]
    fn test_pop_both_ends() {
        let mut l = list(&["a", "b", "c"]);
        assert!(l.pop_front());
        assert!(l.pop_back());
        l.check_links();
        assert_eq!(l.to_vec(), vec!["b"]);
        assert!(l.pop_back());
        l.check_links();
        assert!(l.is_empty());
        assert!(!l.pop_front());
        assert!(!l.pop_back());
    }

    #[test]
    fn test_remove_before_after() {
        let mut l = list(&["a", "b", "c", "d"]);
        assert!(!l.remove_before("a"));
        assert!(!l.remove_after("d"));
        assert!(!l.remove_after("missing"));
        assert_eq!(l.len(), 4);

        assert!(l.remove_before("b"));
        assert!(l.remove_after("c"));
        l.check_links();
        assert_eq!(l.to_vec(), vec!["b", "c"]);
        assert_eq!(l.front(), Some("b"));
        assert_eq!(l.back(), Some("c"));
    }

    #[test]
    fn test_remove_value_interior() {
        let mut l = list(&["a", "b", "c", "b"]);
        assert!(l.remove_value("b"));
        l.check_links();
        assert_eq!(l.to_vec(), vec!["a", "c", "b"]);
        assert!(l.remove_value("b"));
        assert!(!l.remove_value("b"));
        assert_eq!(l.back(), Some("c"));
        l.check_links();
    }

    #[test]
    fn test_backward_and_display() {
        let l = list(&["x", "y"]);
        assert_eq!(l.to_string(), "DOUBLY LIST: x <-> y");
        assert_eq!(l.backward(), "DOUBLY LIST BACKWARD: y <-> x");
    }
}
