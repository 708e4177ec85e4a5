//! FIFO queue over a circular growable buffer
//!
//! `front` is the slot of the oldest value and `rear` the slot of the newest;
//! both wrap modulo the capacity. `len` is tracked separately, so a full
//! buffer uses every slot. Growth copies the logical order into a buffer of
//! twice the capacity starting at slot 0 and resets the indices.

use super::array::{DEFAULT_CAPACITY, MIN_CAPACITY};
use std::fmt;
use std::mem;

/// FIFO queue of strings
///
/// # Examples
///
/// ```rust
/// use dsdb::Queue;
///
/// let mut queue = Queue::with_capacity(2);
/// queue.push("a");
/// queue.push("b");
/// queue.push("c");
/// assert_eq!(queue.pop().as_deref(), Some("a"));
/// assert_eq!(queue.peek(), Some("b"));
/// ```
#[derive(Clone)]
pub struct Queue {
    data: Box<[String]>,
    front: usize,
    rear: usize,
    len: usize,
}

impl Queue {
    /// Create an empty queue with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty queue; a capacity of zero is raised to the minimum
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        Self {
            data: vec![String::new(); capacity].into_boxed_slice(),
            front: 0,
            // one slot "before" front so the first push lands on slot 0
            rear: capacity - 1,
            len: 0,
        }
    }

    /// Number of stored values
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the queue is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current buffer capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn physical(&self, logical: usize) -> usize {
        (self.front + logical) % self.capacity()
    }

    /// Re-linearize into a buffer of twice the capacity
    fn grow(&mut self) {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity * 2;
        let mut new_data = vec![String::new(); new_capacity].into_boxed_slice();
        for (i, dst) in new_data.iter_mut().take(self.len).enumerate() {
            let src = self.physical(i);
            *dst = mem::take(&mut self.data[src]);
        }
        self.data = new_data;
        self.front = 0;
        self.rear = if self.len == 0 { new_capacity - 1 } else { self.len - 1 };
        log::debug!("queue grown: {} -> {} slots", old_capacity, new_capacity);
    }

    /// Append a value at the rear
    pub fn push<S: Into<String>>(&mut self, value: S) {
        if self.len == self.capacity() {
            self.grow();
        }
        self.rear = (self.rear + 1) % self.capacity();
        self.data[self.rear] = value.into();
        self.len += 1;
    }

    /// Remove and return the front value
    pub fn pop(&mut self) -> Option<String> {
        if self.len == 0 {
            return None;
        }
        let value = mem::take(&mut self.data[self.front]);
        self.front = (self.front + 1) % self.capacity();
        self.len -= 1;
        Some(value)
    }

    /// Borrow the front value
    pub fn peek(&self) -> Option<&str> {
        (self.len > 0).then(|| self.data[self.front].as_str())
    }

    /// Remove every value, keeping the capacity
    pub fn clear(&mut self) {
        while self.pop().is_some() {}
        self.front = 0;
        self.rear = self.capacity() - 1;
    }

    /// Iterate front to rear
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.len).map(move |i| self.data[self.physical(i)].as_str())
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("front", &self.front)
            .field("rear", &self.rear)
            .field("values", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Display for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QUEUE: [")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

impl PartialEq for Queue {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for Queue {}
