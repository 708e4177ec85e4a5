//! LIFO stack over a growable buffer

use super::array::{DEFAULT_CAPACITY, MIN_CAPACITY};
use std::fmt;
use std::mem;

/// LIFO stack of strings
///
/// Slots `[0, len)` are occupied; the top is slot `len - 1`. The buffer
/// doubles when a push finds it full and never shrinks.
///
/// # Examples
///
/// ```rust
/// use dsdb::Stack;
///
/// let mut stack = Stack::new();
/// stack.push("1");
/// stack.push("2");
/// assert_eq!(stack.pop().as_deref(), Some("2"));
/// assert_eq!(stack.peek(), Some("1"));
/// ```
#[derive(Clone)]
pub struct Stack {
    data: Box<[String]>,
    len: usize,
}

impl Stack {
    /// Create an empty stack with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty stack; a capacity of zero is raised to the minimum
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![String::new(); capacity.max(MIN_CAPACITY)].into_boxed_slice(),
            len: 0,
        }
    }

    /// Number of stored values
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the stack is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current buffer capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Index of the top slot, `None` when empty
    #[inline]
    pub fn top(&self) -> Option<usize> {
        self.len.checked_sub(1)
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity() * 2;
        let mut new_data = vec![String::new(); new_capacity].into_boxed_slice();
        for (dst, src) in new_data.iter_mut().zip(self.data.iter_mut()) {
            *dst = mem::take(src);
        }
        log::debug!("stack grown: {} -> {} slots", self.capacity(), new_capacity);
        self.data = new_data;
    }

    /// Push a value on top
    pub fn push<S: Into<String>>(&mut self, value: S) {
        if self.len == self.capacity() {
            self.grow();
        }
        self.data[self.len] = value.into();
        self.len += 1;
    }

    /// Remove and return the top value
    pub fn pop(&mut self) -> Option<String> {
        let top = self.top()?;
        self.len = top;
        Some(mem::take(&mut self.data[top]))
    }

    /// Borrow the top value
    pub fn peek(&self) -> Option<&str> {
        self.top().map(|top| self.data[top].as_str())
    }

    /// Remove every value, keeping the capacity
    pub fn clear(&mut self) {
        for slot in &mut self.data[..self.len] {
            slot.clear();
        }
        self.len = 0;
    }

    /// Iterate bottom to top
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.data[..self.len].iter().map(String::as_str)
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("bottom_to_top", &&self.data[..self.len])
            .finish()
    }
}

/// Renders top first: `STACK: [top, ..., bottom]`
impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "STACK: [")?;
        for (i, value) in self.iter().rev().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

impl PartialEq for Stack {
    fn eq(&self, other: &Self) -> bool {
        self.data[..self.len] == other.data[..other.len]
    }
}

impl Eq for Stack {}
