//! Array: growable sequence of strings with index-based access
//!
//! The backing buffer is an explicit boxed slice so the capacity policy is
//! observable: capacity doubles when a write finds the buffer full, and halves
//! after a removal leaves the array at a quarter of its capacity or less.
//! Slots in `[len, capacity)` hold no meaningful value.

use crate::error::{check_bounds, check_insert_position};
use std::fmt;
use std::mem;

/// Capacity used by [`Array::new`]
pub const DEFAULT_CAPACITY: usize = 10;

/// Smallest capacity the buffer is ever allocated with
pub const MIN_CAPACITY: usize = 1;

/// Growable array of string values
///
/// # Examples
///
/// ```rust
/// use dsdb::Array;
///
/// let mut arr = Array::new();
/// arr.push_back("x");
/// arr.push_back("y");
/// assert_eq!(arr.get(1), Some("y"));
/// assert!(arr.insert(0, "w"));
/// assert_eq!(arr.len(), 3);
/// ```
#[derive(Clone)]
pub struct Array {
    data: Box<[String]>,
    len: usize,
}

impl Array {
    /// Create an empty array with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty array; a capacity of zero is raised to [`MIN_CAPACITY`]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Self::allocate(capacity.max(MIN_CAPACITY)),
            len: 0,
        }
    }

    fn allocate(capacity: usize) -> Box<[String]> {
        vec![String::new(); capacity].into_boxed_slice()
    }

    /// Number of stored values
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the array is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current capacity of the backing buffer
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Move the live prefix into a buffer of `new_capacity` slots
    fn reallocate(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity >= self.len);
        let mut new_data = Self::allocate(new_capacity);
        for (dst, src) in new_data.iter_mut().zip(self.data[..self.len].iter_mut()) {
            *dst = mem::take(src);
        }
        log::debug!("array reallocated: {} -> {} slots", self.data.len(), new_capacity);
        self.data = new_data;
    }

    fn grow_if_full(&mut self) {
        if self.len == self.capacity() {
            self.reallocate(self.capacity() * 2);
        }
    }

    /// Append a value at the end
    pub fn push_back<S: Into<String>>(&mut self, value: S) {
        self.grow_if_full();
        self.data[self.len] = value.into();
        self.len += 1;
    }

    /// Insert a value at `index`, shifting later values right
    ///
    /// Fails when `index < 0` or `index > len`.
    pub fn insert<S: Into<String>>(&mut self, index: i64, value: S) -> bool {
        let Ok(index) = check_insert_position(index, self.len) else {
            return false;
        };

        self.grow_if_full();
        // The unused slot at `len` rotates down to `index`.
        self.data[index..=self.len].rotate_right(1);
        self.data[index] = value.into();
        self.len += 1;
        true
    }

    /// Get the value at `index`
    pub fn get(&self, index: i64) -> Option<&str> {
        self.slot(index).map(|i| self.data[i].as_str())
    }

    /// Remove the value at `index`, shifting later values left
    ///
    /// May shrink the buffer to half its capacity afterwards.
    pub fn remove(&mut self, index: i64) -> bool {
        let Some(index) = self.slot(index) else {
            return false;
        };

        self.data[index..self.len].rotate_left(1);
        self.len -= 1;
        self.data[self.len].clear();

        let capacity = self.capacity();
        if self.len > 0 && self.len <= capacity / 4 {
            self.reallocate((capacity / 2).max(MIN_CAPACITY));
        }
        true
    }

    /// Overwrite the value at `index`
    pub fn replace<S: Into<String>>(&mut self, index: i64, value: S) -> bool {
        match self.slot(index) {
            Some(i) => {
                self.data[i] = value.into();
                true
            }
            None => false,
        }
    }

    /// Remove every value, keeping the current capacity
    pub fn clear(&mut self) {
        for slot in &mut self.data[..self.len] {
            slot.clear();
        }
        self.len = 0;
    }

    /// Iterate over the values in index order
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.data[..self.len].iter().map(String::as_str)
    }

    /// Copy the values into a `Vec`
    pub fn to_vec(&self) -> Vec<String> {
        self.data[..self.len].to_vec()
    }

    fn slot(&self, index: i64) -> Option<usize> {
        check_bounds(index, self.len).ok()
    }
}

impl Default for Array {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("values", &&self.data[..self.len])
            .finish()
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARRAY: [")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

impl<S: Into<String>> FromIterator<S> for Array {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut arr = Array::new();
        for value in iter {
            arr.push_back(value);
        }
        arr
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.data[..self.len] == other.data[..other.len]
    }
}

impl Eq for Array {}
