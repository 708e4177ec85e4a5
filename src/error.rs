//! Error handling for the dsdb library
//!
//! Container operations report ordinary failures through `bool`/`Option`
//! results. Everything above them (the store, the codec and the shell) uses
//! [`DsdbError`] so failures can be propagated with `?` and rendered once.

use thiserror::Error;

/// Main error type for the dsdb library
#[derive(Error, Debug)]
pub enum DsdbError {
    /// I/O related errors (database file cannot be opened, read or written)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A container name, list value or tree key is absent
    #[error("{what} not found")]
    NotFound {
        /// Description of what was looked up
        what: String,
    },

    /// Bad index, unparseable key, wrong argument count or unencodable value
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message describing the issue
        message: String,
    },

    /// A container of this kind already uses the name
    #[error("{kind} already exists: {name}")]
    AlreadyExists {
        /// Display name of the container kind
        kind: &'static str,
        /// The clashing container name
        name: String,
    },

    /// Pop or peek on an empty stack or queue
    #[error("{kind} is empty")]
    Empty {
        /// Display name of the container kind
        kind: &'static str,
    },

    /// Index out of bounds access
    #[error("Out of bounds: index {index}, size {size}")]
    OutOfBounds {
        /// The invalid index
        index: i64,
        /// The valid size/length
        size: usize,
    },

    /// Configuration or parameter errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl DsdbError {
    /// Create a not found error
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an already exists error
    pub fn already_exists<S: Into<String>>(kind: &'static str, name: S) -> Self {
        Self::AlreadyExists {
            kind,
            name: name.into(),
        }
    }

    /// Create an empty container error
    pub fn empty(kind: &'static str) -> Self {
        Self::Empty { kind }
    }

    /// Create an out of bounds error
    pub fn out_of_bounds(index: i64, size: usize) -> Self {
        Self::OutOfBounds { index, size }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    ///
    /// Every variant except configuration problems leaves the store usable;
    /// a failed load starts from an empty store, a failed save keeps the
    /// in-memory state.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::NotFound { .. } => true,
            Self::InvalidArgument { .. } => true,
            Self::AlreadyExists { .. } => true,
            Self::Empty { .. } => true,
            Self::OutOfBounds { .. } => true,
            Self::Configuration { .. } => false,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::NotFound { .. } => "not_found",
            Self::InvalidArgument { .. } => "argument",
            Self::AlreadyExists { .. } => "exists",
            Self::Empty { .. } => "empty",
            Self::OutOfBounds { .. } => "bounds",
            Self::Configuration { .. } => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DsdbError>;

/// Check that a signed index addresses an existing element
#[inline]
pub fn check_bounds(index: i64, size: usize) -> Result<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < size)
        .ok_or_else(|| DsdbError::out_of_bounds(index, size))
}

/// Check that a signed index is a valid insertion point (`0..=size`)
#[inline]
pub fn check_insert_position(index: i64, size: usize) -> Result<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i <= size)
        .ok_or_else(|| DsdbError::out_of_bounds(index, size))
}
