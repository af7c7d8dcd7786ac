//! Error handling for the sample ring buffer.
//!
//! Provides a single error type carrying:
//! * A category ([`ErrorKind`])
//! * The underlying error or message
//!
//! Most buffer operations cannot fail: overflow and under-read are normal
//! operating conditions for a ring buffer and are reported through return
//! values. Errors are reserved for invalid configuration and for the soak
//! runner detecting a divergence.
//!
//! # Example
//!
//! ```rust
//! use sample_ring::{Error, ErrorKind, RingBuffer};
//!
//! let err = RingBuffer::<f32>::new(0).unwrap_err();
//! assert_eq!(err.kind, ErrorKind::InvalidConfiguration);
//! ```

use std::fmt;

use thiserror::Error;

/// Error categories.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// A setting was rejected at construction time, such as a zero capacity.
    InvalidConfiguration,

    /// An internal invariant was violated.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration => write!(f, "invalid configuration"),
            Self::Internal => write!(f, "internal error"),
        }
    }
}

/// Error with a kind and an underlying cause.
#[derive(Debug, Error)]
#[error("{kind}: {error}")]
pub struct Error {
    /// Category of the error.
    pub kind: ErrorKind,

    /// Underlying error or message.
    pub error: Box<dyn std::error::Error + Send + Sync>,
}

impl Error {
    /// Creates an error of the given kind.
    ///
    /// # Arguments
    ///
    /// * `kind` - Error category
    /// * `error` - Anything convertible into a boxed error, including strings
    pub fn new<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self {
            kind,
            error: error.into(),
        }
    }

    /// Creates an `InvalidConfiguration` error.
    pub fn invalid_configuration<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::InvalidConfiguration, error)
    }

    /// Creates an `Internal` error.
    pub fn internal<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::Internal, error)
    }
}

/// Result type using this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
