//! Error types for store operations.

use crate::types::Capability;
use std::io;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested key does not exist.
    #[error("key not found: {key}")]
    NotFound {
        /// The key that was requested.
        key: String,
    },

    /// A composed operation was invoked on a store lacking a capability it needs.
    #[error("{operation} requires a {required} store")]
    Capability {
        /// The operation that was attempted.
        operation: &'static str,
        /// The capability the store is missing.
        required: Capability,
    },

    /// The key cannot be mapped onto the backend.
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey {
        /// The offending key.
        key: String,
        /// Why the key was rejected.
        reason: &'static str,
    },

    /// A prefix query was given a prefix that does not end in `/`.
    #[error("prefix must end with '/': {prefix:?}")]
    InvalidPrefix {
        /// The offending prefix.
        prefix: String,
    },

    /// The connection string names a protocol with no registered provider.
    #[error("unsupported protocol: {protocol}")]
    UnsupportedProtocol {
        /// The protocol part of the connection string.
        protocol: String,
    },

    /// The connection string could not be parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// A storage option was given a value it cannot take.
    #[error("invalid value for storage option {name}: {value:?}")]
    InvalidOption {
        /// The option name.
        name: String,
        /// The rejected value.
        value: String,
    },

    /// A storage option is not recognised.
    #[error("unknown storage option: {name}")]
    UnknownOption {
        /// The option name.
        name: String,
    },

    /// An error reported by the underlying provider.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StoreError {
    /// Creates a [`StoreError::NotFound`] for `key`.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Returns `true` if this is a [`StoreError::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = StoreError::not_found("a/b");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "key not found: a/b");
    }

    #[test]
    fn capability_display() {
        let err = StoreError::Capability {
            operation: "erase_prefix",
            required: Capability::Listable,
        };
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "erase_prefix requires a listable store");
    }

    #[test]
    fn io_errors_convert() {
        let err: StoreError = io::Error::new(io::ErrorKind::PermissionDenied, "nope").into();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
