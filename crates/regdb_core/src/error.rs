//! Error types for the registry core.

use regdb_storage::StorageError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Why a line of a registry file was rejected by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorruptionKind {
    /// A `K: ` line whose field is empty, blank or starts with `-`.
    #[error("invalid key format")]
    InvalidKey,

    /// A `V: ` line whose field is empty, blank or starts with `-`.
    #[error("invalid value format")]
    InvalidValue,

    /// A `K: ` line while a key was already waiting for its value.
    #[error("expecting a VALUE line")]
    ExpectedValue,

    /// A `V: ` line with no key before it.
    #[error("expecting a KEY line")]
    ExpectedKey,

    /// A key that is already present in the table.
    #[error("duplicate key '{0}'")]
    DuplicateKey(String),

    /// A line that is neither a key line nor a value line.
    #[error("invalid line format")]
    InvalidLine,

    /// The file ended while a key was waiting for its value.
    #[error("couldn't find corresponding value of key '{0}'")]
    DanglingKey(String),
}

/// Coarse classification of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request itself is malformed or contradicts the stored data.
    InvalidArgument,
    /// Reading, creating or writing a file failed.
    Io,
    /// A registry file violates the record format under strict loading.
    CorruptData,
    /// A state the engine guarantees cannot happen.
    Internal,
}

/// Errors that can occur in registry operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A key or value is empty, blank or starts with `-`.
    #[error("invalid {field} format: '{value}'")]
    InvalidField {
        /// Which field was rejected ("key", "value").
        field: &'static str,
        /// The rejected raw text.
        value: String,
    },

    /// An entry for an existing key was requested without force.
    #[error("key already present: {key}")]
    DuplicateKey {
        /// The key as supplied by the caller.
        key: String,
    },

    /// An explicitly supplied database file does not exist.
    #[error("external database not found: {}", path.display())]
    ExternalDbMissing {
        /// The missing path.
        path: PathBuf,
    },

    /// A storage operation on a file failed.
    #[error("while accessing file {}: {source}", path.display())]
    Storage {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying storage error.
        #[source]
        source: StorageError,
    },

    /// Strict loading found a structural violation.
    #[error(
        "registry data corrupted in {} at line {line_number}: {kind} (row: '{line}')",
        path.display()
    )]
    CorruptData {
        /// The file the data was loaded from.
        path: PathBuf,
        /// 1-based line number of the offending row.
        line_number: usize,
        /// The raw offending row.
        line: String,
        /// Why the row was rejected.
        kind: CorruptionKind,
    },

    /// An internal invariant was violated.
    #[error("invariant violated: {message}")]
    Invariant {
        /// Description of the violated invariant.
        message: String,
    },
}

impl CoreError {
    /// Creates an invalid field error.
    pub fn invalid_field(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            value: value.into(),
        }
    }

    /// Creates a storage error bound to the file it occurred on.
    pub fn storage(path: &Path, source: impl Into<StorageError>) -> Self {
        Self::Storage {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    /// Creates an invariant violation error.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant {
            message: message.into(),
        }
    }

    /// Returns the class of this error.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidField { .. } | Self::DuplicateKey { .. } => ErrorClass::InvalidArgument,
            Self::ExternalDbMissing { .. } | Self::Storage { .. } => ErrorClass::Io,
            Self::CorruptData { .. } => ErrorClass::CorruptData,
            Self::Invariant { .. } => ErrorClass::Internal,
        }
    }
}
