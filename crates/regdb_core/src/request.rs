//! Operation requests and responses.

use crate::error::CoreResult;
use crate::field::require_field;
use std::path::{Path, PathBuf};

/// One of the five registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Truncate the registry file.
    Reset,
    /// Drop corrupt rows and rewrite the file.
    Repair,
    /// Import the valid records of another file.
    Merge {
        /// The file to import from.
        source: PathBuf,
    },
    /// Insert or update a pair.
    Entry {
        /// Key of the pair.
        key: String,
        /// Value of the pair.
        value: String,
        /// Replace the value if the key already exists.
        force: bool,
    },
    /// Read the value stored for a key.
    Query {
        /// The key to look up.
        key: String,
    },
}

impl Operation {
    /// Creates a merge operation.
    pub fn merge(source: impl Into<PathBuf>) -> Self {
        Self::Merge {
            source: source.into(),
        }
    }

    /// Creates an entry operation with validated fields.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidField`](crate::CoreError::InvalidField) if
    /// the key or value is empty, blank or starts with `-`.
    pub fn entry(key: &str, value: &str, force: bool) -> CoreResult<Self> {
        Ok(Self::Entry {
            key: require_field("key", key)?,
            value: require_field("value", value)?,
            force,
        })
    }

    /// Creates a query operation with a validated key.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidField`](crate::CoreError::InvalidField) if
    /// the key is empty, blank or starts with `-`.
    pub fn query(key: &str) -> CoreResult<Self> {
        Ok(Self::Query {
            key: require_field("key", key)?,
        })
    }

    /// Stable name of the operation, used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reset => "reset-db",
            Self::Repair => "repair-db",
            Self::Merge { .. } => "merge-to-db",
            Self::Entry { .. } => "entry",
            Self::Query { .. } => "query",
        }
    }
}

/// A single operation against a registry file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    path: PathBuf,
    external: bool,
    operation: Operation,
}

impl Request {
    /// Targets the default registry file, which is created if missing.
    pub fn default_db(path: impl Into<PathBuf>, operation: Operation) -> Self {
        Self {
            path: path.into(),
            external: false,
            operation,
        }
    }

    /// Targets an explicitly supplied file, which must already exist.
    pub fn external_db(path: impl Into<PathBuf>, operation: Operation) -> Self {
        Self {
            path: path.into(),
            external: true,
            operation,
        }
    }

    /// Path of the registry file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the path was explicitly supplied.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.external
    }

    /// The requested operation.
    #[must_use]
    pub fn operation(&self) -> &Operation {
        &self.operation
    }
}

/// What an operation hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// The operation produces no text.
    Nothing,
    /// Number of entries a merge added.
    Merged(usize),
    /// Result of a query.
    Found(Option<String>),
}

impl Response {
    /// Human-readable text for the response, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Nothing | Self::Found(None) => None,
            Self::Merged(1) => Some("1 new entry merged".to_owned()),
            Self::Merged(n) => Some(format!("{n} new entries merged")),
            Self::Found(Some(value)) => Some(value.clone()),
        }
    }
}
