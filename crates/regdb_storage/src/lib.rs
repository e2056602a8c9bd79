//! # regdb storage
//!
//! Storage backend trait and implementations for the registry database.
//!
//! Backends are **opaque byte stores**: they know nothing about the
//! `K: `/`V: ` record format. The core crate owns all interpretation of
//! the bytes and only ever reads a backend whole or rewrites it whole.
//!
//! ## Available Backends
//!
//! - [`FileBackend`] - A registry file on disk
//! - [`InMemoryBackend`] - For testing and ephemeral registries
//!
//! ## Example
//!
//! ```rust
//! use regdb_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! backend.append(b"K: name\nV: value\n").unwrap();
//! assert_eq!(backend.read_all().unwrap(), b"K: name\nV: value\n");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
