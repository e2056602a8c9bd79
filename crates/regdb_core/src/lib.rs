//! # regdb core
//!
//! A key-value registry kept in a flat text file.
//!
//! Each record takes two lines, a key line followed by a value line:
//!
//! ```text
//! K: colour
//! V: blue
//! ```
//!
//! This crate provides:
//! - [`Key`], a case-insensitive key
//! - The record parser, which loads a file strictly or drops corrupt rows
//! - [`RegistryTable`], the in-memory table for one run
//! - The writer, which regenerates the whole file from the table
//! - [`Registry`], the engine running reset, repair, merge, entry and query

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod field;
mod key;
mod parser;
mod request;
mod table;
mod writer;

pub use config::Config;
pub use engine::{Outcome, Persisted, Registry};
pub use error::{CoreError, CoreResult, CorruptionKind, ErrorClass};
pub use field::{parse_field, require_field};
pub use key::Key;
pub use parser::{load_records, CorruptionPolicy, DroppedRow, LoadReport, KEY_PREFIX, VALUE_PREFIX};
pub use request::{Operation, Request, Response};
pub use table::RegistryTable;
pub use writer::{render, write_table};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
