//! The registry engine.
//!
//! One call to [`Registry::run`] carries a single [`Request`] through
//! these steps:
//!
//! 1. **Resolve** the registry file. A missing external file is an error;
//!    a missing default file is created, and there is nothing to load.
//! 2. **Load** it into a fresh [`RegistryTable`]: leniently for repair,
//!    strictly otherwise. Reset loads nothing. Merge then loads the source
//!    file leniently on top.
//! 3. **Mutate** the table (entry only).
//! 4. **Persist**: reset truncates; any other operation rewrites the whole
//!    file if the table is dirty.
//!
//! Nothing is written before the load step has succeeded, so a strict load
//! failure leaves the file as it was.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::key::Key;
use crate::parser::{load_records, CorruptionPolicy, LoadReport};
use crate::request::{Operation, Request, Response};
use crate::table::RegistryTable;
use crate::writer::write_table;
use regdb_storage::{FileBackend, StorageBackend};
use std::io;
use std::path::Path;
use tracing::debug;

/// What the persist step did to the registry file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persisted {
    /// The file was left untouched.
    Untouched,
    /// The file was truncated to zero bytes.
    Truncated,
    /// The file was rewritten with this many pairs.
    Rewritten(usize),
}

/// Full result of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// The response for the caller.
    pub response: Response,
    /// Pairs loaded from the registry file.
    pub loaded: usize,
    /// Corrupt rows dropped from the registry file (repair only).
    pub dropped: usize,
    /// What happened to the registry file.
    pub persisted: Persisted,
}

/// Runs registry operations against flat registry files.
///
/// # Example
///
/// ```no_run
/// use regdb_core::{Config, Operation, Registry, Request};
///
/// let registry = Registry::new(Config::default());
/// let path = registry.config().default_db_path.clone();
///
/// let entry = Operation::entry("colour", "blue", false).unwrap();
/// registry.process(&Request::default_db(&path, entry)).unwrap();
///
/// let query = Operation::query("COLOUR").unwrap();
/// let response = registry.process(&Request::default_db(&path, query)).unwrap();
/// assert_eq!(response.message().as_deref(), Some("blue"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registry {
    config: Config,
}

impl Registry {
    /// Creates a registry engine with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the request and returns only its response.
    ///
    /// # Errors
    ///
    /// See [`Registry::run`].
    pub fn process(&self, request: &Request) -> CoreResult<Response> {
        self.run(request).map(|outcome| outcome.response)
    }

    /// Runs the request.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An external registry file does not exist (`ExternalDbMissing`)
    /// - A file cannot be read, created or written (`Storage`)
    /// - The registry file is corrupt and the operation is not repair (`CorruptData`)
    /// - An entry's key exists and force is not set (`DuplicateKey`)
    pub fn run(&self, request: &Request) -> CoreResult<Outcome> {
        let path = request.path();
        let operation = request.operation();
        debug!(operation = operation.name(), file = %path.display(), "requested operation");

        let (mut backend, created) = resolve(request)?;
        let mut table = RegistryTable::new();
        let mut outcome = Outcome {
            response: Response::Nothing,
            loaded: 0,
            dropped: 0,
            persisted: Persisted::Untouched,
        };

        if !created && *operation != Operation::Reset {
            let policy = match operation {
                Operation::Repair => CorruptionPolicy::Lenient,
                _ => CorruptionPolicy::Strict,
            };
            let report = load_file(&backend, path, &mut table, policy)?;
            debug!(
                loaded = report.loaded,
                dropped = report.dropped.len(),
                rewrite = table.is_dirty(),
                "registry loaded"
            );
            outcome.loaded = report.loaded;
            outcome.dropped = report.dropped.len();
        }

        outcome.response = apply(operation, &mut table)?;

        outcome.persisted = if *operation == Operation::Reset {
            backend
                .truncate(0)
                .map_err(|e| CoreError::storage(path, e))?;
            self.sync(&mut backend, path)?;
            Persisted::Truncated
        } else if table.is_dirty() {
            if let Operation::Query { .. } = operation {
                return Err(CoreError::invariant("query left the table dirty"));
            }
            let written =
                write_table(&table, &mut backend).map_err(|e| CoreError::storage(path, e))?;
            self.sync(&mut backend, path)?;
            table.mark_clean();
            Persisted::Rewritten(written)
        } else {
            Persisted::Untouched
        };

        debug!(persisted = ?outcome.persisted, "operation complete");
        Ok(outcome)
    }

    fn sync(&self, backend: &mut FileBackend, path: &Path) -> CoreResult<()> {
        if self.config.sync_on_write {
            backend.sync().map_err(|e| CoreError::storage(path, e))?;
        }
        Ok(())
    }
}

/// Opens the registry file, creating it only for the default database.
///
/// Returns the backend and whether the file was just created.
fn resolve(request: &Request) -> CoreResult<(FileBackend, bool)> {
    let path = request.path();
    if path.exists() {
        let backend = FileBackend::open(path).map_err(|e| CoreError::storage(path, e))?;
        return Ok((backend, false));
    }

    if request.is_external() {
        return Err(CoreError::ExternalDbMissing {
            path: path.to_path_buf(),
        });
    }

    debug!(file = %path.display(), "creating registry file");
    let backend = FileBackend::create(path).map_err(|e| CoreError::storage(path, e))?;
    Ok((backend, true))
}

fn load_file(
    backend: &dyn StorageBackend,
    path: &Path,
    table: &mut RegistryTable,
    policy: CorruptionPolicy,
) -> CoreResult<LoadReport> {
    let bytes = backend.read_all().map_err(|e| CoreError::storage(path, e))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| CoreError::storage(path, io::Error::new(io::ErrorKind::InvalidData, e)))?;
    load_records(text.lines(), path, table, policy)
}

/// Applies the operation-specific step to a loaded table.
fn apply(operation: &Operation, table: &mut RegistryTable) -> CoreResult<Response> {
    match operation {
        Operation::Reset | Operation::Repair => Ok(Response::Nothing),

        Operation::Merge { source } => {
            let backend =
                FileBackend::open_read_only(source).map_err(|e| CoreError::storage(source, e))?;
            let report = load_file(&backend, source, table, CorruptionPolicy::Lenient)?;
            // Rows dropped from the source never appear in the target file, so
            // only newly merged pairs require a rewrite.
            if report.loaded > 0 {
                table.mark_dirty();
            } else {
                table.mark_clean();
            }
            debug!(
                source = %source.display(),
                merged = report.loaded,
                dropped = report.dropped.len(),
                "source merged"
            );
            Ok(Response::Merged(report.loaded))
        }

        Operation::Entry { key, value, force } => {
            let key = Key::new(key.as_str());
            match table.get(&key).map(str::to_owned) {
                Some(_) if !force => {
                    return Err(CoreError::DuplicateKey {
                        key: key.to_string(),
                    })
                }
                Some(current) if current == *value => {
                    debug!(%key, "same value already present, nothing to write");
                }
                _ => {
                    table.put(key, value.clone());
                    table.mark_dirty();
                }
            }
            Ok(Response::Nothing)
        }

        Operation::Query { key } => {
            let value = table.get(&Key::new(key.as_str())).map(str::to_owned);
            debug!(found = value.is_some(), "query complete");
            Ok(Response::Found(value))
        }
    }
}
