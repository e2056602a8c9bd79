//! Registry configuration.

use std::path::PathBuf;

/// Configuration for running registry operations.
#[derive(Debug, Clone)]
pub struct Config {
    /// Registry file used when no external database is supplied.
    pub default_db_path: PathBuf,

    /// Whether to sync the file to disk after every persist.
    pub sync_on_write: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_db_path: std::env::temp_dir()
                .join("registry")
                .join("data")
                .join("db"),
            sync_on_write: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default registry file.
    #[must_use]
    pub fn default_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_db_path = path.into();
        self
    }

    /// Sets whether to sync after every persist.
    #[must_use]
    pub const fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }
}
