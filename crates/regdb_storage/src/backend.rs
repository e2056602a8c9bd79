//! Storage backend trait definition.

use crate::error::StorageResult;

/// A low-level storage backend for a registry file.
///
/// Backends are **opaque byte stores**. The registry engine reads a backend
/// in one go, and persists by truncating to zero and appending the full
/// serialization. There is no in-place update.
///
/// # Invariants
///
/// - `read_all` returns every byte appended since the last truncation
/// - `append` returns the offset where data was written
/// - `truncate(0)` leaves an empty store, never mixed old/new content
/// - Backends must be `Send + Sync`
pub trait StorageBackend: Send + Sync {
    /// Reads the entire content of the storage.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn read_all(&self) -> StorageResult<Vec<u8>>;

    /// Appends data to the end of the storage.
    ///
    /// Returns the offset where the data was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is read-only or an I/O error occurs.
    fn append(&mut self, data: &[u8]) -> StorageResult<u64>;

    /// Flushes pending writes to the operating system.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush operation fails.
    fn flush(&mut self) -> StorageResult<()>;

    /// Returns the current size of the storage in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;

    /// Syncs all data and metadata to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync operation fails.
    fn sync(&mut self) -> StorageResult<()>;

    /// Truncates the storage to the given size.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The backend is read-only
    /// - `new_size` is greater than the current size
    /// - The truncation fails
    fn truncate(&mut self, new_size: u64) -> StorageResult<()>;
}
