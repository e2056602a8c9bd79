//! File-based storage backend for registry files.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A file-based storage backend.
///
/// Unlike a general purpose store, opening never creates a file implicitly:
/// the registry engine decides whether a missing file is created (the
/// default database) or reported (an external database). Use
/// [`FileBackend::create`] for the former.
///
/// # Durability
///
/// - `flush()` calls `File::flush()` to push data to the OS
/// - `sync()` calls `File::sync_all()` to ensure data is on disk
///
/// # Example
///
/// ```no_run
/// use regdb_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::create(Path::new("registry/db")).unwrap();
/// backend.append(b"K: colour\nV: blue\n").unwrap();
/// backend.sync().unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    file: RwLock<File>,
    size: RwLock<u64>,
    read_only: bool,
}

impl FileBackend {
    /// Opens an existing file for reading and writing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be opened.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::from_file(path, file, false)
    }

    /// Opens an existing file for reading only.
    ///
    /// Writes through the returned backend fail with
    /// [`StorageError::ReadOnly`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be opened.
    pub fn open_read_only(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new().read(true).open(path)?;
        Self::from_file(path, file, true)
    }

    /// Creates the file, and any missing parent directories.
    ///
    /// An existing file is opened as-is, not truncated.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file cannot be opened.
    pub fn create(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        Self::from_file(path, file, false)
    }

    fn from_file(path: &Path, file: File, read_only: bool) -> StorageResult<Self> {
        let size = file.metadata()?.len();
        Ok(Self {
            path: path.to_path_buf(),
            file: RwLock::new(file),
            size: RwLock::new(size),
            read_only,
        })
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the backend rejects writes.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn check_writable(&self) -> StorageResult<()> {
        if self.read_only {
            return Err(StorageError::ReadOnly {
                path: self.path.clone(),
            });
        }
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn read_all(&self) -> StorageResult<Vec<u8>> {
        let mut file = self.file.write();
        file.seek(SeekFrom::Start(0))?;

        let mut buffer = Vec::with_capacity(*self.size.read() as usize);
        file.read_to_end(&mut buffer)?;

        Ok(buffer)
    }

    fn append(&mut self, data: &[u8]) -> StorageResult<u64> {
        self.check_writable()?;
        if data.is_empty() {
            return Ok(*self.size.read());
        }

        let mut file = self.file.write();
        let mut size = self.size.write();

        let offset = *size;
        file.seek(SeekFrom::End(0))?;
        file.write_all(data)?;
        *size += data.len() as u64;

        Ok(offset)
    }

    fn flush(&mut self) -> StorageResult<()> {
        let mut file = self.file.write();
        file.flush()?;
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(*self.size.read())
    }

    fn sync(&mut self) -> StorageResult<()> {
        if self.read_only {
            return Ok(());
        }
        let file = self.file.write();
        file.sync_all()?;
        Ok(())
    }

    fn truncate(&mut self, new_size: u64) -> StorageResult<()> {
        self.check_writable()?;
        let file = self.file.write();
        let mut size = self.size.write();

        if new_size > *size {
            return Err(StorageError::TruncateBeyondEnd {
                requested: new_size,
                size: *size,
            });
        }

        file.set_len(new_size)?;
        *size = new_size;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_missing_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing");

        let result = FileBackend::open(&path);
        assert!(matches!(
            result.unwrap_err().io_kind(),
            Some(std::io::ErrorKind::NotFound)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn create_with_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry").join("data").join("db");

        let backend = FileBackend::create(&path).unwrap();
        assert_eq!(backend.size().unwrap(), 0);
        assert!(path.exists());
        assert_eq!(backend.path(), path);
    }

    #[test]
    fn create_keeps_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db");
        std::fs::write(&path, "K: a\nV: 1\n").unwrap();

        let backend = FileBackend::create(&path).unwrap();
        assert_eq!(backend.read_all().unwrap(), b"K: a\nV: 1\n");
    }

    #[test]
    fn append_and_read_all() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db");

        let mut backend = FileBackend::create(&path).unwrap();
        assert_eq!(backend.append(b"K: a\n").unwrap(), 0);
        assert_eq!(backend.append(b"V: 1\n").unwrap(), 5);

        assert_eq!(backend.size().unwrap(), 10);
        assert_eq!(backend.read_all().unwrap(), b"K: a\nV: 1\n");
    }

    #[test]
    fn truncate_then_rewrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db");

        let mut backend = FileBackend::create(&path).unwrap();
        backend.append(b"K: old\nV: content\n").unwrap();
        backend.truncate(0).unwrap();
        backend.append(b"K: new\nV: x\n").unwrap();
        backend.sync().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"K: new\nV: x\n");
    }

    #[test]
    fn truncate_beyond_end_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db");

        let mut backend = FileBackend::create(&path).unwrap();
        backend.append(b"abc").unwrap();

        let result = backend.truncate(10);
        assert!(matches!(
            result,
            Err(StorageError::TruncateBeyondEnd {
                requested: 10,
                size: 3
            })
        ));
    }

    #[test]
    fn read_only_rejects_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("source");
        std::fs::write(&path, "K: a\nV: 1\n").unwrap();

        let mut backend = FileBackend::open_read_only(&path).unwrap();
        assert!(backend.is_read_only());
        assert_eq!(backend.read_all().unwrap(), b"K: a\nV: 1\n");
        assert!(matches!(
            backend.append(b"x"),
            Err(StorageError::ReadOnly { .. })
        ));
        assert!(matches!(
            backend.truncate(0),
            Err(StorageError::ReadOnly { .. })
        ));
        assert!(backend.sync().is_ok());
    }

    #[test]
    fn persistence_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db");

        {
            let mut backend = FileBackend::create(&path).unwrap();
            backend.append(b"K: k\nV: v\n").unwrap();
            backend.sync().unwrap();
        }

        let backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.size().unwrap(), 10);
        assert_eq!(backend.read_all().unwrap(), b"K: k\nV: v\n");
    }
}
