//! Storage backend for input and output files.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};

/// Reads and writes whole files.
pub trait Storage {
    /// Returns `true` if something exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Writes `data` to a new file at `path`.
    ///
    /// Never replaces an existing file.
    fn write(&self, path: &Path, data: &[u8]) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        (**self).read(path)
    }

    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        (**self).write(path, data)
    }
}

/// Local filesystem storage.
///
/// Writes are not atomic: a failure halfway can leave a partial file behind.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStorage;

impl FileStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for FileStorage {
    fn exists(&self, path: &Path) -> bool {
        // a dangling symlink still counts as taken
        path.exists() || fs::symlink_metadata(path).is_ok()
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| Error::io(format!("failed to read {}", path.display()), e))
    }

    /// Creates parent directories if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file already exists or cannot be written.
    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        let context = || format!("failed to write {}", path.display());

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(context(), e))?;
        }

        // fail if exists
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| Error::io(context(), e))?;

        file.write_all(data).map_err(|e| Error::io(context(), e))?;
        file.sync_all().map_err(|e| Error::io(context(), e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    // --------------------------------------------------
    // READ TESTS
    // --------------------------------------------------

    #[test]
    fn read_returns_written_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.aes");

        let storage = FileStorage::new();
        storage.write(&path, b"hello world").unwrap();

        let data = storage.read(&path).unwrap();
        assert_eq!(data, b"hello world");
    }

    #[test]
    fn read_fails_if_file_does_not_exist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        match FileStorage::new().read(&path) {
            Err(Error::Io { context, .. }) => assert!(context.contains("missing.txt")),
            other => panic!("expected Io error, got: {other:?}"),
        }
    }

    // --------------------------------------------------
    // EXISTS TESTS
    // --------------------------------------------------

    #[test]
    fn exists_returns_false_if_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.txt");

        assert!(!FileStorage::new().exists(&path));
    }

    #[test]
    fn exists_returns_true_after_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.txt");

        let storage = FileStorage::new();
        storage.write(&path, b"data").unwrap();

        assert!(storage.exists(&path));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_counts_as_existing() {
        let dir = tempdir().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(dir.path().join("nowhere"), &link).unwrap();

        assert!(FileStorage::new().exists(&link));
    }

    // --------------------------------------------------
    // WRITE EDGE CASES
    // --------------------------------------------------

    #[test]
    fn write_handles_large_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.aes");

        let storage = FileStorage::new();

        let large = vec![42u8; 10_000];
        storage.write(&path, &large).unwrap();

        let loaded = storage.read(&path).unwrap();
        assert_eq!(loaded.len(), 10_000);
        assert_eq!(loaded, large);
    }

    #[test]
    fn write_never_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.aes");

        let storage = FileStorage::new();

        storage.write(&path, b"first").unwrap();
        assert!(matches!(
            storage.write(&path, b"second"),
            Err(Error::Io { .. })
        ));

        let content = fs::read(path).unwrap();
        assert_eq!(content, b"first");
    }

    #[test]
    fn parent_directory_is_created() {
        let dir = tempdir().unwrap();

        let nested = dir.path().join("a").join("b").join("c").join("out.aes");

        FileStorage::new().write(&nested, b"data").unwrap();

        assert!(nested.exists());
    }
}
