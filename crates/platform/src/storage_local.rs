//! Local filesystem Storage implementation for the desktop simulator.
//!
//! `LocalFileStorage` implements `platform::Storage` using `std::fs`.
//! Used when the `std` feature is enabled (simulator and tooling builds).
//! Device paths such as `/sd/book` are resolved beneath the host directory
//! provided at construction, so `/sd/books.txt` lives at
//! `{root}/sd/books.txt`.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::storage::{DirEntry, EntryKind, File, Storage};

/// Error type for local filesystem operations.
#[derive(Debug)]
pub struct LocalStorageError(pub std::io::Error);

impl core::fmt::Display for LocalStorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "local storage error: {}", self.0)
    }
}

impl std::error::Error for LocalStorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// An open file on the local filesystem.
pub struct LocalFile {
    inner: fs::File,
    size: u64,
}

impl File for LocalFile {
    type Error = LocalStorageError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        Read::read(&mut self.inner, buf).map_err(LocalStorageError)
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// A `platform::Storage` implementation backed by `std::fs`.
///
/// # Example
/// ```no_run
/// # async fn example() {
/// use platform::storage_local::LocalFileStorage;
/// use platform::Storage;
/// let mut storage = LocalFileStorage::new("/home/user/reader-card");
/// let size = storage.file_size("/sd/books.txt").await.unwrap();
/// # }
/// ```
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    /// Create a new storage rooted at `host_root`.
    #[must_use]
    pub fn new(host_root: impl AsRef<Path>) -> Self {
        Self {
            root: host_root.as_ref().to_path_buf(),
        }
    }

    /// Host directory backing the device root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Host path for the device path `path`.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        // `Path::join` with an absolute path would discard the root.
        self.root.join(path.trim_start_matches('/'))
    }
}

impl Storage for LocalFileStorage {
    type Error = LocalStorageError;
    type File = LocalFile;

    async fn open_file(&mut self, path: &str) -> Result<Self::File, Self::Error> {
        let full = self.resolve(path);
        let file = fs::File::open(&full).map_err(LocalStorageError)?;
        let meta = file.metadata().map_err(LocalStorageError)?;
        Ok(LocalFile {
            inner: file,
            size: meta.len(),
        })
    }

    async fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        Ok(self.resolve(path).exists())
    }

    async fn list_dir<F>(&mut self, path: &str, mut visit: F) -> Result<(), Self::Error>
    where
        F: FnMut(DirEntry<'_>),
    {
        for entry in fs::read_dir(self.resolve(path)).map_err(LocalStorageError)? {
            let entry = entry.map_err(LocalStorageError)?;
            let file_type = entry.file_type().map_err(LocalStorageError)?;
            let kind = if file_type.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            };
            // FAT names are always valid UTF-8 after LFN decoding; skip
            // anything the host cannot represent.
            if let Some(name) = entry.file_name().to_str() {
                visit(DirEntry { name, kind });
            }
        }
        Ok(())
    }

    async fn file_size(&mut self, path: &str) -> Result<u64, Self::Error> {
        fs::metadata(self.resolve(path))
            .map(|meta| meta.len())
            .map_err(LocalStorageError)
    }

    async fn write_file(&mut self, path: &str, data: &[u8]) -> Result<(), Self::Error> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(LocalStorageError)?;
        }
        // Stage as a dotfile beside the target, then rename over it. Hidden
        // names are never picked up as records or library entries.
        let name = full
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| LocalStorageError(std::io::ErrorKind::InvalidInput.into()))?;
        let staging = full.with_file_name(format!(".{name}.partial"));
        let mut file = fs::File::create(&staging).map_err(LocalStorageError)?;
        file.write_all(data).map_err(LocalStorageError)?;
        file.sync_all().map_err(LocalStorageError)?;
        fs::rename(&staging, &full).map_err(LocalStorageError)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::storage::{File, Storage};
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn local_storage_read_full_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("test.bin"), b"hello world").unwrap();
        let mut storage = LocalFileStorage::new(tmp.path());
        let mut file = storage.open_file("/test.bin").await.unwrap();
        let mut buf = [0u8; 11];
        let n = file.read(&mut buf).await.unwrap();
        assert_eq!(n, 11);
        assert_eq!(&buf, b"hello world");
    }

    #[tokio::test]
    async fn absolute_device_paths_stay_under_root() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalFileStorage::new(tmp.path());
        assert_eq!(storage.resolve("/sd/books.txt"), tmp.path().join("sd/books.txt"));
    }

    #[tokio::test]
    async fn list_dir_reports_kinds() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("sd/book/01 First")).unwrap();
        fs::write(tmp.path().join("sd/book/readme.txt"), b"x").unwrap();
        let mut storage = LocalFileStorage::new(tmp.path());

        let mut seen = Vec::new();
        storage
            .list_dir("/sd/book", |e| seen.push((e.name.to_owned(), e.kind)))
            .await
            .unwrap();
        seen.sort();
        assert_eq!(
            seen,
            vec![
                ("01 First".to_owned(), EntryKind::Dir),
                ("readme.txt".to_owned(), EntryKind::File),
            ]
        );
    }

    #[tokio::test]
    async fn write_file_replaces_contents_and_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let mut storage = LocalFileStorage::new(tmp.path());
        storage.write_file("/sd/chapters.txt", b"12").await.unwrap();
        storage.write_file("/sd/chapters.txt", b"3").await.unwrap();
        assert_eq!(fs::read(tmp.path().join("sd/chapters.txt")).unwrap(), b"3");
        assert!(!tmp.path().join("sd/.chapters.txt.partial").exists());
        assert_eq!(storage.file_size("/sd/chapters.txt").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn local_storage_exists_false() {
        let tmp = TempDir::new().unwrap();
        let mut storage = LocalFileStorage::new(tmp.path());
        assert!(!storage.exists("missing.bin").await.unwrap());
        assert!(storage.file_size("missing.bin").await.is_err());
    }
}
