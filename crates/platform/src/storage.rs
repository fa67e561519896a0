//! Storage abstraction for the media card file system

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Dir,
}

/// A single entry produced by [`Storage::list_dir`].
///
/// `name` is the bare entry name (no directory prefix).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry<'a> {
    /// Entry name without the parent path
    pub name: &'a str,
    /// File or directory
    pub kind: EntryKind,
}

impl DirEntry<'_> {
    /// Dotfiles (`.Trashes`, `._01.wav`, ...) are never part of the library.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// Storage trait for file system access
pub trait Storage {
    /// Error type
    type Error: core::fmt::Debug;
    /// File type
    type File: File;

    /// Open file for reading
    fn open_file(
        &mut self,
        path: &str,
    ) -> impl core::future::Future<Output = Result<Self::File, Self::Error>>;

    /// Check if path exists
    fn exists(
        &mut self,
        path: &str,
    ) -> impl core::future::Future<Output = Result<bool, Self::Error>>;

    /// Call `visit` once per entry of the directory at `path`.
    ///
    /// Entries are reported in whatever order the file system yields them;
    /// callers that need an order sort themselves.
    fn list_dir<F>(
        &mut self,
        path: &str,
        visit: F,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>
    where
        F: FnMut(DirEntry<'_>);

    /// Size in bytes of the file at `path`.
    fn file_size(&mut self, path: &str)
        -> impl core::future::Future<Output = Result<u64, Self::Error>>;

    /// Replace the whole contents of the file at `path`, creating it if needed.
    fn write_file(
        &mut self,
        path: &str,
        data: &[u8],
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;
}

/// File trait for reading files
pub trait File {
    /// Error type
    type Error: core::fmt::Debug;

    /// Read from current position
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, Self::Error>>;

    /// Get file size
    fn size(&self) -> u64;
}
