//! Progress records — the durable (book, chapter) resume position.
//!
//! Each record is a small text file whose whole content is one ASCII decimal
//! integer. An empty file is the "never written / torn" sentinel; anything
//! that does not parse is treated the same way and repaired to `0`.

use core::fmt::Write as _;

use heapless::String;
use library::{join_path, MediaPath};
use platform::storage::{EntryKind, File as _, Storage};

/// Longest record content accepted, in bytes. `usize::MAX` plus a newline.
const RECORD_MAX: usize = 24;

/// Which of the two records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordKind {
    /// Index of the book being read
    Book,
    /// Index of the chapter within that book
    Chapter,
}

impl RecordKind {
    /// Record name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Chapter => "chapter",
        }
    }
}

/// Errors from the progress records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressError<E> {
    /// The card failed underneath the record.
    Storage(E),
    /// Missing, empty, unreadable or non-numeric record.
    Corrupt,
    /// A record path does not fit in a [`MediaPath`].
    PathTooLong,
}

/// Outcome of [`ProgressStore::repair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repair {
    /// The value was in range and the record intact.
    Kept(usize),
    /// The record now holds `0`.
    Reset {
        /// Previous value; `None` when unreadable
        stale: Option<usize>,
    },
}

impl Repair {
    /// The value to trust after the repair.
    pub fn value(self) -> usize {
        match self {
            Self::Kept(value) => value,
            Self::Reset { .. } => 0,
        }
    }

    /// `true` when the record was rewritten.
    pub fn was_reset(self) -> bool {
        matches!(self, Self::Reset { .. })
    }
}

/// Where to look for the records on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout<'a> {
    /// Directory scanned for existing records
    pub media_root: &'a str,
    /// Case-insensitive filename prefix of the book record
    pub book_prefix: &'a str,
    /// Case-insensitive filename prefix of the chapter record
    pub chapter_prefix: &'a str,
    /// Book record path used when none exists yet
    pub book_default: &'a str,
    /// Chapter record path used when none exists yet
    pub chapter_default: &'a str,
}

impl Default for RecordLayout<'static> {
    fn default() -> Self {
        use platform::config;
        Self {
            media_root: config::MEDIA_ROOT,
            book_prefix: config::BOOK_RECORD_PREFIX,
            chapter_prefix: config::CHAPTER_RECORD_PREFIX,
            book_default: config::DEFAULT_BOOK_RECORD,
            chapter_default: config::DEFAULT_CHAPTER_RECORD,
        }
    }
}

fn has_prefix_ignore_case(name: &str, prefix: &str) -> bool {
    name.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn to_path<E>(path: &str) -> Result<MediaPath, ProgressError<E>> {
    let mut out = MediaPath::new();
    out.push_str(path).map_err(|_| ProgressError::PathTooLong)?;
    Ok(out)
}

/// The two progress records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressStore {
    book: MediaPath,
    chapter: MediaPath,
}

impl ProgressStore {
    /// Use the records at exactly these paths.
    pub fn at<E>(book: &str, chapter: &str) -> Result<Self, ProgressError<E>> {
        Ok(Self {
            book: to_path(book)?,
            chapter: to_path(chapter)?,
        })
    }

    /// Find the records already on the card.
    ///
    /// Any visible file directly under `media_root` whose name starts with
    /// the record prefix counts; with several candidates the first by name
    /// wins. A record that is not found falls back to its default path and
    /// is created on first write.
    pub async fn locate<S: Storage>(
        storage: &mut S,
        layout: &RecordLayout<'_>,
    ) -> Result<Self, ProgressError<S::Error>> {
        let mut book: Option<MediaPath> = None;
        let mut chapter: Option<MediaPath> = None;
        let mut too_long = false;

        storage
            .list_dir(layout.media_root, |entry| {
                if entry.kind != EntryKind::File || entry.is_hidden() {
                    return;
                }
                let slot = if has_prefix_ignore_case(entry.name, layout.book_prefix) {
                    &mut book
                } else if has_prefix_ignore_case(entry.name, layout.chapter_prefix) {
                    &mut chapter
                } else {
                    return;
                };
                let Some(path) = join_path(layout.media_root, entry.name) else {
                    too_long = true;
                    return;
                };
                if slot.as_ref().map_or(true, |current| path < *current) {
                    *slot = Some(path);
                }
            })
            .await
            .map_err(ProgressError::Storage)?;

        if too_long {
            return Err(ProgressError::PathTooLong);
        }

        let book = match book {
            Some(path) => path,
            None => to_path(layout.book_default)?,
        };
        let chapter = match chapter {
            Some(path) => path,
            None => to_path(layout.chapter_default)?,
        };
        debug!("progress records: {} / {}", book.as_str(), chapter.as_str());
        Ok(Self { book, chapter })
    }

    /// Path of the record for `kind`.
    pub fn path(&self, kind: RecordKind) -> &str {
        match kind {
            RecordKind::Book => &self.book,
            RecordKind::Chapter => &self.chapter,
        }
    }

    /// Read the stored value.
    pub async fn read<S: Storage>(
        &self,
        storage: &mut S,
        kind: RecordKind,
    ) -> Result<usize, ProgressError<S::Error>> {
        let path = self.path(kind);
        if !storage.exists(path).await.map_err(ProgressError::Storage)? {
            return Err(ProgressError::Corrupt);
        }
        let mut file = storage.open_file(path).await.map_err(ProgressError::Storage)?;
        if file.size() > RECORD_MAX as u64 {
            return Err(ProgressError::Corrupt);
        }

        let mut buf = [0u8; RECORD_MAX];
        let mut len = 0usize;
        while let Some(rest) = buf.get_mut(len..) {
            if rest.is_empty() {
                break;
            }
            match file.read(rest).await {
                Ok(0) => break,
                Ok(n) => len = len.saturating_add(n),
                Err(_) => return Err(ProgressError::Corrupt),
            }
        }

        let text = buf
            .get(..len)
            .and_then(|bytes| core::str::from_utf8(bytes).ok())
            .ok_or(ProgressError::Corrupt)?;
        text.trim().parse().map_err(|_| ProgressError::Corrupt)
    }

    /// Overwrite the record with `value` in a single write.
    pub async fn write<S: Storage>(
        &self,
        storage: &mut S,
        kind: RecordKind,
        value: usize,
    ) -> Result<(), ProgressError<S::Error>> {
        let mut text: String<RECORD_MAX> = String::new();
        write!(text, "{value}").map_err(|_| ProgressError::Corrupt)?;
        storage
            .write_file(self.path(kind), text.as_bytes())
            .await
            .map_err(ProgressError::Storage)
    }

    /// Reset the record to `0` if `value` is not a valid index below
    /// `total`, or if the record on the card is missing or empty.
    ///
    /// Running it twice with the same inputs leaves the same record.
    pub async fn repair<S: Storage>(
        &self,
        storage: &mut S,
        kind: RecordKind,
        value: usize,
        total: usize,
    ) -> Result<Repair, ProgressError<S::Error>> {
        let path = self.path(kind);
        let size = if storage.exists(path).await.map_err(ProgressError::Storage)? {
            storage.file_size(path).await.map_err(ProgressError::Storage)?
        } else {
            0
        };

        if value < total && size > 0 {
            return Ok(Repair::Kept(value));
        }

        warn!(
            "{} record out of sync (value {}, total {}, size {}), resetting to 0",
            kind.as_str(),
            value,
            total,
            size
        );
        self.write(storage, kind, 0).await?;
        Ok(Repair::Reset { stale: Some(value) })
    }

    /// Read the record and repair it against `total` in one step.
    ///
    /// An unreadable record is rewritten as `0`.
    pub async fn restore<S: Storage>(
        &self,
        storage: &mut S,
        kind: RecordKind,
        total: usize,
    ) -> Result<Repair, ProgressError<S::Error>> {
        match self.read(storage, kind).await {
            Ok(value) => self.repair(storage, kind, value, total).await,
            Err(ProgressError::Corrupt) => {
                warn!("{} record unreadable, resetting to 0", kind.as_str());
                self.write(storage, kind, 0).await?;
                Ok(Repair::Reset { stale: None })
            }
            Err(other) => Err(other),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use platform::mocks::MockStorage;

    type Error = ProgressError<platform::mocks::MockError>;

    fn store() -> ProgressStore {
        ProgressStore::at::<()>("/sd/books.txt", "/sd/chapters.txt").unwrap()
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let mut storage = MockStorage::new();
        let store = store();
        store.write(&mut storage, RecordKind::Chapter, 42).await.unwrap();
        assert_eq!(storage.text("/sd/chapters.txt"), Some("42"));
        assert_eq!(store.read(&mut storage, RecordKind::Chapter).await, Ok(42));
    }

    #[tokio::test]
    async fn test_read_rejects_missing_empty_and_garbage() {
        let mut storage = MockStorage::new();
        let store = store();
        let corrupt: Result<usize, Error> = Err(ProgressError::Corrupt);

        assert_eq!(store.read(&mut storage, RecordKind::Book).await, corrupt);
        storage.add_file("/sd/books.txt", b"");
        assert_eq!(store.read(&mut storage, RecordKind::Book).await, corrupt);
        storage.add_file("/sd/books.txt", b"1x");
        assert_eq!(store.read(&mut storage, RecordKind::Book).await, corrupt);
        storage.add_file("/sd/books.txt", b"-1");
        assert_eq!(store.read(&mut storage, RecordKind::Book).await, corrupt);
    }

    #[tokio::test]
    async fn test_read_tolerates_trailing_newline() {
        let mut storage = MockStorage::new();
        storage.add_file("/sd/books.txt", b"3\n");
        assert_eq!(store().read(&mut storage, RecordKind::Book).await, Ok(3));
    }

    #[tokio::test]
    async fn test_repair_out_of_range_chapter() {
        let mut storage = MockStorage::new();
        storage.add_file("/sd/chapters.txt", b"99");
        let store = store();

        let repair = store
            .repair(&mut storage, RecordKind::Chapter, 99, 5)
            .await
            .unwrap();
        assert_eq!(repair, Repair::Reset { stale: Some(99) });
        assert_eq!(storage.text("/sd/chapters.txt"), Some("0"));
    }

    #[tokio::test]
    async fn test_repair_bound_is_exclusive_for_both_kinds() {
        let mut storage = MockStorage::new();
        storage.add_file("/sd/books.txt", b"2");
        storage.add_file("/sd/chapters.txt", b"5");
        let store = store();

        let book = store.repair(&mut storage, RecordKind::Book, 2, 2).await.unwrap();
        let chapter = store
            .repair(&mut storage, RecordKind::Chapter, 5, 5)
            .await
            .unwrap();
        assert!(book.was_reset());
        assert!(chapter.was_reset());

        storage.add_file("/sd/chapters.txt", b"4");
        let kept = store
            .repair(&mut storage, RecordKind::Chapter, 4, 5)
            .await
            .unwrap();
        assert_eq!(kept, Repair::Kept(4));
    }

    #[tokio::test]
    async fn test_repair_empty_record_even_when_in_range() {
        let mut storage = MockStorage::new();
        storage.add_file("/sd/books.txt", b"");
        let repair = store()
            .repair(&mut storage, RecordKind::Book, 0, 3)
            .await
            .unwrap();
        assert!(repair.was_reset());
        assert_eq!(storage.text("/sd/books.txt"), Some("0"));
    }

    #[tokio::test]
    async fn test_restore_rewrites_garbage() {
        let mut storage = MockStorage::new();
        storage.add_file("/sd/books.txt", b"abc");
        let repair = store()
            .restore(&mut storage, RecordKind::Book, 3)
            .await
            .unwrap();
        assert_eq!(repair, Repair::Reset { stale: None });
        assert_eq!(repair.value(), 0);
        assert_eq!(storage.text("/sd/books.txt"), Some("0"));
    }

    #[tokio::test]
    async fn test_locate_finds_existing_records() {
        let mut storage = MockStorage::new();
        storage.add_file("/sd/Books_state.txt", b"1");
        storage.add_file("/sd/chapters.txt", b"2");
        storage.add_file("/sd/.books.txt.partial", b"9");
        storage.add_dir("/sd/book");

        let store = ProgressStore::locate(&mut storage, &RecordLayout::default())
            .await
            .unwrap();
        assert_eq!(store.path(RecordKind::Book), "/sd/Books_state.txt");
        assert_eq!(store.path(RecordKind::Chapter), "/sd/chapters.txt");
        assert_eq!(store.read(&mut storage, RecordKind::Book).await, Ok(1));
    }

    #[tokio::test]
    async fn test_locate_falls_back_to_defaults() {
        let mut storage = MockStorage::new();
        storage.add_dir("/sd/book");
        let store = ProgressStore::locate(&mut storage, &RecordLayout::default())
            .await
            .unwrap();
        assert_eq!(store.path(RecordKind::Book), "/sd/books.txt");
        assert_eq!(store.path(RecordKind::Chapter), "/sd/chapters.txt");
    }
}
