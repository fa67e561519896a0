//! LibraryIndex — sorted book list plus the chapter set of one book.
//!
//! Only the selected book's chapters are held in memory. Moving to another
//! book rebuilds the set from the card, so the footprint stays at
//! [`MAX_BOOKS`] book paths plus [`MAX_CHAPTERS`] chapter paths.

use heapless::Vec;
use platform::storage::{EntryKind, Storage};

use crate::scanner::{EntryClass, Scanner};
use crate::track::{join_path, Book, Chapter, MediaPath};

/// Most book directories the index holds.
pub const MAX_BOOKS: usize = 64;

/// Most chapter files one book may contain.
pub const MAX_CHAPTERS: usize = 128;

/// Error type for index operations.
#[derive(Debug, PartialEq, Eq)]
pub enum IndexError<E> {
    /// The underlying storage failed.
    Storage(E),
    /// More entries than the index can hold.
    Full,
    /// The requested position does not exist.
    OutOfBounds,
    /// An entry's full path does not fit in a [`MediaPath`].
    PathTooLong,
}

/// Books in reading order.
pub type BookList = Vec<Book, MAX_BOOKS>;

/// Chapters of one book in reading order.
pub type ChapterList = Vec<Chapter, MAX_CHAPTERS>;

/// Playable content of one book directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterSet {
    /// Audio files sorted by name
    pub chapters: ChapterList,
    /// First `.bmp` by name, if the book has one
    pub cover: Option<MediaPath>,
}

/// First failure seen inside a `list_dir` visitor.
#[derive(Clone, Copy)]
enum Overflow {
    Full,
    PathTooLong,
}

impl Overflow {
    fn into_error<E>(self) -> IndexError<E> {
        match self {
            Overflow::Full => IndexError::Full,
            Overflow::PathTooLong => IndexError::PathTooLong,
        }
    }
}

/// List the book directories directly under `root`, sorted by name.
///
/// Hidden directories and plain files are skipped. An empty result is not
/// an error here; callers decide what an empty library means.
pub async fn list_books<S: Storage>(
    storage: &mut S,
    root: &str,
) -> Result<BookList, IndexError<S::Error>> {
    let mut paths: Vec<MediaPath, MAX_BOOKS> = Vec::new();
    let mut overflow = None;

    storage
        .list_dir(root, |entry| {
            if overflow.is_some() || entry.kind != EntryKind::Dir || entry.is_hidden() {
                return;
            }
            match join_path(root, entry.name) {
                Some(path) => {
                    if paths.push(path).is_err() {
                        overflow = Some(Overflow::Full);
                    }
                }
                None => overflow = Some(Overflow::PathTooLong),
            }
        })
        .await
        .map_err(IndexError::Storage)?;

    if let Some(overflow) = overflow {
        return Err(overflow.into_error());
    }

    // All paths share `root`, so path order is name order.
    paths.sort_unstable();

    let mut books = BookList::new();
    for (ordinal, path) in paths.into_iter().enumerate() {
        books
            .push(Book { path, ordinal })
            .map_err(|_| IndexError::Full)?;
    }
    Ok(books)
}

/// Collect the chapters and cover of the book directory at `book_dir`.
pub async fn load_chapters<S: Storage>(
    storage: &mut S,
    book_dir: &str,
) -> Result<ChapterSet, IndexError<S::Error>> {
    let mut set = ChapterSet::default();
    let mut overflow = None;

    storage
        .list_dir(book_dir, |entry| {
            if overflow.is_some() {
                return;
            }
            let Some(class) = Scanner::classify(&entry) else {
                return;
            };
            let Some(path) = join_path(book_dir, entry.name) else {
                overflow = Some(Overflow::PathTooLong);
                return;
            };
            match class {
                EntryClass::Chapter(format) => {
                    if set.chapters.push(Chapter { path, format }).is_err() {
                        overflow = Some(Overflow::Full);
                    }
                }
                EntryClass::Cover => {
                    let earlier = set.cover.as_ref().map_or(true, |current| path < *current);
                    if earlier {
                        set.cover = Some(path);
                    }
                }
            }
        })
        .await
        .map_err(IndexError::Storage)?;

    if let Some(overflow) = overflow {
        return Err(overflow.into_error());
    }

    set.chapters.sort_unstable_by(|a, b| a.path.cmp(&b.path));
    Ok(set)
}

/// The book list and the chapter set of the currently selected book.
#[derive(Debug, Default)]
pub struct LibraryIndex {
    books: BookList,
    selected: Option<usize>,
    chapters: ChapterSet,
}

impl LibraryIndex {
    /// Scan `root` for books. No book is selected yet.
    pub async fn scan<S: Storage>(
        storage: &mut S,
        root: &str,
    ) -> Result<Self, IndexError<S::Error>> {
        let books = list_books(storage, root).await?;
        Ok(Self::from_books(books))
    }

    /// Build an index over an already listed set of books.
    pub fn from_books(books: BookList) -> Self {
        Self {
            books,
            selected: None,
            chapters: ChapterSet::default(),
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn book(&self, index: usize) -> Option<&Book> {
        self.books.get(index)
    }

    pub fn total_books(&self) -> usize {
        self.books.len()
    }

    /// Make `index` the current book and rebuild its chapter set.
    ///
    /// The previous chapter set is dropped first; if loading fails the
    /// book stays selected with no chapters.
    pub async fn select<S: Storage>(
        &mut self,
        storage: &mut S,
        index: usize,
    ) -> Result<(), IndexError<S::Error>> {
        let book = self.books.get(index).ok_or(IndexError::OutOfBounds)?;
        let dir = book.path.clone();

        self.chapters = ChapterSet::default();
        self.selected = Some(index);
        self.chapters = load_chapters(storage, &dir).await?;
        Ok(())
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_book(&self) -> Option<&Book> {
        self.selected.and_then(|i| self.books.get(i))
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters.chapters
    }

    pub fn total_chapters(&self) -> usize {
        self.chapters.chapters.len()
    }

    pub fn chapter(&self, index: usize) -> Option<&Chapter> {
        self.chapters.chapters.get(index)
    }

    /// Cover of the selected book.
    pub fn cover(&self) -> Option<&str> {
        self.chapters.cover.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::track::AudioFormat;
    use platform::mocks::{MockError, MockStorage};

    fn card() -> MockStorage {
        let mut storage = MockStorage::new();
        storage.add_file("/sd/book/02 Dracula/02-Voyage.mp3", b"ID3");
        storage.add_file("/sd/book/02 Dracula/01-Harker.mp3", b"ID3");
        storage.add_file("/sd/book/01 Moby Dick/02-Carpet-Bag.wav", b"RIFF");
        storage.add_file("/sd/book/01 Moby Dick/01-Loomings.wav", b"RIFF");
        storage.add_file("/sd/book/01 Moby Dick/cover.bmp", b"BM");
        storage.add_file("/sd/book/01 Moby Dick/alt.bmp", b"BM");
        storage.add_file("/sd/book/01 Moby Dick/notes.txt", b"x");
        storage.add_file("/sd/book/01 Moby Dick/._01-Loomings.wav", b"x");
        storage.add_dir("/sd/book/.Trashes");
        storage.add_file("/sd/book/readme.txt", b"x");
        storage
    }

    #[tokio::test]
    async fn test_list_books_sorted_skips_hidden_and_files() {
        let mut storage = card();
        let books = list_books(&mut storage, "/sd/book").await.unwrap();
        let names: std::vec::Vec<&str> = books.iter().map(Book::name).collect();
        assert_eq!(names, ["01 Moby Dick", "02 Dracula"]);
        assert_eq!(books[1].ordinal, 1);
    }

    #[tokio::test]
    async fn test_list_books_missing_root() {
        let mut storage = MockStorage::new();
        let err = list_books(&mut storage, "/sd/book").await.unwrap_err();
        assert!(matches!(err, IndexError::Storage(MockError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_books_empty_root() {
        let mut storage = MockStorage::new();
        storage.add_dir("/sd/book");
        let books = list_books(&mut storage, "/sd/book").await.unwrap();
        assert!(books.is_empty());
    }

    #[tokio::test]
    async fn test_load_chapters_sorted_with_first_cover() {
        let mut storage = card();
        let set = load_chapters(&mut storage, "/sd/book/01 Moby Dick")
            .await
            .unwrap();
        let names: std::vec::Vec<&str> = set.chapters.iter().map(Chapter::file_name).collect();
        assert_eq!(names, ["01-Loomings.wav", "02-Carpet-Bag.wav"]);
        assert_eq!(set.chapters[0].format, AudioFormat::Wav);
        assert_eq!(set.cover.as_deref(), Some("/sd/book/01 Moby Dick/alt.bmp"));
    }

    #[tokio::test]
    async fn test_load_chapters_too_many() {
        let mut storage = MockStorage::new();
        for i in 0..=MAX_CHAPTERS {
            storage.add_file(&format!("/sd/book/01 Big/{i:03}.wav"), b"RIFF");
        }
        let err = load_chapters(&mut storage, "/sd/book/01 Big")
            .await
            .unwrap_err();
        assert_eq!(err, IndexError::Full);
    }

    #[tokio::test]
    async fn test_select_rebuilds_chapter_set() {
        let mut storage = card();
        let mut index = LibraryIndex::scan(&mut storage, "/sd/book").await.unwrap();
        assert_eq!(index.total_books(), 2);
        assert_eq!(index.selected(), None);
        assert_eq!(index.total_chapters(), 0);

        index.select(&mut storage, 0).await.unwrap();
        assert_eq!(index.total_chapters(), 2);
        assert!(index.cover().is_some());

        index.select(&mut storage, 1).await.unwrap();
        assert_eq!(index.selected_book().unwrap().name(), "02 Dracula");
        assert_eq!(index.chapter(0).unwrap().file_name(), "01-Harker.mp3");
        assert_eq!(index.cover(), None);
        assert!(index.chapter(2).is_none());
    }

    #[tokio::test]
    async fn test_select_out_of_bounds() {
        let mut storage = card();
        let mut index = LibraryIndex::scan(&mut storage, "/sd/book").await.unwrap();
        assert_eq!(
            index.select(&mut storage, 2).await,
            Err(IndexError::OutOfBounds)
        );
    }
}
