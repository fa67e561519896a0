//! Book library — book directory enumeration, chapter ordering, cover lookup.
//!
//! # Modules
//!
//! - [`track`] — `Book`, `Chapter` records and `AudioFormat`
//! - [`scanner`] — file name classification (chapter / cover / ignored)
//! - [`index`] — `LibraryIndex`: the sorted book list plus the chapter set
//!   of the one selected book
//!
//! Ordering is purely lexicographic. Books and chapters are expected to
//! carry a numeric prefix (`01 Title`, `02-Chapter.wav`) so that byte order
//! is reading order; nothing here reorders by meaning.

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![allow(missing_docs)]
#![allow(async_fn_in_trait)]

pub mod index;
pub mod scanner;
pub mod track;

// Top-level re-exports for convenience
pub use index::{
    list_books, load_chapters, BookList, ChapterList, ChapterSet, IndexError, LibraryIndex,
    MAX_BOOKS, MAX_CHAPTERS,
};
pub use scanner::{EntryClass, Scanner};
pub use track::{join_path, AudioFormat, Book, Chapter, MediaPath, PATH_CAPACITY};
