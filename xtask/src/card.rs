//! xtask check-library / reset-progress: inspect and fix a prepared card.
//!
//! Works on the same host layout the simulator uses: books under
//! `{root}/sd/book/`, progress records directly under `{root}/sd/`.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use colored::Colorize;
use embassy_futures::block_on;
use library::{list_books, load_chapters, IndexError, Scanner};
use platform::config;
use platform::storage_local::{LocalFileStorage, LocalStorageError};
use playback::{ProgressError, ProgressStore, RecordKind, RecordLayout};
use walkdir::WalkDir;

/// Something a reader would trip over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// Book directory name does not start with two digits.
    NoSortPrefix,
    /// Chapter file name does not start with two digits.
    ChapterWithoutPrefix(String),
    /// No playable chapter; the reader skips the book.
    NoChapters,
    /// A file the scanner ignores.
    Ignored(PathBuf),
}

impl Problem {
    fn describe(&self) -> String {
        match self {
            Self::NoSortPrefix => "name has no two-digit prefix; order may surprise".into(),
            Self::ChapterWithoutPrefix(name) => format!("chapter '{name}' has no two-digit prefix"),
            Self::NoChapters => "no playable chapters (.wav, .mp3, .flac); will be skipped".into(),
            Self::Ignored(path) => format!("ignored: {}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookReport {
    pub name: String,
    pub chapters: usize,
    pub cover: Option<String>,
    pub problems: Vec<Problem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordReport {
    pub path: String,
    /// `None` when missing or unreadable
    pub value: Option<usize>,
    /// Whether the reader would keep the value at boot
    pub valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryReport {
    pub books: Vec<BookReport>,
    pub book_record: RecordReport,
    pub chapter_record: RecordReport,
}

impl LibraryReport {
    pub fn problem_count(&self) -> usize {
        self.books.iter().map(|book| book.problems.len()).sum()
    }
}

fn index_error(err: IndexError<LocalStorageError>) -> anyhow::Error {
    match err {
        IndexError::Storage(inner) => anyhow!(inner),
        IndexError::Full => anyhow!("more entries than the reader can index"),
        IndexError::OutOfBounds => anyhow!("book index out of range"),
        IndexError::PathTooLong => anyhow!("a path is too long for the reader"),
    }
}

fn progress_error(err: ProgressError<LocalStorageError>) -> anyhow::Error {
    match err {
        ProgressError::Storage(inner) => anyhow!(inner),
        ProgressError::Corrupt => anyhow!("progress record unreadable"),
        ProgressError::PathTooLong => anyhow!("progress record path too long"),
    }
}

/// Files under `book_dir` that `load_chapters` will never look at.
fn ignored_files(book_dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(book_dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_str().unwrap_or("");
            let nested = entry.depth() > 1;
            let known = Scanner::extension(name).is_some_and(|ext| {
                Scanner::is_supported_extension(ext) || Scanner::is_cover_extension(ext)
            });
            nested || (!known && !name.starts_with('.'))
        })
        .map(|entry| {
            entry
                .path()
                .strip_prefix(book_dir)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| entry.path().to_path_buf())
        })
        .collect()
}

fn read_record(
    storage: &mut LocalFileStorage,
    store: &ProgressStore,
    kind: RecordKind,
    total: usize,
) -> RecordReport {
    let value = block_on(store.read(storage, kind)).ok();
    RecordReport {
        path: store.path(kind).to_owned(),
        value,
        valid: value.is_some_and(|value| value < total),
    }
}

/// Scan the card under `media_root` the way the reader does at boot.
pub fn inspect(media_root: &Path) -> Result<LibraryReport> {
    let mut storage = LocalFileStorage::new(media_root);
    let books = block_on(list_books(&mut storage, config::BOOK_ROOT)).map_err(index_error)?;

    let mut reports = Vec::with_capacity(books.len());
    for book in &books {
        let set = block_on(load_chapters(&mut storage, &book.path)).map_err(index_error)?;
        let mut problems = Vec::new();
        if !Scanner::has_sort_prefix(book.name()) {
            problems.push(Problem::NoSortPrefix);
        }
        if set.chapters.is_empty() {
            problems.push(Problem::NoChapters);
        }
        problems.extend(
            set.chapters
                .iter()
                .filter(|chapter| !Scanner::has_sort_prefix(chapter.file_name()))
                .map(|chapter| Problem::ChapterWithoutPrefix(chapter.file_name().to_owned())),
        );
        problems.extend(
            ignored_files(&storage.resolve(&book.path))
                .into_iter()
                .map(Problem::Ignored),
        );
        reports.push(BookReport {
            name: book.name().to_owned(),
            chapters: set.chapters.len(),
            cover: set.cover.as_ref().map(|cover| cover.as_str().to_owned()),
            problems,
        });
    }

    let store = block_on(ProgressStore::locate(&mut storage, &RecordLayout::default()))
        .map_err(progress_error)?;
    let book_record = read_record(&mut storage, &store, RecordKind::Book, reports.len());
    let chapters_of_saved = book_record
        .value
        .filter(|_| book_record.valid)
        .and_then(|book| reports.get(book))
        .map_or(0, |book| book.chapters);
    let chapter_record = read_record(&mut storage, &store, RecordKind::Chapter, chapters_of_saved);

    Ok(LibraryReport {
        books: reports,
        book_record,
        chapter_record,
    })
}

fn print_record(label: &str, record: &RecordReport) {
    let value = record
        .value
        .map_or_else(|| "missing".to_owned(), |value| value.to_string());
    let line = format!("  {label:<8} {:<24} {value}", record.path);
    if record.valid {
        println!("{}", line.green());
    } else {
        println!("{}  {}", line.yellow(), "(reset to 0 at boot)".dimmed());
    }
}

/// Entry point for `xtask check-library`.
pub fn check(media_root: &Path) -> Result<()> {
    println!();
    println!(
        "{}",
        format!("Checking library in {}", media_root.display()).cyan().bold()
    );
    println!();

    let report = inspect(media_root)?;
    if report.books.is_empty() {
        println!("{}", "  ✗ No books found; the reader will show no-book".red().bold());
    }
    for (ordinal, book) in report.books.iter().enumerate() {
        let cover = book.cover.as_deref().unwrap_or("default cover");
        println!(
            "  {:>2}. {} {}",
            ordinal,
            book.name.bold(),
            format!("({} chapters, {cover})", book.chapters).dimmed()
        );
        for problem in &book.problems {
            println!("      {}", format!("⚠ {}", problem.describe()).yellow());
        }
    }

    println!();
    println!("{}", "Progress records".cyan());
    print_record("book", &report.book_record);
    print_record("chapter", &report.chapter_record);
    println!();

    match report.problem_count() {
        0 => println!("{}", "✓ Library looks good".green().bold()),
        n => println!("{}", format!("⚠ {n} problem(s) found").yellow().bold()),
    }
    println!();
    Ok(())
}

/// Entry point for `xtask reset-progress`: start from the first chapter of
/// the first book.
pub fn reset(media_root: &Path) -> Result<()> {
    let mut storage = LocalFileStorage::new(media_root);
    let store = block_on(ProgressStore::locate(&mut storage, &RecordLayout::default()))
        .map_err(progress_error)?;
    for kind in [RecordKind::Book, RecordKind::Chapter] {
        block_on(store.write(&mut storage, kind, 0)).map_err(progress_error)?;
        println!(
            "{}",
            format!("  ✓ {} record {} = 0", kind.as_str(), store.path(kind)).green()
        );
    }
    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str, body: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn card() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "sd/book/01 Dune/01-Prologue.wav", b"RIFF");
        touch(root, "sd/book/01 Dune/02-Arrakis.mp3", b"ID3");
        touch(root, "sd/book/01 Dune/cover.bmp", b"BM");
        touch(root, "sd/book/01 Dune/notes.txt", b"x");
        touch(root, "sd/book/01 Dune/extras/03-Bonus.wav", b"RIFF");
        touch(root, "sd/book/Emma/chapter.flac", b"fLaC");
        fs::create_dir_all(root.join("sd/book/03 Empty")).unwrap();
        touch(root, "sd/books.txt", b"1");
        touch(root, "sd/chapters.txt", b"7");
        tmp
    }

    #[test]
    fn inspect_reports_books_in_reader_order() {
        let tmp = card();
        let report = inspect(tmp.path()).unwrap();
        let names: Vec<_> = report.books.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["01 Dune", "03 Empty", "Emma"]);

        let dune = &report.books[0];
        assert_eq!(dune.chapters, 2);
        assert_eq!(dune.cover.as_deref(), Some("/sd/book/01 Dune/cover.bmp"));
        assert_eq!(
            dune.problems,
            [
                Problem::Ignored(PathBuf::from("extras/03-Bonus.wav")),
                Problem::Ignored(PathBuf::from("notes.txt")),
            ]
        );
    }

    #[test]
    fn inspect_flags_naming_and_empty_books() {
        let tmp = card();
        let report = inspect(tmp.path()).unwrap();
        assert_eq!(report.books[1].problems, [Problem::NoChapters]);
        assert_eq!(
            report.books[2].problems,
            [
                Problem::NoSortPrefix,
                Problem::ChapterWithoutPrefix("chapter.flac".into()),
            ]
        );
        assert_eq!(report.problem_count(), 5);
    }

    #[test]
    fn inspect_validates_records_against_saved_book() {
        let tmp = card();
        let report = inspect(tmp.path()).unwrap();
        // Book 1 is "03 Empty", so any chapter is out of range.
        assert_eq!(report.book_record.value, Some(1));
        assert!(report.book_record.valid);
        assert_eq!(report.chapter_record.value, Some(7));
        assert!(!report.chapter_record.valid);
    }

    #[test]
    fn inspect_missing_records() {
        let tmp = card();
        fs::remove_file(tmp.path().join("sd/books.txt")).unwrap();
        let report = inspect(tmp.path()).unwrap();
        assert_eq!(report.book_record.path, config::DEFAULT_BOOK_RECORD);
        assert_eq!(report.book_record.value, None);
        assert!(!report.book_record.valid);
    }

    #[test]
    fn reset_zeroes_both_records() {
        let tmp = card();
        reset(tmp.path()).unwrap();
        assert_eq!(fs::read_to_string(tmp.path().join("sd/books.txt")).unwrap(), "0");
        assert_eq!(fs::read_to_string(tmp.path().join("sd/chapters.txt")).unwrap(), "0");
    }

    #[test]
    fn inspect_without_book_root_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(inspect(tmp.path()).is_err());
    }
}
