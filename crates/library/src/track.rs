//! Book and chapter records.

use heapless::String;

/// Longest device path the index stores, in bytes.
pub const PATH_CAPACITY: usize = 160;

/// A bounded device path (`/sd/book/01 Title/01-Chapter.wav`).
pub type MediaPath = String<PATH_CAPACITY>;

/// Audio container/codec format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// Free Lossless Audio Codec
    Flac,
    /// MPEG Audio Layer III
    Mp3,
    /// Waveform Audio File Format
    Wav,
}

/// One book directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Full directory path on the card
    pub path: MediaPath,
    /// Position in the sorted book list
    pub ordinal: usize,
}

impl Book {
    /// Directory name without its parent (`01 Moby Dick`).
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(self.path.as_str())
    }
}

/// One chapter track inside the selected book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Full file path on the card
    pub path: MediaPath,
    /// Format implied by the extension
    pub format: AudioFormat,
}

impl Chapter {
    /// File name without its directory.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(self.path.as_str())
    }
}

/// `dir` + `/` + `name`, or `None` if the result exceeds [`PATH_CAPACITY`].
pub fn join_path(dir: &str, name: &str) -> Option<MediaPath> {
    let mut path = MediaPath::new();
    path.push_str(dir.trim_end_matches('/')).ok()?;
    path.push('/').ok()?;
    path.push_str(name).ok()?;
    Some(path)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path_inserts_single_separator() {
        let p = join_path("/sd/book/", "01 Moby Dick").expect("fits");
        assert_eq!(p.as_str(), "/sd/book/01 Moby Dick");
    }

    #[test]
    fn test_join_path_rejects_overlong() {
        let long = "x".repeat(PATH_CAPACITY);
        assert!(join_path("/sd/book", &long).is_none());
    }

    #[test]
    fn test_book_name_is_last_component() {
        let book = Book {
            path: join_path("/sd/book", "02 Dracula").expect("fits"),
            ordinal: 1,
        };
        assert_eq!(book.name(), "02 Dracula");
    }

    #[test]
    fn test_chapter_file_name() {
        let chapter = Chapter {
            path: join_path("/sd/book/02 Dracula", "03-Harker.wav").expect("fits"),
            format: AudioFormat::Wav,
        };
        assert_eq!(chapter.file_name(), "03-Harker.wav");
    }

    #[test]
    fn test_path_capacity() {
        assert_eq!(MediaPath::new().capacity(), PATH_CAPACITY);
    }
}
