//! Scanner — classifies directory entries of a book into chapters and covers.

use platform::storage::{DirEntry, EntryKind};

use crate::track::AudioFormat;

/// What a file inside a book directory is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryClass {
    /// An audio track that becomes a chapter
    Chapter(AudioFormat),
    /// Cover artwork
    Cover,
}

/// Stateless helper for extension filtering.
pub struct Scanner;

impl Scanner {
    /// Returns `true` when `ext` is a supported audio file extension.
    ///
    /// The comparison is **case-insensitive**. Supported extensions:
    /// `flac`, `mp3`, `wav`.
    pub fn is_supported_extension(ext: &str) -> bool {
        Self::format_for_extension(ext).is_some()
    }

    /// Derive an [`AudioFormat`] from a file extension, or return `None`.
    pub fn format_for_extension(ext: &str) -> Option<AudioFormat> {
        if ext.eq_ignore_ascii_case("flac") {
            Some(AudioFormat::Flac)
        } else if ext.eq_ignore_ascii_case("mp3") {
            Some(AudioFormat::Mp3)
        } else if ext.eq_ignore_ascii_case("wav") {
            Some(AudioFormat::Wav)
        } else {
            None
        }
    }

    /// Returns `true` for cover artwork (`bmp`, case-insensitive).
    pub fn is_cover_extension(ext: &str) -> bool {
        ext.eq_ignore_ascii_case("bmp")
    }

    /// Extension of `name` (text after the last `.`), if any.
    pub fn extension(name: &str) -> Option<&str> {
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            None
        } else {
            Some(ext)
        }
    }

    /// Classify a book directory entry; `None` means "ignore".
    ///
    /// Directories, dotfiles and unknown extensions are ignored.
    pub fn classify(entry: &DirEntry<'_>) -> Option<EntryClass> {
        if entry.kind != EntryKind::File || entry.is_hidden() {
            return None;
        }
        let ext = Self::extension(entry.name)?;
        if let Some(format) = Self::format_for_extension(ext) {
            Some(EntryClass::Chapter(format))
        } else if Self::is_cover_extension(ext) {
            Some(EntryClass::Cover)
        } else {
            None
        }
    }

    /// `true` when `name` starts with two ASCII digits (`01 Title`).
    ///
    /// Names without the prefix still load; they just sort wherever their
    /// first bytes put them.
    pub fn has_sort_prefix(name: &str) -> bool {
        let bytes = name.as_bytes();
        matches!(bytes, [a, b, ..] if a.is_ascii_digit() && b.is_ascii_digit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> DirEntry<'_> {
        DirEntry {
            name,
            kind: EntryKind::File,
        }
    }

    #[test]
    fn test_scanner_recognises_wav_extension() {
        assert!(Scanner::is_supported_extension("wav"));
    }

    #[test]
    fn test_scanner_rejects_jpg() {
        assert!(!Scanner::is_supported_extension("jpg"));
    }

    #[test]
    fn test_scanner_extension_case_insensitive() {
        assert!(Scanner::is_supported_extension("FLAC"));
        assert!(Scanner::is_supported_extension("MP3"));
        assert!(Scanner::is_supported_extension("WAV"));
        assert!(Scanner::is_cover_extension("BMP"));
    }

    #[test]
    fn test_classify_chapter_and_cover() {
        assert_eq!(
            Scanner::classify(&file("01-Loomings.WAV")),
            Some(EntryClass::Chapter(AudioFormat::Wav))
        );
        assert_eq!(Scanner::classify(&file("cover.bmp")), Some(EntryClass::Cover));
        assert_eq!(Scanner::classify(&file("notes.txt")), None);
    }

    #[test]
    fn test_classify_skips_dotfiles_and_dirs() {
        // macOS resource forks look like audio but are not.
        assert_eq!(Scanner::classify(&file("._01-Loomings.wav")), None);
        assert_eq!(Scanner::classify(&file(".wav")), None);
        let dir = DirEntry {
            name: "extras.wav",
            kind: EntryKind::Dir,
        };
        assert_eq!(Scanner::classify(&dir), None);
    }

    #[test]
    fn test_extension_edge_cases() {
        assert_eq!(Scanner::extension("a.b.wav"), Some("wav"));
        assert_eq!(Scanner::extension("noext"), None);
        assert_eq!(Scanner::extension("trailing."), None);
    }

    #[test]
    fn test_sort_prefix() {
        assert!(Scanner::has_sort_prefix("01 Moby Dick"));
        assert!(Scanner::has_sort_prefix("12-Chapter.wav"));
        assert!(!Scanner::has_sort_prefix("1 Moby Dick"));
        assert!(!Scanner::has_sort_prefix("Moby Dick"));
    }
}
