//! What to play after a chapter ends, and the announcement hold between
//! books.

use embassy_time::Instant;

/// Where reading goes after the current chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Advance {
    /// Same book, chapter `chapter`.
    NextChapter {
        /// Chapter to play next
        chapter: usize,
    },
    /// Chapters exhausted; continue with chapter 0 of `book`.
    NextBook {
        /// Book to load next
        book: usize,
    },
    /// Last chapter of the last book; roll over to (0, 0) and go idle.
    LibraryFinished,
}

impl Advance {
    /// Branch name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NextChapter { .. } => "next chapter",
            Self::NextBook { .. } => "next book",
            Self::LibraryFinished => "library finished",
        }
    }
}

/// Choose the branch once `next_chapter` has been persisted.
///
/// The last valid chapter index is `total_chapters - 1` and counts as
/// "more chapters remain". A book with no chapters always moves on.
pub fn decide(
    next_chapter: usize,
    total_chapters: usize,
    book: usize,
    total_books: usize,
) -> Advance {
    if next_chapter < total_chapters {
        return Advance::NextChapter {
            chapter: next_chapter,
        };
    }
    match book.checked_add(1) {
        Some(next_book) if next_book < total_books => Advance::NextBook { book: next_book },
        _ => Advance::LibraryFinished,
    }
}

/// Work left for when an announcement's hold runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AfterAnnouncement {
    /// Load the (already persisted) book and play its first chapter.
    StartBook,
    /// Stop, show the default artwork and go idle on book 0.
    ResetLibrary,
}

/// Whether the player is holding for an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Normal operation.
    #[default]
    Steady,
    /// A transitional clip is playing; chapter advance is suppressed until
    /// `until`.
    Announcing {
        /// End of the hold
        until: Instant,
        /// What to do when it ends
        then: AfterAnnouncement,
    },
}

impl Phase {
    /// `true` while holding.
    pub fn is_announcing(&self) -> bool {
        matches!(self, Self::Announcing { .. })
    }

    /// If the hold has run out at `now`, return to `Steady` and hand back
    /// the pending work.
    pub fn expire(&mut self, now: Instant) -> Option<AfterAnnouncement> {
        match *self {
            Self::Announcing { until, then } if now >= until => {
                *self = Self::Steady;
                Some(then)
            }
            _ => None,
        }
    }
}
