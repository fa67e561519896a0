//! Application configuration and constants
//!
//! Central defaults for paths, assets and tuning. Runtime code takes these
//! through `playback::PlayerConfig` so deployments and tests can override
//! them; nothing else should hardcode a path.
//!
//! # Media card layout
//!
//! ```text
//! /sd/
//! ├── books.txt        — current book index (plain decimal text)
//! ├── chapters.txt     — current chapter index (plain decimal text)
//! └── book/
//!     ├── 01 Moby Dick/
//!     │   ├── 01-Loomings.wav
//!     │   ├── 02-The Carpet-Bag.wav
//!     │   └── cover.bmp
//!     └── 02 .../
//! ```
//!
//! Book directories and chapter files carry a two-digit prefix so that
//! lexicographic order is reading order.

/// The application name
pub const APP_NAME: &str = "One Button Reader";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Media card mount point; progress records live directly beneath it.
pub const MEDIA_ROOT: &str = "/sd";

/// Directory whose subdirectories are the books.
pub const BOOK_ROOT: &str = "/sd/book";

/// Filename prefix that identifies the book progress record.
pub const BOOK_RECORD_PREFIX: &str = "books";

/// Filename prefix that identifies the chapter progress record.
pub const CHAPTER_RECORD_PREFIX: &str = "chapters";

/// Book record used when the card carries none yet.
pub const DEFAULT_BOOK_RECORD: &str = "/sd/books.txt";

/// Chapter record used when the card carries none yet.
pub const DEFAULT_CHAPTER_RECORD: &str = "/sd/chapters.txt";

/// Artwork shown when no book is being read (board flash).
pub const DEFAULT_COVER: &str = "images/begin_reading.bmp";

/// Played once at power-up.
pub const WELCOME_CLIP: &str = "audio_files/Begin_reading.wav";

/// Played between the last chapter of a book and the next book.
pub const NEXT_BOOK_CLIP: &str = "audio_files/Move_to_next_book.wav";

/// Played after the last chapter of the last book.
pub const BOOKS_FINISHED_CLIP: &str = "audio_files/Books_finished.wav";

/// Voice gain at power-up.
pub const DEFAULT_GAIN: f32 = 0.15;

/// Gain change per encoder detent.
pub const VOLUME_STEP: f32 = 0.005;

/// The reference board mounts the encoder so that clockwise counts
/// down; the player negates positions when this is set.
pub const ENCODER_INVERTED: bool = true;

/// How long a transitional announcement holds the player, in milliseconds.
pub const TRANSITION_DWELL_MS: u64 = 10_000;

/// Control loop period, in milliseconds.
pub const TICK_MS: u64 = 100;

/// Full application title (name + version)
pub const fn app_title() -> &'static str {
    APP_NAME
}
