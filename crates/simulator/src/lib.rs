//! Desktop stand-ins for the reader's hardware.
//!
//! The simulator runs the real [`playback::Player`] against:
//!
//! - [`platform::storage_local::LocalFileStorage`] for the card,
//! - [`SimulatedAudio`], which "plays" a file by letting a timer run,
//! - [`LogIndicator`] and [`LogDisplay`], which log instead of lighting up,
//! - [`StdinInput`], which turns terminal lines into button presses and
//!   encoder steps.
//!
//! Host layout under the media root:
//!
//! ```text
//! {root}/sd/book/01 Title/01-Chapter.wav
//! {root}/sd/books.txt, {root}/sd/chapters.txt
//! {root}/audio_files/*.wav    (board flash clips)
//! {root}/images/*.bmp         (board flash artwork)
//! ```

#![allow(missing_docs)]
#![allow(async_fn_in_trait)]

pub mod devices;

pub use devices::{LogDisplay, LogIndicator, SimError, SimulatedAudio, StdinInput};
