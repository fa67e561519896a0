//! Hardware Abstraction Layer (HAL) for the one-button audiobook reader
//!
//! This crate provides trait-based abstractions for every collaborator the
//! player talks to, enabling development and testing without physical
//! hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (simulator / board crate)
//!         ↓
//! Feature Layers (playback, library)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Drivers (SD card, I2S mixer, NeoPixel, TFT, seesaw encoder)
//! ```
//!
//! # Peripherals
//!
//! - [`Storage`] - Media card file system (listing, records)
//! - [`AudioEngine`] - Waveform playback with a single voice
//! - [`Indicator`] - Key backlight colour
//! - [`CoverDisplay`] - Cover artwork screen
//! - [`InputDevice`] - Debounced button + rotary encoder
//!
//! # Features
//!
//! - `std`: Enable standard library support ([`storage_local`], [`mocks`])
//! - `defmt`: Enable defmt logging derives

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // single-threaded control loop, Send bounds not needed

pub mod audio;
pub mod audio_types;
pub mod config;
pub mod display;
pub mod indicator;
pub mod input;
pub mod storage;

#[cfg(any(test, feature = "std"))]
pub mod mocks;
#[cfg(any(test, feature = "std"))]
pub mod storage_local;

// Re-export main high-level traits
pub use audio::AudioEngine;
pub use audio_types::GainLevel;
pub use display::CoverDisplay;
pub use indicator::{Indicator, Signal};
pub use input::{InputDevice, InputSnapshot};
pub use storage::{DirEntry, EntryKind, File, Storage};
