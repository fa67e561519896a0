//! Playback core for the one-button reader — progress records, transport,
//! chapter/book progression, volume, and the tick-driven player.
//!
//! # Modules
//!
//! - [`progress`] — the two durable records (book, chapter) and their repair
//! - [`transport`] — Idle / Playing / Paused from a single button
//! - [`progression`] — next chapter, next book, or end of library
//! - [`volume`] — rotary encoder to voice gain
//! - [`player`] — `Player`: owns the devices and all reading state
//! - [`runner`] — the control loop
//!
//! # Logging
//!
//! Enable `defmt` on hardware or `tracing` on the desktop; with neither the
//! log statements compile away.
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![allow(async_fn_in_trait)]

#[macro_use]
mod fmt;

pub mod player;
pub mod progress;
pub mod progression;
pub mod runner;
pub mod transport;
pub mod volume;

pub use player::{BootFailure, Devices, Player, PlayerConfig, PlayerError, PlayerState, Position};
pub use progress::{ProgressError, ProgressStore, RecordKind, RecordLayout, Repair};
pub use progression::{decide, Advance, AfterAnnouncement, Phase};
pub use runner::run;
pub use transport::{SessionStatus, Transport, TransportAction};
pub use volume::VolumeController;
