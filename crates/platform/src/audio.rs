//! Audio engine abstraction

use crate::audio_types::GainLevel;

/// Single-voice waveform player.
///
/// The engine owns decoding and output; callers only hand it asset paths.
/// On the reference board this is an I2S output feeding a one-voice mixer
/// (16-bit mono PCM at 16 kHz).
pub trait AudioEngine {
    /// Error type
    type Error: core::fmt::Debug;

    /// Load the waveform at `path` into the voice and start it from the top.
    ///
    /// Replaces whatever the voice was holding.
    fn play(&mut self, path: &str) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Pause output, keeping the loaded waveform and its position.
    fn pause(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Resume a paused waveform.
    fn resume(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Stop output and release the loaded waveform.
    fn stop(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// `true` while the voice holds a waveform that has not run to its end.
    ///
    /// A paused waveform still counts as playing; this mirrors the mixer
    /// voice flag, not the output clock.
    fn is_playing(&self) -> bool;

    /// Set the voice gain.
    fn set_gain(&mut self, gain: GainLevel);
}
