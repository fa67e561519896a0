//! Rotary encoder to voice gain.
//!
//! The encoder reports an absolute detent count. Each tick the change since
//! the previous reading moves the gain by `step` per detent, clamped to
//! [`GainLevel`]'s range. The level is not persisted; every boot starts at
//! the default gain.

use platform::audio_types::GainLevel;

/// Tracks the encoder baseline and the current gain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeController {
    level: GainLevel,
    step: f32,
    inverted: bool,
    last: Option<i32>,
}

impl VolumeController {
    /// `inverted` negates encoder positions for boards where clockwise
    /// counts down.
    pub fn new(level: GainLevel, step: f32, inverted: bool) -> Self {
        Self {
            level,
            step,
            inverted,
            last: None,
        }
    }

    /// Current gain.
    pub fn level(&self) -> GainLevel {
        self.level
    }

    /// Feed the latest encoder position.
    ///
    /// The first reading only sets the baseline. Returns the new gain when
    /// the position moved.
    pub fn update(&mut self, position: i32) -> Option<GainLevel> {
        let position = if self.inverted {
            position.saturating_neg()
        } else {
            position
        };
        let last = self.last.replace(position)?;
        let delta = position.saturating_sub(last);
        if delta == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let change = delta as f32 * self.step;
        self.level = self.level.offset(change);
        Some(self.level)
    }
}
