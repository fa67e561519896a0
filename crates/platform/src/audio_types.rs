//! Audio domain newtypes for compile-time safety.
//!
//! - `GainLevel`: mixer voice level, clamped to 0.0–1.0

// ── GainLevel ────────────────────────────────────────────────────────────────

/// Mixer voice gain, clamped to `[0.0, 1.0]`.
///
/// NaN never makes it into a `GainLevel`: [`GainLevel::new`] maps it to
/// silence.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct GainLevel(f32);

impl GainLevel {
    /// Silence.
    pub const MIN: Self = Self(0.0);
    /// Full scale.
    pub const MAX: Self = Self(1.0);

    /// Create a `GainLevel`, clamping into `[0.0, 1.0]`.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            Self::MIN
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Return the inner level.
    #[must_use]
    pub fn get(self) -> f32 {
        self.0
    }

    /// Move the level by `delta`, saturating at both ends.
    #[must_use]
    pub fn offset(self, delta: f32) -> Self {
        Self::new(self.0 + delta)
    }
}

impl Default for GainLevel {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_GAIN)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_both_ends() {
        assert_eq!(GainLevel::new(1.7).get(), 1.0);
        assert_eq!(GainLevel::new(-0.2).get(), 0.0);
    }

    #[test]
    fn nan_is_silence() {
        assert_eq!(GainLevel::new(f32::NAN), GainLevel::MIN);
    }

    #[test]
    fn offset_saturates() {
        assert_eq!(GainLevel::MAX.offset(0.5), GainLevel::MAX);
        assert_eq!(GainLevel::MIN.offset(-0.5), GainLevel::MIN);
    }
}
