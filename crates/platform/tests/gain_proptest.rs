//! Property-based tests for gain math.
//! Verifies invariants hold for ALL inputs, not just fixed examples.

use platform::audio_types::GainLevel;

proptest::proptest! {
    /// GainLevel::new never leaves [0.0, 1.0], whatever it is fed.
    #[test]
    fn gain_new_always_in_range(raw in proptest::num::f32::ANY) {
        let g = GainLevel::new(raw);
        assert!((0.0..=1.0).contains(&g.get()), "GainLevel::new({raw}) = {}", g.get());
    }

    /// Offsetting is monotone: a larger delta never yields a quieter voice.
    #[test]
    fn gain_offset_is_monotone(start in 0.0f32..=1.0, a in -2.0f32..2.0, b in -2.0f32..2.0) {
        let base = GainLevel::new(start);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        assert!(base.offset(lo).get() <= base.offset(hi).get());
    }
}

#[test]
fn gain_default_is_configured_power_up_level() {
    assert!((GainLevel::default().get() - platform::config::DEFAULT_GAIN).abs() < f32::EPSILON);
}

#[test]
fn gain_level_is_one_float_wide() {
    assert_eq!(core::mem::size_of::<GainLevel>(), core::mem::size_of::<f32>());
}
