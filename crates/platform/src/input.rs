//! Input device abstraction

/// Input device trait for the play key and the volume encoder.
///
/// Debouncing and quadrature decoding happen below this trait; the control
/// loop samples it once per tick.
pub trait InputDevice {
    /// Sample the inputs (non-blocking).
    fn poll(&mut self) -> InputSnapshot;
}

/// Input state sampled once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSnapshot {
    /// The play key produced a falling edge since the previous poll
    pub button_fell: bool,
    /// Absolute rotary encoder count (monotonic per detent, wraps never)
    pub encoder_position: i32,
}

impl InputSnapshot {
    /// Snapshot with no press at encoder `position`.
    pub const fn idle(position: i32) -> Self {
        Self {
            button_fell: false,
            encoder_position: position,
        }
    }

    /// Snapshot with a press at encoder `position`.
    pub const fn press(position: i32) -> Self {
        Self {
            button_fell: true,
            encoder_position: position,
        }
    }
}
