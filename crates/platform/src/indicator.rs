//! Status indicator abstraction (NeoPixel under the play key)

/// Player states the key colour can signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Signal {
    /// Booted, nothing playing yet
    Ready,
    /// A chapter is playing
    Playing,
    /// Playback is paused
    Paused,
    /// Nothing left to read (or no library on the card)
    NoBook,
}

impl Signal {
    /// 24-bit `0xRRGGBB` colour for this signal.
    pub const fn rgb(self) -> u32 {
        match self {
            Self::Ready => 0xF0_0F_FF,   // purple
            Self::Playing => 0x00_F0_00, // green
            Self::Paused => 0xF0_F0_00,  // yellow
            Self::NoBook => 0xF0_00_0F,  // red purple
        }
    }

    /// Short lowercase name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::NoBook => "no-book",
        }
    }
}

/// Indicator trait
pub trait Indicator {
    /// Show `signal` until the next call.
    fn set(&mut self, signal: Signal);
}
