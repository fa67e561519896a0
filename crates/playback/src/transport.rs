//! Transport state machine.
//!
//! `Transport` is a pure, allocation-free state machine that tracks whether
//! a reading session is idle, playing, or paused. It performs no I/O: the
//! [`Player`](crate::player::Player) executes the returned
//! [`TransportAction`] against the audio engine and indicator.
//!
//! ```text
//!          press: Start            press: Pause
//!   Idle ───────────────▶ Playing ─────────────▶ Paused
//!    ▲                     │   ▲                  │
//!    └─── finish / stop ───┘   └── press: Resume ─┘
//! ```

/// Current session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionStatus {
    /// Nothing is being read. The engine may still be playing an
    /// announcement.
    #[default]
    Idle,
    /// A chapter is loaded and audible.
    Playing,
    /// A chapter is loaded and held.
    Paused,
}

impl SessionStatus {
    /// Lower-case name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }
}

/// What a button press asks the player to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportAction {
    /// Load the current chapter, show the cover and start playback.
    Start,
    /// Hold the loaded chapter.
    Pause,
    /// Continue the held chapter without reloading it.
    Resume,
}

/// Single-button transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transport {
    status: SessionStatus,
}

impl Transport {
    /// Create a transport in the `Idle` state.
    pub const fn new() -> Self {
        Self {
            status: SessionStatus::Idle,
        }
    }

    /// What the next button press asks for, without changing state.
    ///
    /// Transitions:
    /// - `Idle    → Playing` with [`TransportAction::Start`]
    /// - `Playing → Paused`  with [`TransportAction::Pause`]
    /// - `Paused  → Playing` with [`TransportAction::Resume`]
    pub const fn pending(&self) -> TransportAction {
        match self.status {
            SessionStatus::Idle => TransportAction::Start,
            SessionStatus::Playing => TransportAction::Pause,
            SessionStatus::Paused => TransportAction::Resume,
        }
    }

    /// Record that `action` was carried out.
    pub fn commit(&mut self, action: TransportAction) {
        self.status = match action {
            TransportAction::Start | TransportAction::Resume => SessionStatus::Playing,
            TransportAction::Pause => SessionStatus::Paused,
        };
    }

    /// Apply one button press: [`pending`](Self::pending) then
    /// [`commit`](Self::commit).
    pub fn press(&mut self) -> TransportAction {
        let action = self.pending();
        self.commit(action);
        action
    }

    /// End the session because the library ran out.
    ///
    /// Only a playing session can finish; returns `false` otherwise.
    pub fn finish(&mut self) -> bool {
        if self.status == SessionStatus::Playing {
            self.status = SessionStatus::Idle;
            true
        } else {
            false
        }
    }

    /// Force the session back to `Idle`.
    pub fn stop(&mut self) {
        self.status = SessionStatus::Idle;
    }

    /// Current session state.
    pub fn status(&self) -> SessionStatus {
        self.status
    }
}
