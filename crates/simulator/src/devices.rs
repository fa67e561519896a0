//! Host implementations of the platform traits.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use platform::audio_types::GainLevel;
use platform::{AudioEngine, CoverDisplay, Indicator, InputDevice, InputSnapshot, Signal};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Errors from the simulated devices.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("asset not found: {0}")]
    Missing(String),
}

/// Host path for a device path. Card paths (`/sd/...`) and board-flash
/// paths (`audio_files/...`) both live under `root`.
fn resolve(root: &Path, path: &str) -> PathBuf {
    root.join(path.trim_start_matches('/'))
}

fn require(root: &Path, path: &str) -> Result<PathBuf, SimError> {
    let host = resolve(root, path);
    if host.is_file() {
        Ok(host)
    } else {
        Err(SimError::Missing(path.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Audio
// ---------------------------------------------------------------------------

struct Voice {
    path: String,
    remaining: Duration,
    resumed_at: Option<Instant>,
}

impl Voice {
    fn finished(&self, now: Instant) -> bool {
        self.resumed_at
            .is_some_and(|start| now.saturating_duration_since(start) >= self.remaining)
    }
}

/// Single-voice engine that never decodes anything.
///
/// A card track "plays" for `track_len` of unpaused time; board clips
/// (paths without a leading `/`) for `clip_len`.
pub struct SimulatedAudio {
    root: PathBuf,
    track_len: Duration,
    clip_len: Duration,
    voice: Option<Voice>,
    gain: GainLevel,
}

impl SimulatedAudio {
    pub fn new(root: impl AsRef<Path>, track_len: Duration) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            track_len,
            clip_len: Duration::from_secs(3),
            voice: None,
            gain: GainLevel::default(),
        }
    }

    #[must_use]
    pub fn with_clip_len(mut self, clip_len: Duration) -> Self {
        self.clip_len = clip_len;
        self
    }

    pub fn gain(&self) -> GainLevel {
        self.gain
    }

    /// Path of the voice, while it is still sounding or held.
    pub fn current(&self) -> Option<&str> {
        self.voice
            .as_ref()
            .filter(|voice| !voice.finished(Instant::now()))
            .map(|voice| voice.path.as_str())
    }
}

impl AudioEngine for SimulatedAudio {
    type Error = SimError;

    async fn play(&mut self, path: &str) -> Result<(), Self::Error> {
        if let Err(err) = require(&self.root, path) {
            self.voice = None;
            return Err(err);
        }
        let remaining = if path.starts_with('/') {
            self.track_len
        } else {
            self.clip_len
        };
        tracing::info!(path, secs = remaining.as_secs_f32(), "audio: play");
        self.voice = Some(Voice {
            path: path.to_owned(),
            remaining,
            resumed_at: Some(Instant::now()),
        });
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), Self::Error> {
        if let Some(voice) = self.voice.as_mut() {
            if let Some(start) = voice.resumed_at.take() {
                voice.remaining = voice.remaining.saturating_sub(start.elapsed());
            }
            tracing::info!(path = voice.path.as_str(), "audio: pause");
        }
        Ok(())
    }

    async fn resume(&mut self) -> Result<(), Self::Error> {
        if let Some(voice) = self.voice.as_mut() {
            voice.resumed_at.get_or_insert_with(Instant::now);
            tracing::info!(path = voice.path.as_str(), "audio: resume");
        }
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), Self::Error> {
        self.voice = None;
        tracing::info!("audio: stop");
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.voice
            .as_ref()
            .is_some_and(|voice| !voice.finished(Instant::now()))
    }

    fn set_gain(&mut self, gain: GainLevel) {
        self.gain = gain;
        tracing::debug!(gain = gain.get(), "audio: gain");
    }
}

// ---------------------------------------------------------------------------
// Indicator / display
// ---------------------------------------------------------------------------

/// Key backlight that logs its colour.
#[derive(Debug, Default)]
pub struct LogIndicator {
    current: Option<Signal>,
}

impl LogIndicator {
    pub fn current(&self) -> Option<Signal> {
        self.current
    }
}

impl Indicator for LogIndicator {
    fn set(&mut self, signal: Signal) {
        if self.current != Some(signal) {
            tracing::info!(
                signal = signal.as_str(),
                rgb = %format!("#{:06X}", signal.rgb()),
                "indicator"
            );
        }
        self.current = Some(signal);
    }
}

/// Cover screen that logs the image it would draw.
pub struct LogDisplay {
    root: PathBuf,
    current: Option<String>,
}

impl LogDisplay {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            current: None,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

impl CoverDisplay for LogDisplay {
    type Error = SimError;

    async fn show(&mut self, image: Option<&str>) -> Result<(), Self::Error> {
        match image {
            Some(path) => {
                require(&self.root, path)?;
                tracing::info!(image = path, "display");
                self.current = Some(path.to_owned());
            }
            None => {
                tracing::info!("display: blank");
                self.current = None;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One line typed at the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Empty line: the button
    Press,
    /// `+++` or `--`: encoder detents
    Turn(i32),
}

impl Command {
    /// Parse a terminal line; anything unrecognised is `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let detents = i32::try_from(line.len()).unwrap_or(i32::MAX);
        if line.is_empty() {
            Some(Self::Press)
        } else if line.chars().all(|c| c == '+') {
            Some(Self::Turn(detents))
        } else if line.chars().all(|c| c == '-') {
            Some(Self::Turn(detents.saturating_neg()))
        } else {
            None
        }
    }
}

/// Button and encoder fed from terminal lines.
///
/// At most one press is reported per poll; further presses wait for the
/// next tick.
pub struct StdinInput {
    rx: UnboundedReceiver<Command>,
    pending: VecDeque<Command>,
    position: i32,
}

impl StdinInput {
    /// Input fed by whatever is sent on the returned channel.
    pub fn channel() -> (UnboundedSender<Command>, Self) {
        let (tx, rx) = unbounded_channel();
        let input = Self {
            rx,
            pending: VecDeque::new(),
            position: 0,
        };
        (tx, input)
    }

    /// Input fed by stdin, read on a background task.
    pub fn spawn() -> Self {
        let (tx, input) = Self::channel();
        tokio::spawn(read_stdin(tx));
        input
    }
}

async fn read_stdin(tx: UnboundedSender<Command>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match Command::parse(&line) {
            Some(command) => {
                if tx.send(command).is_err() {
                    break;
                }
            }
            None => tracing::warn!(line = line.as_str(), "unknown input; Enter, + or -"),
        }
    }
}

impl InputDevice for StdinInput {
    fn poll(&mut self) -> InputSnapshot {
        while let Ok(command) = self.rx.try_recv() {
            self.pending.push_back(command);
        }
        let mut button_fell = false;
        while let Some(command) = self.pending.pop_front() {
            match command {
                Command::Turn(detents) => self.position = self.position.saturating_add(detents),
                Command::Press => {
                    button_fell = true;
                    break;
                }
            }
        }
        InputSnapshot {
            button_fell,
            encoder_position: self.position,
        }
    }
}
