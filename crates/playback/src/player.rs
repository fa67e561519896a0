//! The player: one owner for all reading state, driven one tick at a time.
//!
//! Each [`Player::tick`] services, in order:
//!
//! 1. the volume knob (always, even during announcements),
//! 2. the end of an announcement hold,
//! 3. the one-time welcome clip,
//! 4. the button,
//! 5. chapter completion.
//!
//! Every progress write for a transition is issued before the audio for
//! that transition is loaded, so a power cut resumes at the track that was
//! about to play.

use core::fmt;

use embassy_time::{Duration, Instant};
use library::{IndexError, LibraryIndex};
use platform::audio_types::GainLevel;
use platform::config as defaults;
use platform::{AudioEngine, CoverDisplay, Indicator, InputSnapshot, Signal, Storage};

use crate::progress::{ProgressError, ProgressStore, RecordKind, RecordLayout};
use crate::progression::{decide, AfterAnnouncement, Advance, Phase};
use crate::transport::{SessionStatus, Transport, TransportAction};
use crate::volume::VolumeController;

/// Runtime settings. `Default` takes everything from [`platform::config`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerConfig {
    /// Where the progress records live
    pub records: RecordLayout<'static>,
    /// Directory whose subdirectories are the books
    pub book_root: &'static str,
    /// Artwork shown while no book is being read
    pub default_cover: &'static str,
    /// Played once after boot
    pub welcome_clip: &'static str,
    /// Played between books
    pub next_book_clip: &'static str,
    /// Played after the last book
    pub finished_clip: &'static str,
    /// Gain at boot
    pub default_gain: GainLevel,
    /// Gain change per encoder detent
    pub volume_step: f32,
    /// Negate encoder positions
    pub encoder_inverted: bool,
    /// How long a transitional announcement holds the player
    pub dwell: Duration,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            records: RecordLayout::default(),
            book_root: defaults::BOOK_ROOT,
            default_cover: defaults::DEFAULT_COVER,
            welcome_clip: defaults::WELCOME_CLIP,
            next_book_clip: defaults::NEXT_BOOK_CLIP,
            finished_clip: defaults::BOOKS_FINISHED_CLIP,
            default_gain: GainLevel::new(defaults::DEFAULT_GAIN),
            volume_step: defaults::VOLUME_STEP,
            encoder_inverted: defaults::ENCODER_INVERTED,
            dwell: Duration::from_millis(defaults::TRANSITION_DWELL_MS),
        }
    }
}

/// Player failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayerError {
    /// No book directory under the book root.
    #[error("no books found under the book root")]
    EmptyLibrary,
    /// The card failed.
    #[error("storage failure")]
    Storage,
    /// A progress record could not be read or written.
    #[error("progress record unusable")]
    Progress,
    /// Too many entries, a path too long, or a book index out of range.
    #[error("library does not fit the index")]
    Index,
    /// The engine refused a pause or resume.
    #[error("audio engine failure")]
    Audio,
}

impl PlayerError {
    /// Short name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyLibrary => "empty library",
            Self::Storage => "storage",
            Self::Progress => "progress record",
            Self::Index => "index",
            Self::Audio => "audio",
        }
    }
}

impl<E> From<IndexError<E>> for PlayerError {
    fn from(err: IndexError<E>) -> Self {
        match err {
            IndexError::Storage(_) => Self::Storage,
            IndexError::Full | IndexError::OutOfBounds | IndexError::PathTooLong => Self::Index,
        }
    }
}

impl<E> From<ProgressError<E>> for PlayerError {
    fn from(err: ProgressError<E>) -> Self {
        match err {
            ProgressError::Storage(_) => Self::Storage,
            ProgressError::Corrupt | ProgressError::PathTooLong => Self::Progress,
        }
    }
}

/// Resume position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    /// Index into the sorted book list
    pub book: usize,
    /// Index into the selected book's sorted chapters
    pub chapter: usize,
}

/// Everything the player knows between ticks.
#[derive(Debug)]
pub struct PlayerState {
    /// Mirrors the progress records
    pub position: Position,
    /// Book list and the selected book's chapters
    pub library: LibraryIndex,
    /// Idle / playing / paused
    pub transport: Transport,
    /// The welcome clip has been started
    pub welcomed: bool,
    /// Announcement hold, if any
    pub phase: Phase,
    /// Encoder baseline and gain
    pub volume: VolumeController,
}

/// The collaborators the player drives.
pub struct Devices<S, A, I, D> {
    /// Media card
    pub storage: S,
    /// Single-voice audio engine
    pub audio: A,
    /// Key backlight
    pub indicator: I,
    /// Cover screen
    pub display: D,
}

/// A failed [`Player::boot`], handing the devices back.
pub struct BootFailure<S, A, I, D> {
    /// Why boot stopped
    pub error: PlayerError,
    /// The devices, with the indicator showing [`Signal::NoBook`]
    pub devices: Devices<S, A, I, D>,
}

impl<S, A, I, D> fmt::Debug for BootFailure<S, A, I, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootFailure")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// The single-button reader.
pub struct Player<S, A, I, D> {
    devices: Devices<S, A, I, D>,
    config: PlayerConfig,
    records: ProgressStore,
    state: PlayerState,
}

impl<S, A, I, D> Player<S, A, I, D>
where
    S: Storage,
    A: AudioEngine,
    I: Indicator,
    D: CoverDisplay,
{
    /// Scan the card, repair the progress records and get ready to read.
    ///
    /// On failure the indicator shows [`Signal::NoBook`] and the devices are
    /// returned inside the [`BootFailure`].
    pub async fn boot(
        mut devices: Devices<S, A, I, D>,
        config: PlayerConfig,
    ) -> Result<Self, BootFailure<S, A, I, D>> {
        info!("{} v{} starting", defaults::APP_NAME, defaults::APP_VERSION);
        match Self::prepare(&mut devices, &config).await {
            Ok((records, state)) => Ok(Self {
                devices,
                config,
                records,
                state,
            }),
            Err(error) => {
                error!("boot failed: {}", error.as_str());
                devices.indicator.set(Signal::NoBook);
                Err(BootFailure { error, devices })
            }
        }
    }

    async fn prepare(
        devices: &mut Devices<S, A, I, D>,
        config: &PlayerConfig,
    ) -> Result<(ProgressStore, PlayerState), PlayerError> {
        let storage = &mut devices.storage;
        let records = ProgressStore::locate(storage, &config.records).await?;

        let mut library = LibraryIndex::scan(storage, config.book_root).await?;
        if library.total_books() == 0 {
            return Err(PlayerError::EmptyLibrary);
        }

        let book = records
            .restore(storage, RecordKind::Book, library.total_books())
            .await?
            .value();
        library.select(storage, book).await?;
        if let Some(selected) = library.selected_book() {
            info!(
                "book to read: {} ({} chapters)",
                selected.name(),
                library.total_chapters()
            );
        }
        let chapter = records
            .restore(storage, RecordKind::Chapter, library.total_chapters())
            .await?
            .value();

        if devices.display.show(Some(config.default_cover)).await.is_err() {
            warn!("default cover {} unavailable", config.default_cover);
        }
        let volume =
            VolumeController::new(config.default_gain, config.volume_step, config.encoder_inverted);
        devices.audio.set_gain(volume.level());
        devices.indicator.set(Signal::Ready);

        Ok((
            records,
            PlayerState {
                position: Position { book, chapter },
                library,
                transport: Transport::new(),
                welcomed: false,
                phase: Phase::Steady,
                volume,
            },
        ))
    }

    /// Reading state, for inspection.
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Settings the player was booted with.
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// The progress records in use.
    pub fn records(&self) -> &ProgressStore {
        &self.records
    }

    /// The driven devices.
    pub fn devices(&self) -> &Devices<S, A, I, D> {
        &self.devices
    }

    /// Mutable access to the devices.
    pub fn devices_mut(&mut self) -> &mut Devices<S, A, I, D> {
        &mut self.devices
    }

    /// Tear the player down and keep the hardware.
    pub fn into_devices(self) -> Devices<S, A, I, D> {
        self.devices
    }

    /// Run one control-loop iteration.
    ///
    /// A failed pause or resume leaves the session as it was, so the next
    /// press retries it. The caller logs errors and keeps ticking.
    pub async fn tick(&mut self, input: InputSnapshot, now: Instant) -> Result<(), PlayerError> {
        self.service_volume(input.encoder_position);

        if let Some(then) = self.state.phase.expire(now) {
            debug!("announcement hold over");
            self.finish_announcement(then).await;
        }

        if !self.state.welcomed
            && self.state.transport.status() == SessionStatus::Idle
            && !self.state.phase.is_announcing()
            && !self.devices.audio.is_playing()
        {
            self.welcome().await;
        }

        if input.button_fell {
            self.press().await?;
        }

        if self.chapter_finished() {
            self.advance(now).await?;
        }
        Ok(())
    }

    fn service_volume(&mut self, position: i32) {
        if let Some(level) = self.state.volume.update(position) {
            debug!("gain {}", level.get());
            self.devices.audio.set_gain(level);
        }
    }

    async fn welcome(&mut self) {
        self.state.welcomed = true;
        let clip = self.config.welcome_clip;
        if self.devices.audio.play(clip).await.is_err() {
            warn!("welcome clip {} unavailable", clip);
        }
    }

    async fn press(&mut self) -> Result<(), PlayerError> {
        if self.state.phase.is_announcing() {
            info!("button ignored during announcement");
            return Ok(());
        }
        let action = self.state.transport.pending();
        match action {
            TransportAction::Start => {
                info!(
                    "start reading book {} chapter {}",
                    self.state.position.book,
                    self.state.position.chapter
                );
                // A chapter that will not play is skipped by progression,
                // which needs the session to be playing.
                self.state.transport.commit(action);
                self.start_chapter(self.state.position.chapter).await;
            }
            TransportAction::Pause => {
                self.devices.audio.pause().await.map_err(|_| {
                    error!("pause failed, still playing");
                    PlayerError::Audio
                })?;
                info!("pause");
                self.state.transport.commit(action);
                self.devices.indicator.set(Signal::Paused);
            }
            TransportAction::Resume => {
                self.devices.audio.resume().await.map_err(|_| {
                    error!("resume failed, still paused");
                    PlayerError::Audio
                })?;
                info!("resume");
                self.state.transport.commit(action);
                self.devices.indicator.set(Signal::Playing);
            }
        }
        Ok(())
    }

    /// A chapter ended by itself: reading, engine idle, not holding for an
    /// announcement.
    fn chapter_finished(&self) -> bool {
        self.state.transport.status() == SessionStatus::Playing
            && !self.state.phase.is_announcing()
            && !self.devices.audio.is_playing()
    }

    async fn advance(&mut self, now: Instant) -> Result<(), PlayerError> {
        let book = self.state.position.book;
        let next_chapter = self.state.position.chapter.saturating_add(1);

        self.persist(RecordKind::Chapter, next_chapter).await;
        self.state.position.chapter = next_chapter;
        // Refresh the book record even though it has not changed.
        self.persist(RecordKind::Book, book).await;

        let advance = decide(
            next_chapter,
            self.state.library.total_chapters(),
            book,
            self.state.library.total_books(),
        );
        info!("chapter finished: {}", advance.as_str());

        match advance {
            Advance::NextChapter { chapter } => {
                self.play_chapter(chapter).await;
            }
            Advance::NextBook { book } => {
                self.move_to(Position { book, chapter: 0 }).await;
                let clip = self.config.next_book_clip;
                self.announce(clip, now, AfterAnnouncement::StartBook).await;
            }
            Advance::LibraryFinished => {
                self.move_to(Position::default()).await;
                let clip = self.config.finished_clip;
                self.announce(clip, now, AfterAnnouncement::ResetLibrary).await;
            }
        }
        Ok(())
    }

    async fn finish_announcement(&mut self, then: AfterAnnouncement) {
        match then {
            AfterAnnouncement::StartBook => {
                self.load_book(self.state.position.book).await;
                self.start_chapter(0).await;
            }
            AfterAnnouncement::ResetLibrary => {
                info!("all books finished, back to the first book");
                if self.devices.audio.stop().await.is_err() {
                    error!("audio engine did not stop");
                }
                self.devices.indicator.set(Signal::NoBook);
                self.show(self.config.default_cover).await;
                self.load_book(0).await;
                if !self.state.transport.finish() {
                    self.state.transport.stop();
                }
            }
        }
    }

    /// Persist a new (book, chapter) pair, book first.
    async fn move_to(&mut self, position: Position) {
        self.persist(RecordKind::Book, position.book).await;
        self.persist(RecordKind::Chapter, position.chapter).await;
        self.state.position = position;
    }

    /// Write one record. A failed write is logged; reading goes on from the
    /// in-memory position.
    async fn persist(&mut self, kind: RecordKind, value: usize) {
        if self
            .records
            .write(&mut self.devices.storage, kind, value)
            .await
            .is_err()
        {
            error!("could not save {} {}", kind.as_str(), value);
        }
    }

    async fn load_book(&mut self, book: usize) {
        if self
            .state
            .library
            .select(&mut self.devices.storage, book)
            .await
            .is_err()
        {
            error!("could not load chapters of book {}", book);
        }
    }

    /// Light up, show the cover and play `chapter` of the selected book.
    async fn start_chapter(&mut self, chapter: usize) {
        self.devices.indicator.set(Signal::Playing);
        let cover = self
            .state
            .library
            .cover()
            .unwrap_or(self.config.default_cover);
        if self.devices.display.show(Some(cover)).await.is_err() {
            warn!("cover {} unavailable", cover);
        }
        self.play_chapter(chapter).await;
    }

    /// Play `chapter` of the selected book. A chapter that cannot be played
    /// leaves the engine idle, so the next tick moves past it.
    async fn play_chapter(&mut self, chapter: usize) {
        let played = match self.state.library.chapter(chapter) {
            Some(track) => {
                let path = track.path.as_str();
                match self.devices.audio.play(path).await {
                    Ok(()) => {
                        info!("playing {}", path);
                        true
                    }
                    Err(_) => {
                        error!("cannot play {}, skipping", path);
                        false
                    }
                }
            }
            None => {
                warn!(
                    "book {} has no chapter {}, skipping",
                    self.state.position.book,
                    chapter
                );
                false
            }
        };
        if !played && self.devices.audio.stop().await.is_err() {
            error!("audio engine did not stop");
        }
    }

    async fn announce(&mut self, clip: &str, now: Instant, then: AfterAnnouncement) {
        if self.devices.audio.play(clip).await.is_err() {
            error!("announcement {} unavailable", clip);
        }
        let until = now.checked_add(self.config.dwell).unwrap_or(Instant::MAX);
        self.state.phase = Phase::Announcing { until, then };
    }

    async fn show(&mut self, image: &str) {
        if self.devices.display.show(Some(image)).await.is_err() {
            warn!("image {} unavailable", image);
        }
    }
}
