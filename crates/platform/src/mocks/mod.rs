//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests.
//!
//! Mocks that take part in ordering checks can share a [`Journal`]: every
//! storage write and audio command is appended to it, so a test can assert
//! that a progress record hit the card before the next chapter started.

#![cfg(any(test, feature = "std"))]

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::*;

/// Shared, ordered log of side effects across mocks.
pub type Journal = Rc<RefCell<Vec<String>>>;

/// Create an empty [`Journal`].
pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

fn record(journal: Option<&Journal>, line: String) {
    if let Some(journal) = journal {
        journal.borrow_mut().push(line);
    }
}

/// Error returned by mocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockError {
    /// Path does not exist
    NotFound(String),
    /// Failure requested by the test
    Injected,
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// In-memory file tree.
#[derive(Default)]
pub struct MockStorage {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
    fail_writes: bool,
    write_count: usize,
    journal: Option<Journal>,
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn parent_of(path: &str) -> Option<&str> {
    let idx = path.rfind('/')?;
    if idx == 0 {
        Some("/")
    } else {
        path.get(..idx)
    }
}

fn child_name<'a>(parent: &str, path: &'a str) -> Option<&'a str> {
    if parent_of(path)? != parent {
        return None;
    }
    path.rsplit('/').next()
}

impl MockStorage {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Log writes into `journal`.
    #[must_use]
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Create directory `path` and its ancestors.
    pub fn add_dir(&mut self, path: &str) {
        let mut current = normalize(path);
        while current != "/" {
            self.dirs.insert(current.clone());
            match parent_of(&current) {
                Some(parent) => current = parent.to_string(),
                None => break,
            }
        }
    }

    /// Create file `path` (and its parent directories) with `contents`.
    pub fn add_file(&mut self, path: &str, contents: &[u8]) {
        let path = normalize(path);
        if let Some(parent) = parent_of(&path) {
            let parent = parent.to_string();
            self.add_dir(&parent);
        }
        self.files.insert(path, contents.to_vec());
    }

    /// Delete file `path`.
    pub fn remove_file(&mut self, path: &str) {
        self.files.remove(&normalize(path));
    }

    /// Contents of file `path`.
    pub fn contents(&self, path: &str) -> Option<&[u8]> {
        self.files.get(&normalize(path)).map(Vec::as_slice)
    }

    /// Contents of file `path` as text.
    pub fn text(&self, path: &str) -> Option<&str> {
        self.contents(path).and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Make every subsequent `write_file` fail.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.write_count
    }
}

/// Read handle into a [`MockStorage`] file snapshot.
pub struct MockFile {
    data: Vec<u8>,
    pos: usize,
}

impl File for MockFile {
    type Error = MockError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let rest = self.data.get(self.pos..).unwrap_or(&[]);
        let n = rest.len().min(buf.len());
        if let (Some(dst), Some(src)) = (buf.get_mut(..n), rest.get(..n)) {
            dst.copy_from_slice(src);
        }
        self.pos = self.pos.saturating_add(n);
        Ok(n)
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

impl Storage for MockStorage {
    type Error = MockError;
    type File = MockFile;

    async fn open_file(&mut self, path: &str) -> Result<Self::File, Self::Error> {
        let data = self
            .files
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| MockError::NotFound(path.to_string()))?;
        Ok(MockFile { data, pos: 0 })
    }

    async fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        let path = normalize(path);
        Ok(self.files.contains_key(&path) || self.dirs.contains(&path))
    }

    async fn list_dir<F>(&mut self, path: &str, mut visit: F) -> Result<(), Self::Error>
    where
        F: FnMut(DirEntry<'_>),
    {
        let path = normalize(path);
        if !self.dirs.contains(&path) {
            return Err(MockError::NotFound(path));
        }
        for dir in &self.dirs {
            if let Some(name) = child_name(&path, dir) {
                visit(DirEntry {
                    name,
                    kind: EntryKind::Dir,
                });
            }
        }
        for file in self.files.keys() {
            if let Some(name) = child_name(&path, file) {
                visit(DirEntry {
                    name,
                    kind: EntryKind::File,
                });
            }
        }
        Ok(())
    }

    async fn file_size(&mut self, path: &str) -> Result<u64, Self::Error> {
        self.files
            .get(&normalize(path))
            .map(|data| data.len() as u64)
            .ok_or_else(|| MockError::NotFound(path.to_string()))
    }

    async fn write_file(&mut self, path: &str, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(MockError::Injected);
        }
        record(
            self.journal.as_ref(),
            format!("write {path}={}", String::from_utf8_lossy(data)),
        );
        self.add_file(path, data);
        self.write_count = self.write_count.saturating_add(1);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Audio
// ---------------------------------------------------------------------------

/// Mock single-voice engine.
///
/// A loaded waveform plays until the test calls [`MockAudio::finish`].
#[derive(Default)]
pub struct MockAudio {
    loaded: Option<String>,
    paused: bool,
    gain: Option<GainLevel>,
    history: Vec<String>,
    missing: BTreeSet<String>,
    pause_count: usize,
    resume_count: usize,
    stop_count: usize,
    fail_controls: bool,
    journal: Option<Journal>,
}

impl MockAudio {
    /// Create new mock audio engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Log commands into `journal`.
    #[must_use]
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Make `play(path)` fail as if the asset were unreadable.
    pub fn mark_missing(&mut self, path: &str) {
        self.missing.insert(path.to_string());
    }

    /// Make every subsequent `pause` and `resume` fail, leaving the voice
    /// as it was.
    pub fn fail_controls(&mut self, fail: bool) {
        self.fail_controls = fail;
    }

    /// Simulate the loaded waveform reaching its end.
    pub fn finish(&mut self) {
        self.loaded = None;
        self.paused = false;
    }

    /// Waveform currently in the voice.
    pub fn loaded(&self) -> Option<&str> {
        self.loaded.as_deref()
    }

    /// Every path passed to `play`, in order.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Check if output is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Last gain applied.
    pub fn gain(&self) -> Option<GainLevel> {
        self.gain
    }

    /// Number of `pause` calls.
    pub fn pause_count(&self) -> usize {
        self.pause_count
    }

    /// Number of `resume` calls.
    pub fn resume_count(&self) -> usize {
        self.resume_count
    }

    /// Number of `stop` calls.
    pub fn stop_count(&self) -> usize {
        self.stop_count
    }
}

impl AudioEngine for MockAudio {
    type Error = MockError;

    async fn play(&mut self, path: &str) -> Result<(), Self::Error> {
        self.history.push(path.to_string());
        if self.missing.contains(path) {
            self.loaded = None;
            return Err(MockError::NotFound(path.to_string()));
        }
        record(self.journal.as_ref(), format!("play {path}"));
        self.loaded = Some(path.to_string());
        self.paused = false;
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), Self::Error> {
        self.pause_count = self.pause_count.saturating_add(1);
        if self.fail_controls {
            return Err(MockError::Injected);
        }
        self.paused = true;
        Ok(())
    }

    async fn resume(&mut self) -> Result<(), Self::Error> {
        self.resume_count = self.resume_count.saturating_add(1);
        if self.fail_controls {
            return Err(MockError::Injected);
        }
        self.paused = false;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), Self::Error> {
        self.stop_count = self.stop_count.saturating_add(1);
        record(self.journal.as_ref(), "stop".to_string());
        self.loaded = None;
        self.paused = false;
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.loaded.is_some()
    }

    fn set_gain(&mut self, gain: GainLevel) {
        self.gain = Some(gain);
    }
}

// ---------------------------------------------------------------------------
// Indicator / display / input
// ---------------------------------------------------------------------------

/// Mock key backlight recording every signal.
#[derive(Default)]
pub struct MockIndicator {
    history: Vec<Signal>,
}

impl MockIndicator {
    /// Create new mock indicator
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal currently shown.
    pub fn current(&self) -> Option<Signal> {
        self.history.last().copied()
    }

    /// All signals, in order.
    pub fn history(&self) -> &[Signal] {
        &self.history
    }
}

impl Indicator for MockIndicator {
    fn set(&mut self, signal: Signal) {
        self.history.push(signal);
    }
}

/// Mock cover display recording every image shown.
#[derive(Default)]
pub struct MockDisplay {
    history: Vec<Option<String>>,
    missing: BTreeSet<String>,
}

impl MockDisplay {
    /// Create new mock display
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `show(Some(path))` fail.
    pub fn mark_missing(&mut self, path: &str) {
        self.missing.insert(path.to_string());
    }

    /// Image currently shown (`None` when blank or never set).
    pub fn current(&self) -> Option<&str> {
        self.history.last().and_then(Option::as_deref)
    }
}

impl CoverDisplay for MockDisplay {
    type Error = MockError;

    async fn show(&mut self, image: Option<&str>) -> Result<(), Self::Error> {
        if let Some(path) = image {
            if self.missing.contains(path) {
                return Err(MockError::NotFound(path.to_string()));
            }
        }
        self.history.push(image.map(ToString::to_string));
        Ok(())
    }
}

/// Mock input device replaying queued snapshots.
///
/// When the queue is empty `poll` reports no press at the last encoder
/// position.
pub struct MockInput {
    snapshots: heapless::Deque<InputSnapshot, 16>,
    position: i32,
}

impl MockInput {
    /// Create new mock input
    pub fn new() -> Self {
        Self {
            snapshots: heapless::Deque::new(),
            position: 0,
        }
    }

    /// Queue a button press.
    pub fn press(&mut self) -> Result<(), InputSnapshot> {
        self.snapshots.push_back(InputSnapshot::press(self.position))
    }

    /// Queue an encoder movement of `detents`.
    pub fn turn(&mut self, detents: i32) -> Result<(), InputSnapshot> {
        self.position = self.position.saturating_add(detents);
        self.snapshots.push_back(InputSnapshot::idle(self.position))
    }
}

impl Default for MockInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputDevice for MockInput {
    fn poll(&mut self) -> InputSnapshot {
        self.snapshots
            .pop_front()
            .unwrap_or(InputSnapshot::idle(self.position))
    }
}
