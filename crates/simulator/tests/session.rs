//! A whole listening session on a host card, with simulated time.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::fs;
use std::path::Path;
use std::time::Duration as StdDuration;

use embassy_time::{Duration, Instant};
use platform::storage_local::LocalFileStorage;
use platform::{InputDevice, Signal};
use playback::{Devices, Player, PlayerConfig, SessionStatus};
use simulator::devices::Command;
use simulator::{LogDisplay, LogIndicator, SimulatedAudio, StdinInput};
use tempfile::TempDir;

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"RIFF").unwrap();
}

fn card() -> TempDir {
    let tmp = TempDir::new().unwrap();
    for rel in [
        "sd/book/01 Only/01.wav",
        "sd/book/01 Only/02.wav",
        "audio_files/Begin_reading.wav",
        "audio_files/Books_finished.wav",
        "images/begin_reading.bmp",
    ] {
        touch(tmp.path(), rel);
    }
    tmp
}

fn record(root: &Path, name: &str) -> String {
    fs::read_to_string(root.join("sd").join(name)).unwrap()
}

#[tokio::test]
async fn reads_whole_library_then_resets() {
    let tmp = card();
    let root = tmp.path();
    let devices = Devices {
        storage: LocalFileStorage::new(root),
        audio: SimulatedAudio::new(root, StdDuration::from_millis(30))
            .with_clip_len(StdDuration::from_millis(20)),
        indicator: LogIndicator::default(),
        display: LogDisplay::new(root),
    };
    let config = PlayerConfig {
        dwell: Duration::from_millis(50),
        ..PlayerConfig::default()
    };
    let mut player = Player::boot(devices, config).await.expect("boot");
    assert_eq!(record(root, "books.txt"), "0");
    assert_eq!(record(root, "chapters.txt"), "0");

    let (tx, mut input) = StdinInput::channel();
    tx.send(Command::Press).unwrap();

    let mut saw_second_chapter = false;
    for _ in 0..100 {
        player.tick(input.poll(), Instant::now()).await.unwrap();
        saw_second_chapter |=
            player.devices().audio.current() == Some("/sd/book/01 Only/02.wav");
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }

    assert!(saw_second_chapter);
    assert_eq!(player.state().transport.status(), SessionStatus::Idle);
    assert_eq!(player.devices().indicator.current(), Some(Signal::NoBook));
    assert_eq!(
        player.devices().display.current(),
        Some("images/begin_reading.bmp")
    );
    assert_eq!(record(root, "books.txt"), "0");
    assert_eq!(record(root, "chapters.txt"), "0");
}

#[tokio::test]
async fn missing_book_root_fails_boot() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let devices = Devices {
        storage: LocalFileStorage::new(root),
        audio: SimulatedAudio::new(root, StdDuration::from_secs(1)),
        indicator: LogIndicator::default(),
        display: LogDisplay::new(root),
    };
    let failure = Player::boot(devices, PlayerConfig::default())
        .await
        .err()
        .expect("boot must fail");
    assert_eq!(failure.devices.indicator.current(), Some(Signal::NoBook));
}
