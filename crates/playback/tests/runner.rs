//! The control loop on the host time driver.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Timer};
use platform::mocks::{MockAudio, MockDisplay, MockIndicator, MockInput, MockStorage};
use platform::Signal;
use playback::{run, Devices, Player, PlayerConfig, SessionStatus};

fn card() -> MockStorage {
    let mut storage = MockStorage::new();
    storage.add_file("/sd/book/01 First/01.wav", b"RIFF");
    storage.add_file("/sd/book/01 First/02.wav", b"RIFF");
    storage.add_file("/sd/books.txt", b"0");
    storage.add_file("/sd/chapters.txt", b"1");
    storage
}

#[tokio::test]
async fn run_polls_input_and_ticks() {
    let devices = Devices {
        storage: card(),
        audio: MockAudio::new(),
        indicator: MockIndicator::new(),
        display: MockDisplay::new(),
    };
    let mut player = Player::boot(devices, PlayerConfig::default())
        .await
        .expect("boot");
    let mut input = MockInput::new();
    input.press().unwrap();

    let outcome = select(
        run(&mut player, &mut input, Duration::from_millis(10)),
        Timer::after(Duration::from_millis(100)),
    )
    .await;
    assert!(matches!(outcome, Either::Second(())));

    assert!(player.state().welcomed);
    assert_eq!(player.state().transport.status(), SessionStatus::Playing);
    assert_eq!(
        player.devices().audio.loaded(),
        Some("/sd/book/01 First/02.wav")
    );
    assert_eq!(player.devices().indicator.current(), Some(Signal::Playing));
}
