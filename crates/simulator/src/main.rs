//! Desktop simulator for the one-button reader.
//!
//! Runs the player against a host directory laid out like the card plus
//! the board flash. Press Enter for the button; type `+` or `-` (repeat
//! for more detents) to turn the volume knob.

#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use embassy_time::Duration;
use platform::config::{self, TICK_MS};
use platform::storage_local::LocalFileStorage;
use playback::{run, Devices, Player, PlayerConfig};
use simulator::{LogDisplay, LogIndicator, SimulatedAudio, StdinInput};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "reader-sim")]
#[command(about = "Desktop simulator for the one-button audiobook reader")]
#[command(version)]
struct Args {
    /// Host directory holding `sd/`, `audio_files/` and `images/`
    #[arg(short, long, env = "READER_MEDIA_ROOT")]
    media_root: PathBuf,

    /// Simulated length of every chapter, in seconds
    #[arg(short, long, default_value = "30", env = "READER_TRACK_SECS")]
    track_secs: u64,

    /// Simulated length of every announcement clip, in seconds
    #[arg(long, default_value = "3")]
    clip_secs: u64,

    /// How long a between-books announcement holds the player, in seconds
    #[arg(long, default_value_t = config::TRANSITION_DWELL_MS / 1_000)]
    dwell_secs: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    info!("{}", config::app_title());
    info!("media root: {}", args.media_root.display());

    let devices = Devices {
        storage: LocalFileStorage::new(&args.media_root),
        audio: SimulatedAudio::new(
            &args.media_root,
            std::time::Duration::from_secs(args.track_secs),
        )
        .with_clip_len(std::time::Duration::from_secs(args.clip_secs)),
        indicator: LogIndicator::default(),
        display: LogDisplay::new(&args.media_root),
    };
    let player_config = PlayerConfig {
        dwell: Duration::from_secs(args.dwell_secs),
        ..PlayerConfig::default()
    };

    let mut player = match Player::boot(devices, player_config).await {
        Ok(player) => player,
        Err(failure) => bail!("boot failed: {}", failure.error),
    };

    println!("Enter = button, + / - = volume, Ctrl-C = quit");
    let mut input = StdinInput::spawn();
    tokio::select! {
        () = run(&mut player, &mut input, Duration::from_millis(TICK_MS)) => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("shutting down");
        }
    }
    Ok(())
}
