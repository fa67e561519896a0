// Desktop/tooling crate — unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod card;
mod check;
mod sim;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "One-button reader development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check host and no_std builds, clippy and formatting
    Check,
    /// Report books, chapters, covers and progress records on a card
    CheckLibrary {
        /// Host directory holding `sd/` (the simulator's media root)
        #[arg(long, env = "READER_MEDIA_ROOT")]
        media_root: PathBuf,
    },
    /// Set both progress records back to the first chapter of the first book
    ResetProgress {
        #[arg(long, env = "READER_MEDIA_ROOT")]
        media_root: PathBuf,
    },
    /// Run the desktop simulator
    Sim {
        #[arg(long, env = "READER_MEDIA_ROOT")]
        media_root: PathBuf,
        /// Simulated chapter length in seconds
        #[arg(long)]
        track_secs: Option<u64>,
        #[arg(short, long)]
        release: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => check::run(),
        Commands::CheckLibrary { media_root } => card::check(&media_root),
        Commands::ResetProgress { media_root } => card::reset(&media_root),
        Commands::Sim {
            media_root,
            track_secs,
            release,
        } => sim::run(&media_root, track_secs, release),
    }
}
