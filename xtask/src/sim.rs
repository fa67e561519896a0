//! xtask sim: build and start the desktop simulator on a prepared card.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::Command;

pub fn run(media_root: &Path, track_secs: Option<u64>, release: bool) -> Result<()> {
    println!("{}", "Starting reader simulator".cyan().bold());
    println!("{}", format!("  media root: {}", media_root.display()).dimmed());
    println!();

    let mut cmd = Command::new("cargo");
    cmd.args(["run", "-p", "simulator", "--bin", "reader-sim"]);
    if release {
        cmd.arg("--release");
    }
    cmd.arg("--").arg("--media-root").arg(media_root);
    if let Some(secs) = track_secs {
        cmd.arg("--track-secs").arg(secs.to_string());
    }

    let status = cmd.status().context("Failed to start the simulator")?;
    if !status.success() {
        anyhow::bail!("simulator exited with {status}");
    }
    Ok(())
}
