//! Replay command: play a stored song through the sinks, no game round.

use std::net::SocketAddr;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use tokio::sync::Mutex;

use melodica_relay::start_replay;

use super::common::{build_relay, resolve_song};

/// Run the replay command.
///
/// # Arguments
/// * `song` - Catalog id of the song to replay (fallback song if `None`)
/// * `catalog_path` - Path to the catalog file
/// * `serial_path` - Serial device for the controller board, if connected
/// * `relay_addr` - Address of the note bridge endpoint, if running
/// * `timeout_ms` - Per-send relay deadline in milliseconds
/// * `gap_ms` - Pause between notes in milliseconds
///
/// # Returns
/// Exit code: 0 on completion or cancellation
pub fn run(
    song: Option<u64>,
    catalog_path: &Path,
    serial_path: Option<&str>,
    relay_addr: Option<SocketAddr>,
    timeout_ms: u64,
    gap_ms: u64,
) -> Result<ExitCode> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    rt.block_on(async move {
        let (title, sequence) = resolve_song(song, catalog_path)?;
        let relay = build_relay(serial_path, relay_addr, timeout_ms).await;
        if !relay.has_sinks() {
            eprintln!(
                "{} no sinks configured; notes will only be listed here",
                "warning:".yellow().bold()
            );
        }

        println!(
            "{} {} ({} notes)",
            "Replaying:".cyan().bold(),
            title,
            sequence.len()
        );

        let relay = Arc::new(Mutex::new(relay));
        let mut playback = start_replay(relay, sequence, Duration::from_millis(gap_ms));

        loop {
            tokio::select! {
                ack = playback.next_ack() => {
                    match ack {
                        Some(ack) => {
                            println!(
                                "  {} Playing note: {} {}",
                                "*".cyan(),
                                ack.note,
                                format!("({})", ack.report.summary()).dimmed()
                            );
                        }
                        None => break,
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    println!("\n{} Playback cancelled.", "STOPPED".yellow().bold());
                    return Ok(ExitCode::SUCCESS);
                }
            }
        }

        println!("{} Song playback complete!", "SUCCESS".green().bold());
        Ok(ExitCode::SUCCESS)
    })
}
