//! Play command: one interactive round of the matching game.
//!
//! The terminal stands in for the note buttons: type a note letter and
//! press Enter. Every accepted note is relayed to the configured sinks in
//! the background; relay trouble shows up as a dimmed status line and never
//! interrupts the round.

use std::net::SocketAddr;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use melodica_game::{MatchResult, Note};
use melodica_relay::GameSession;

use super::common::{build_relay, resolve_song};

/// Run the play command.
///
/// # Arguments
/// * `song` - Catalog id of the song to play (fallback song if `None`)
/// * `catalog_path` - Path to the catalog file
/// * `serial_path` - Serial device for the controller board, if connected
/// * `relay_addr` - Address of the note bridge endpoint, if running
/// * `timeout_ms` - Per-send relay deadline in milliseconds
/// * `auto_replay` - Replay the melody through the sinks after completion
///
/// # Returns
/// Exit code: 0 whether the round was completed or abandoned
pub fn run(
    song: Option<u64>,
    catalog_path: &Path,
    serial_path: Option<&str>,
    relay_addr: Option<SocketAddr>,
    timeout_ms: u64,
    auto_replay: bool,
) -> Result<ExitCode> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    rt.block_on(async move {
        run_round(
            song,
            catalog_path,
            serial_path,
            relay_addr,
            timeout_ms,
            auto_replay,
        )
        .await
    })
}

/// Run one round (async entry point).
async fn run_round(
    song: Option<u64>,
    catalog_path: &Path,
    serial_path: Option<&str>,
    relay_addr: Option<SocketAddr>,
    timeout_ms: u64,
    auto_replay: bool,
) -> Result<ExitCode> {
    let (title, sequence) = resolve_song(song, catalog_path)?;
    let relay = build_relay(serial_path, relay_addr, timeout_ms).await;

    let mut session = GameSession::new(relay);
    session.start_round(Some(sequence));
    let total = session.engine().sequence().len();

    println!("{} {} ({} notes)", "Playing:".cyan().bold(), title, total);
    println!(
        "{}",
        "Type a note letter (C D E F G A B) and press Enter; Ctrl+C to stop.".dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut completed = false;
    let mut submitted = false;

    while let Some(expected) = session.engine().expected_note() {
        println!("{} {}", "Press:".bold(), expected.to_string().bold());

        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read input")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        // Ctrl+C and end-of-input both abandon the round.
        let Some(line) = line else {
            break;
        };

        let note = match line.parse::<Note>() {
            Ok(note) => note,
            Err(err) => {
                println!("  {} {}", "!".yellow(), err);
                continue;
            }
        };

        submitted = true;
        match session.submit_note(note) {
            MatchResult::Correct { position } => {
                println!("  {} Correct! ({}/{})", "+".green(), position, total);
            }
            MatchResult::Incorrect { expected } => {
                println!(
                    "  {} Wrong note! Expected \"{}\". Try again.",
                    "x".red(),
                    expected
                );
            }
            MatchResult::Completed { score } => {
                println!(
                    "\n{} Congratulations! You played the song! Score: {} / {}",
                    "SUCCESS".green().bold(),
                    score,
                    total
                );
                completed = true;
            }
            MatchResult::NotStarted => break,
        }
    }

    if !completed {
        println!(
            "\n{} Round abandoned. Score: {} / {}",
            "STOPPED".yellow().bold(),
            session.engine().score(),
            total
        );
    }

    // Surface the latest relay outcome as advisory status. A notification
    // may still be in flight, so give it up to one deadline to settle.
    if submitted {
        let mut status = session.relay_status();
        let _ = tokio::time::timeout(Duration::from_millis(timeout_ms), status.changed()).await;
        let report = status.borrow().clone();
        if let Some(report) = report {
            println!("{}", format!("relay: {}", report.status_line()).dimmed());
        }
    }

    if completed && auto_replay {
        println!("{}", "Playing back the song...".cyan());
        let mut playback = session
            .replay()
            .context("Replay was not available after completion")?;
        while let Some(ack) = playback.next_ack().await {
            println!("  {} Playing note: {}", "*".cyan(), ack.note);
        }
        println!("{}", "Song playback complete!".green());
    }

    Ok(ExitCode::SUCCESS)
}
