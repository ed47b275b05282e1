//! Helpers shared by the play and replay commands.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;

use melodica_game::Sequence;
use melodica_relay::{HttpSink, Relay, SerialSink};

use crate::catalog::Catalog;

/// Resolves the target melody: a catalog song by id, or the built-in
/// fallback song when none was requested.
pub(crate) fn resolve_song(song: Option<u64>, catalog_path: &Path) -> Result<(String, Sequence)> {
    match song {
        Some(id) => {
            let catalog = Catalog::open(catalog_path).with_context(|| {
                format!("Failed to open catalog: {}", catalog_path.display())
            })?;
            let composition = catalog.find(id)?;
            let sequence = composition
                .sequence()
                .with_context(|| format!("Song #{} has an invalid note string", id))?;
            Ok((composition.title.clone(), sequence))
        }
        None => Ok(("Jingle Bells".to_string(), Sequence::default_song())),
    }
}

/// Builds a relay from whatever sinks are reachable.
///
/// A serial device that fails to open is a warning, not an error: the game
/// is playable without hardware and the relay degrades to fewer sinks.
pub(crate) async fn build_relay(
    serial_path: Option<&str>,
    relay_addr: Option<SocketAddr>,
    timeout_ms: u64,
) -> Relay {
    let mut relay = Relay::new().with_timeout(Duration::from_millis(timeout_ms));

    if let Some(path) = serial_path {
        match tokio::fs::OpenOptions::new().write(true).open(path).await {
            Ok(file) => {
                eprintln!("Connected to {}", path);
                relay = relay.with_serial(SerialSink::new(file));
            }
            Err(err) => {
                eprintln!(
                    "{} no serial connection ({}): {}",
                    "warning:".yellow().bold(),
                    path,
                    err
                );
            }
        }
    }

    if let Some(addr) = relay_addr {
        relay = relay.with_http(HttpSink::new(addr));
    }

    relay
}
