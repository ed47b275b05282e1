//! Serial bridge server for external note relays.
//!
//! This is the local endpoint the game's HTTP sink (and the companion web
//! frontend) posts notes to. Each accepted note is forwarded to the
//! controller board over the serial connection.
//!
//! ## Protocol
//!
//! One route:
//!
//! - `POST /send-note` with body `{"note":"E"}`: forwards the note to the
//!   board as `PLAY_NOTE_E\n` and answers `{"status":"success","sent":"E"}`.
//!
//! A malformed body answers 400, an unknown route 404, and a missing board
//! 503, all with `{"error":"..."}` bodies. The server keeps running through
//! all of them; a missing board is a normal degraded state, not a reason to
//! exit.

mod handler;
mod types;


use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, Mutex};

use melodica_relay::SerialSink;

pub use handler::{process, read_request, HttpRequest, HttpResponse};
pub use types::{SendAck, SendError};

/// Default port for the bridge server.
pub const DEFAULT_PORT: u16 = 5000;

/// Shared server state: the board connection, if one was opened.
struct BridgeState {
    serial: Option<Mutex<SerialSink>>,
}

/// Run the bridge server.
///
/// # Arguments
/// * `port` - Port to listen on
/// * `serial_path` - Serial device to forward notes to (e.g. `/dev/ttyUSB0`)
///
/// # Returns
/// Exit code: 0 on clean shutdown, 1 on error
pub fn run(port: u16, serial_path: Option<&str>) -> Result<ExitCode> {
    // Build tokio runtime
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    rt.block_on(async move { run_server(port, serial_path).await })
}

/// Run the bridge server (async entry point).
async fn run_server(port: u16, serial_path: Option<&str>) -> Result<ExitCode> {
    let serial = match serial_path {
        Some(path) => match open_serial(path).await {
            Ok(sink) => {
                eprintln!("Connected to {}", path);
                Some(Mutex::new(sink))
            }
            Err(err) => {
                // Same degraded mode as starting with no device at all.
                eprintln!("Failed to connect to {}: {}", path, err);
                None
            }
        },
        None => None,
    };
    let state = Arc::new(BridgeState { serial });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    eprintln!("Note bridge listening on http://{}", addr);
    eprintln!("Press Ctrl+C to shutdown");

    // Create shutdown channel
    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let shutdown_tx = Arc::new(shutdown_tx);

    // Set up SIGINT handler
    let shutdown_tx_clone = Arc::clone(&shutdown_tx);
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            eprintln!("\nShutting down...");
            let _ = shutdown_tx_clone.send(());
        }
    });

    let mut shutdown_rx = shutdown_tx.subscribe();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        let state = Arc::clone(&state);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, state).await {
                                eprintln!("Connection error for {}: {}", peer_addr, e);
                            }
                        });
                    }
                    Err(e) => {
                        eprintln!("Accept error: {}", e);
                    }
                }
            }
            _ = shutdown_rx.recv() => {
                eprintln!("Bridge shutdown complete");
                break;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Opens the serial device for writing.
///
/// The device is expected to be configured (baud etc.) by the OS; the
/// bridge only ever writes note frames to it.
async fn open_serial(path: &str) -> std::io::Result<SerialSink> {
    let file = tokio::fs::OpenOptions::new().write(true).open(path).await?;
    Ok(SerialSink::new(file))
}

/// Handle a single connection: one request, one response.
async fn handle_connection(mut stream: TcpStream, state: Arc<BridgeState>) -> std::io::Result<()> {
    let (read_half, mut write_half) = stream.split();
    let mut reader = BufReader::new(read_half);

    let Some(request) = read_request(&mut reader).await? else {
        return Ok(());
    };

    let response = process(&request, state.serial.as_ref()).await;
    write_half.write_all(&response.to_bytes()).await?;
    write_half.shutdown().await?;
    Ok(())
}
