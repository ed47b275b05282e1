//! Melodica CLI - melody rounds, song playback, and the serial note bridge
//!
//! This binary provides commands for playing note-matching rounds in the
//! terminal, replaying stored songs through feedback hardware, running the
//! local serial bridge, and managing the composition catalog.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

use melodica_cli::commands;

/// Melodica - Note-Matching Melody Trainer
#[derive(Parser)]
#[command(name = "melodica")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one round: match the melody note by note
    Play {
        /// Catalog id of the song to play (default: the built-in song)
        #[arg(short, long)]
        song: Option<u64>,

        /// Path to the song catalog file
        #[arg(long, default_value = melodica_cli::catalog::DEFAULT_CATALOG_FILE)]
        catalog: PathBuf,

        /// Serial device of the controller board (e.g. /dev/ttyUSB0)
        #[arg(short, long)]
        port: Option<String>,

        /// Address of the note bridge endpoint (e.g. 127.0.0.1:5000)
        #[arg(short, long)]
        relay: Option<SocketAddr>,

        /// Relay deadline per note, in milliseconds
        #[arg(long, default_value_t = 1000)]
        timeout_ms: u64,

        /// Replay the melody through the sinks after completing the round
        #[arg(long)]
        auto_replay: bool,
    },

    /// Replay a stored song through the sinks, without a game round
    Replay {
        /// Catalog id of the song to replay (default: the built-in song)
        #[arg(short, long)]
        song: Option<u64>,

        /// Path to the song catalog file
        #[arg(long, default_value = melodica_cli::catalog::DEFAULT_CATALOG_FILE)]
        catalog: PathBuf,

        /// Serial device of the controller board (e.g. /dev/ttyUSB0)
        #[arg(short, long)]
        port: Option<String>,

        /// Address of the note bridge endpoint (e.g. 127.0.0.1:5000)
        #[arg(short, long)]
        relay: Option<SocketAddr>,

        /// Relay deadline per note, in milliseconds
        #[arg(long, default_value_t = 1000)]
        timeout_ms: u64,

        /// Pause between notes, in milliseconds
        #[arg(long, default_value_t = 600)]
        gap_ms: u64,
    },

    /// Run the serial bridge: accept POST /send-note and forward to the board
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = commands::serve::DEFAULT_PORT)]
        port: u16,

        /// Serial device to forward notes to (e.g. /dev/ttyUSB0)
        #[arg(long)]
        serial: Option<String>,
    },

    /// Manage the song catalog
    Songs {
        #[command(subcommand)]
        command: SongsCommands,
    },
}

#[derive(Subcommand)]
enum SongsCommands {
    /// List all stored songs
    List {
        /// Path to the song catalog file
        #[arg(long, default_value = melodica_cli::catalog::DEFAULT_CATALOG_FILE)]
        catalog: PathBuf,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
    /// Show one song's notes
    Show {
        /// Catalog id of the song
        id: u64,

        /// Path to the song catalog file
        #[arg(long, default_value = melodica_cli::catalog::DEFAULT_CATALOG_FILE)]
        catalog: PathBuf,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
    /// Validate and store a new song
    Add {
        /// Display title
        #[arg(short, long)]
        title: String,

        /// Comma-separated note symbols (e.g. "E,E,E,G")
        #[arg(short, long)]
        notes: String,

        /// Opaque owner label (e.g. an email address)
        #[arg(long)]
        owner: Option<String>,

        /// Path to the song catalog file
        #[arg(long, default_value = melodica_cli::catalog::DEFAULT_CATALOG_FILE)]
        catalog: PathBuf,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            song,
            catalog,
            port,
            relay,
            timeout_ms,
            auto_replay,
        } => commands::play::run(
            song,
            &catalog,
            port.as_deref(),
            relay,
            timeout_ms,
            auto_replay,
        ),
        Commands::Replay {
            song,
            catalog,
            port,
            relay,
            timeout_ms,
            gap_ms,
        } => commands::replay::run(
            song,
            &catalog,
            port.as_deref(),
            relay,
            timeout_ms,
            gap_ms,
        ),
        Commands::Serve { port, serial } => commands::serve::run(port, serial.as_deref()),
        Commands::Songs { command } => match command {
            SongsCommands::List { catalog, json } => commands::songs::list(&catalog, json),
            SongsCommands::Show { id, catalog, json } => commands::songs::show(&catalog, id, json),
            SongsCommands::Add {
                title,
                notes,
                owner,
                catalog,
                json,
            } => commands::songs::add(&catalog, &title, &notes, owner, json),
        },
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "ERROR".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
