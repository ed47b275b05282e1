//! Melodica Relay - Best-Effort Note Delivery to External Sinks
//!
//! This crate carries accepted notes from the game engine to feedback
//! hardware without ever coupling delivery latency or failure to game-state
//! transitions. Two sink kinds exist, both optional:
//!
//! - **Serial**: a caller-managed connection to the controller board,
//!   framed as `PLAY_NOTE_<SYMBOL>\n`. Not being connected is a normal,
//!   common state, not an error.
//! - **HTTP**: a local bridge endpoint accepting `POST /send-note` with a
//!   JSON body, bounded by a fixed per-send deadline.
//!
//! Every delivery resolves to a typed [`RelayOutcome`]; nothing here throws
//! into the caller. The [`GameSession`] wires a [`GameEngine`] to a
//! [`Relay`], spawning each notification fire-and-forget after the state
//! transition, and [`start_replay`] paces a finished round's melody back out
//! through the same sinks with cancellation support.
//!
//! # Modules
//!
//! - [`outcome`]: Delivery outcomes and per-note reports
//! - [`sink`]: The serial and HTTP sinks and their wire formats
//! - [`relay`]: Deadline-bounded fan-out over the configured sinks
//! - [`replay`]: Paced, cancellable post-round playback
//! - [`session`]: Engine-plus-relay glue with observable status
//!
//! [`GameEngine`]: melodica_game::GameEngine

pub mod outcome;
pub mod relay;
pub mod replay;
pub mod session;
pub mod sink;

// Re-export commonly used types at the crate root
pub use outcome::{RelayOutcome, RelayReport, SinkKind};
pub use relay::{Relay, DEFAULT_SEND_TIMEOUT};
pub use replay::{start_replay, ReplayAck, ReplayHandle, DEFAULT_NOTE_GAP};
pub use session::{GameSession, ReplayNotReady};
pub use sink::{serial_frame, HttpSink, NotePayload, SerialSink, SinkError};
