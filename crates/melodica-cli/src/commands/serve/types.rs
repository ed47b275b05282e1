//! Request and response bodies for the serial bridge server.

use serde::{Deserialize, Serialize};

/// Ack body for a forwarded note: `{"status":"success","sent":"E"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendAck {
    /// Always `"success"` on the ack path.
    pub status: String,
    /// The note symbol that was written to the board.
    pub sent: String,
}

impl SendAck {
    /// Creates the ack for a delivered note.
    pub fn new(sent: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            sent: sent.into(),
        }
    }
}

/// Error body: `{"error":"..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendError {
    /// Human-readable reason the note was not forwarded.
    pub error: String,
}

impl SendError {
    /// Creates an error body.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
