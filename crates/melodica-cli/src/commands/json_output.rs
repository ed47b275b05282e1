//! JSON output types for machine-readable CLI output.
//!
//! Structured envelopes for the `--json` flag on the songs commands, so
//! scripts and the companion frontend can parse results without scraping
//! colored terminal text.

use serde::{Deserialize, Serialize};

use crate::catalog::Composition;

/// Error codes for CLI operations.
///
/// These codes are stable and can be used for programmatic error handling.
pub mod error_codes {
    /// Catalog file could not be read or parsed
    pub const CATALOG_READ: &str = "CLI_001";
    /// Composition note string failed validation
    pub const INVALID_NOTES: &str = "CLI_002";
    /// No song with the requested id
    pub const SONG_NOT_FOUND: &str = "CLI_003";
    /// Catalog file could not be written
    pub const CATALOG_WRITE: &str = "CLI_004";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// JSON output for `songs list` and `songs show`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongsOutput {
    /// Whether the operation succeeded
    pub success: bool,
    /// Errors encountered
    pub errors: Vec<JsonError>,
    /// The matching compositions (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<Composition>>,
}

impl SongsOutput {
    /// Creates a successful output carrying `result`.
    pub fn success(result: Vec<Composition>) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            result: Some(result),
        }
    }

    /// Creates a failed output.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            result: None,
        }
    }

    /// Serializes and prints the envelope.
    pub fn print(&self) {
        let json = serde_json::to_string_pretty(self)
            .expect("songs output serialization should not fail");
        println!("{}", json);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let output = SongsOutput::success(vec![Composition {
            id: 1,
            title: "Jingle".to_string(),
            composition: "E,E,E".to_string(),
            owner: None,
        }]);
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains(r#""success":true"#));
        assert!(json.contains(r#""composition":"E,E,E""#));
    }

    #[test]
    fn test_failure_envelope_omits_result() {
        let output = SongsOutput::failure(vec![JsonError::new(
            error_codes::SONG_NOT_FOUND,
            "no song with id 9",
        )]);
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains(r#""success":false"#));
        assert!(json.contains("CLI_003"));
        assert!(!json.contains("result"));
    }
}
