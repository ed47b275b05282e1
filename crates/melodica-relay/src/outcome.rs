//! Delivery outcomes and per-note relay reports.
//!
//! Outcomes are advisory status, never errors: the game engine surfaces the
//! latest report as a status line and otherwise ignores it.

use melodica_game::Note;

/// Outcome of one best-effort delivery attempt to a single sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The sink accepted the note.
    Delivered,
    /// The send did not complete within the deadline and was abandoned.
    TimedOut,
    /// No sink of this kind is configured; a silent no-op.
    SinkAbsent,
    /// The transport failed (connection refused, write error, bad response).
    TransportError(String),
}

impl RelayOutcome {
    /// True if the note reached the sink.
    pub fn is_delivered(&self) -> bool {
        matches!(self, RelayOutcome::Delivered)
    }
}

impl std::fmt::Display for RelayOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayOutcome::Delivered => f.write_str("delivered"),
            RelayOutcome::TimedOut => f.write_str("timed out"),
            RelayOutcome::SinkAbsent => f.write_str("no sink"),
            RelayOutcome::TransportError(detail) => write!(f, "transport error: {}", detail),
        }
    }
}

/// The kind of external sink an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    /// The serial controller board connection.
    Serial,
    /// The local HTTP bridge endpoint.
    Http,
}

impl SinkKind {
    /// Short label for status lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Serial => "serial",
            SinkKind::Http => "http",
        }
    }
}

/// Per-sink outcomes for one relayed note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReport {
    /// The note that was relayed.
    pub note: Note,
    /// One outcome per configured sink; empty when none are configured.
    pub outcomes: Vec<(SinkKind, RelayOutcome)>,
}

impl RelayReport {
    /// Collapses the report into a single advisory outcome.
    ///
    /// With no sinks configured the summary is [`RelayOutcome::SinkAbsent`];
    /// otherwise the first non-delivered outcome wins so failures are never
    /// masked by a sibling sink's success.
    pub fn summary(&self) -> RelayOutcome {
        if self.outcomes.is_empty() {
            return RelayOutcome::SinkAbsent;
        }
        self.outcomes
            .iter()
            .map(|(_, outcome)| outcome)
            .find(|outcome| !outcome.is_delivered())
            .cloned()
            .unwrap_or(RelayOutcome::Delivered)
    }

    /// Human-readable status line for the UI layer.
    pub fn status_line(&self) -> String {
        if self.outcomes.is_empty() {
            return format!("{}: no sinks configured", self.note);
        }
        let parts: Vec<String> = self
            .outcomes
            .iter()
            .map(|(kind, outcome)| format!("{}: {}", kind.as_str(), outcome))
            .collect();
        format!("{}: {}", self.note, parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_summary_with_no_sinks_is_absent() {
        let report = RelayReport {
            note: Note::E,
            outcomes: vec![],
        };
        assert_eq!(report.summary(), RelayOutcome::SinkAbsent);
    }

    #[test]
    fn test_summary_prefers_failures() {
        let report = RelayReport {
            note: Note::E,
            outcomes: vec![
                (SinkKind::Serial, RelayOutcome::Delivered),
                (SinkKind::Http, RelayOutcome::TimedOut),
            ],
        };
        assert_eq!(report.summary(), RelayOutcome::TimedOut);
    }

    #[test]
    fn test_summary_all_delivered() {
        let report = RelayReport {
            note: Note::G,
            outcomes: vec![
                (SinkKind::Serial, RelayOutcome::Delivered),
                (SinkKind::Http, RelayOutcome::Delivered),
            ],
        };
        assert_eq!(report.summary(), RelayOutcome::Delivered);
    }

    #[test]
    fn test_status_line_names_each_sink() {
        let report = RelayReport {
            note: Note::A,
            outcomes: vec![
                (SinkKind::Serial, RelayOutcome::SinkAbsent),
                (
                    SinkKind::Http,
                    RelayOutcome::TransportError("connection refused".to_string()),
                ),
            ],
        };
        let line = report.status_line();
        assert!(line.contains("serial: no sink"));
        assert!(line.contains("http: transport error: connection refused"));
    }
}
