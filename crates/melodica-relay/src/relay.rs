//! Deadline-bounded fan-out over the configured sinks.

use std::time::Duration;

use melodica_game::Note;

use crate::outcome::{RelayOutcome, RelayReport, SinkKind};
use crate::sink::{HttpSink, SerialSink, SinkError};

/// Default deadline for one sink delivery.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_millis(1000);

/// Best-effort delivery of single notes to zero or more external sinks.
///
/// Each sink send races a fixed deadline; on expiry the send is abandoned
/// and its eventual late completion is discarded with the dropped future.
/// Nothing a sink does can surface as an error from [`Relay::send`].
#[derive(Debug)]
pub struct Relay {
    serial: Option<SerialSink>,
    http: Option<HttpSink>,
    timeout: Duration,
}

impl Relay {
    /// Creates a relay with no sinks and the default deadline.
    pub fn new() -> Self {
        Relay {
            serial: None,
            http: None,
            timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    /// Attaches a serial sink.
    pub fn with_serial(mut self, sink: SerialSink) -> Self {
        self.serial = Some(sink);
        self
    }

    /// Attaches an HTTP sink.
    pub fn with_http(mut self, sink: HttpSink) -> Self {
        self.http = Some(sink);
        self
    }

    /// Overrides the per-send deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// True if at least one sink is configured.
    pub fn has_sinks(&self) -> bool {
        self.serial.is_some() || self.http.is_some()
    }

    /// Delivers one note to every configured sink, concurrently, each under
    /// the deadline. Always returns a report; with no sinks configured the
    /// report is empty and summarizes as
    /// [`SinkAbsent`](RelayOutcome::SinkAbsent).
    pub async fn send(&mut self, note: Note) -> RelayReport {
        let Relay {
            serial,
            http,
            timeout,
        } = self;
        let timeout = *timeout;

        let (serial_outcome, http_outcome) = tokio::join!(
            async {
                match serial {
                    Some(sink) => Some(classify(
                        tokio::time::timeout(timeout, sink.send(note)).await,
                    )),
                    None => None,
                }
            },
            async {
                match http {
                    Some(sink) => Some(classify(
                        tokio::time::timeout(timeout, sink.send(note)).await,
                    )),
                    None => None,
                }
            },
        );

        let mut outcomes = Vec::new();
        if let Some(outcome) = serial_outcome {
            outcomes.push((SinkKind::Serial, outcome));
        }
        if let Some(outcome) = http_outcome {
            outcomes.push((SinkKind::Http, outcome));
        }
        RelayReport { note, outcomes }
    }
}

impl Default for Relay {
    fn default() -> Self {
        Relay::new()
    }
}

/// Maps a raced sink result onto the outcome taxonomy.
fn classify(result: Result<Result<(), SinkError>, tokio::time::error::Elapsed>) -> RelayOutcome {
    match result {
        Ok(Ok(())) => RelayOutcome::Delivered,
        Ok(Err(err)) => RelayOutcome::TransportError(err.to_string()),
        Err(_) => RelayOutcome::TimedOut,
    }
}
