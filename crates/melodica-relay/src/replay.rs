//! Paced, cancellable playback of a melody through the relay.
//!
//! Replay is a post-round feature: once a round is finished the target
//! sequence is sent back out through the sinks one note at a time, paced so
//! the hardware can be heard. The consumer pulls acks; when it stops pulling
//! (or drops the handle) the producer task stops without sending the
//! remainder.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use melodica_game::{Note, Sequence};

use crate::outcome::RelayReport;
use crate::relay::Relay;

/// Default pause between replayed notes.
pub const DEFAULT_NOTE_GAP: Duration = Duration::from_millis(600);

/// One replayed note and how its delivery went.
#[derive(Debug, Clone)]
pub struct ReplayAck {
    /// Zero-based position within the sequence.
    pub index: usize,
    /// The note that was sent.
    pub note: Note,
    /// Per-sink delivery report.
    pub report: RelayReport,
}

/// Handle to an in-flight replay.
///
/// Pull acks with [`next_ack`](ReplayHandle::next_ack); dropping the handle
/// (or calling [`cancel`](ReplayHandle::cancel)) aborts the producer so no
/// further notes reach the sinks.
pub struct ReplayHandle {
    rx: mpsc::Receiver<ReplayAck>,
    task: JoinHandle<()>,
}

impl ReplayHandle {
    /// Waits for the next replayed note; `None` once the sequence is done.
    pub async fn next_ack(&mut self) -> Option<ReplayAck> {
        self.rx.recv().await
    }

    /// Stops the replay immediately; notes not yet sent never will be.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for ReplayHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl std::fmt::Debug for ReplayHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplayHandle").finish_non_exhaustive()
    }
}

/// Starts replaying `sequence` through `relay`, pausing `gap` between notes.
///
/// The channel holds a single ack, so the producer cannot run ahead of the
/// consumer: abandoning the handle after N acks means at most N+1 notes were
/// sent. Must be called within a tokio runtime.
pub fn start_replay(relay: Arc<Mutex<Relay>>, sequence: Sequence, gap: Duration) -> ReplayHandle {
    let (tx, rx) = mpsc::channel(1);
    let task = tokio::spawn(async move {
        for (index, &note) in sequence.notes().iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(gap).await;
            }
            let report = relay.lock().await.send(note).await;
            if tx.send(ReplayAck { index, note, report }).await.is_err() {
                // Consumer is gone; stop without sending the rest.
                break;
            }
        }
    });
    ReplayHandle { rx, task }
}
