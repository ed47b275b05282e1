//! Engine-plus-relay glue for one play session.
//!
//! All input sources (keyboard, pointer, controller) are serialized through
//! [`GameSession::submit_note`]: the state transition happens synchronously,
//! then the relay notification is spawned fire-and-forget. A prior
//! notification may still be in flight when the next note arrives; game
//! correctness never depends on it, and sink-side ordering is explicitly not
//! guaranteed.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{watch, Mutex};

use melodica_game::{GameEngine, MatchResult, Note, NoteEvent, Sequence};

use crate::outcome::RelayReport;
use crate::relay::Relay;
use crate::replay::{start_replay, ReplayHandle, DEFAULT_NOTE_GAP};

/// Error returned when replay is requested mid-round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("replay is only available once the round is finished")]
pub struct ReplayNotReady;

/// One play session: a [`GameEngine`] wired to a [`Relay`].
///
/// The relay lives behind an `Arc<Mutex<..>>` so spawned notification tasks
/// and replay can share it; the session itself owns the engine and is the
/// single entry point for input.
pub struct GameSession {
    engine: GameEngine,
    relay: Arc<Mutex<Relay>>,
    status_tx: watch::Sender<Option<RelayReport>>,
    status_rx: watch::Receiver<Option<RelayReport>>,
}

impl GameSession {
    /// Creates a session over `relay`. Must be used within a tokio runtime.
    pub fn new(relay: Relay) -> Self {
        let (status_tx, status_rx) = watch::channel(None);
        GameSession {
            engine: GameEngine::new(),
            relay: Arc::new(Mutex::new(relay)),
            status_tx,
            status_rx,
        }
    }

    /// Starts a fresh round; see [`GameEngine::start_round`] for the
    /// empty-sequence normalization.
    pub fn start_round(&mut self, sequence: Option<Sequence>) {
        self.engine.start_round(sequence);
    }

    /// Submits one note: applies the match transition, then notifies the
    /// sinks in the background.
    ///
    /// The notification fires on both match and mismatch but not on
    /// [`MatchResult::NotStarted`], where the input was never accepted.
    /// Its outcome lands in [`relay_status`](Self::relay_status) and can
    /// never alter the returned result.
    pub fn submit_note(&mut self, note: Note) -> MatchResult {
        let result = self.engine.submit_note(note);
        if !matches!(result, MatchResult::NotStarted) {
            let relay = Arc::clone(&self.relay);
            let status_tx = self.status_tx.clone();
            tokio::spawn(async move {
                let report = relay.lock().await.send(note).await;
                status_tx.send_replace(Some(report));
            });
        }
        result
    }

    /// Submits an input event; origin is ignored by the matching rule.
    pub fn submit_event(&mut self, event: NoteEvent) -> MatchResult {
        self.submit_note(event.note)
    }

    /// Read access to the round state.
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Watch channel carrying the latest relay report. Advisory only.
    pub fn relay_status(&self) -> watch::Receiver<Option<RelayReport>> {
        self.status_rx.clone()
    }

    /// Replays the finished round's melody through the sinks with the
    /// default pacing.
    pub fn replay(&self) -> Result<ReplayHandle, ReplayNotReady> {
        self.replay_with_gap(DEFAULT_NOTE_GAP)
    }

    /// Replays with an explicit inter-note gap.
    ///
    /// Rejected while a round is running or before the first round
    /// completes; replay never starts mid-round.
    pub fn replay_with_gap(&self, gap: Duration) -> Result<ReplayHandle, ReplayNotReady> {
        if !self.engine.is_finished() {
            return Err(ReplayNotReady);
        }
        Ok(start_replay(
            Arc::clone(&self.relay),
            self.engine.sequence().clone(),
            gap,
        ))
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::RelayOutcome;
    use crate::sink::SerialSink;
    use tokio::io::AsyncReadExt;

    fn seq(symbols: &str) -> Sequence {
        Sequence::parse(symbols).unwrap()
    }

    #[tokio::test]
    async fn test_absent_sinks_do_not_affect_match_results() {
        let mut session = GameSession::new(Relay::new());
        session.start_round(Some(seq("E,G")));

        assert_eq!(
            session.submit_note(Note::E),
            MatchResult::Correct { position: 1 }
        );
        assert_eq!(
            session.submit_note(Note::A),
            MatchResult::Incorrect { expected: Note::G }
        );
        assert_eq!(
            session.submit_note(Note::G),
            MatchResult::Completed { score: 2 }
        );

        let mut status = session.relay_status();
        status.changed().await.unwrap();
        let report = status.borrow().clone().unwrap();
        assert_eq!(report.summary(), RelayOutcome::SinkAbsent);
    }

    #[tokio::test]
    async fn test_accepted_notes_reach_the_serial_sink() {
        let (client, mut server) = tokio::io::duplex(256);
        let mut session =
            GameSession::new(Relay::new().with_serial(SerialSink::new(client)));
        session.start_round(Some(seq("E")));

        // A mismatch is still relayed; a note after completion is not.
        session.submit_note(Note::G);
        session.submit_note(Note::E);
        session.submit_note(Note::C); // finished round: not accepted, not relayed

        // Both accepted notes must land on the wire; task order is not
        // guaranteed, only that exactly two frames arrive.
        let mut buf = vec![0u8; 24];
        server.read_exact(&mut buf).await.unwrap();
        let frames: Vec<&[u8]> = buf.split(|&b| b == b'\n').filter(|s| !s.is_empty()).collect();
        assert_eq!(frames.len(), 2);
        for frame in frames {
            assert!(frame.starts_with(b"PLAY_NOTE_"));
        }
    }

    #[tokio::test]
    async fn test_not_started_input_is_not_relayed() {
        let mut session = GameSession::new(Relay::new());
        assert_eq!(session.submit_note(Note::E), MatchResult::NotStarted);

        // No notification task was spawned, so the status never changes.
        tokio::task::yield_now().await;
        assert!(session.relay_status().borrow().is_none());
    }

    #[tokio::test]
    async fn test_replay_rejected_mid_round() {
        let mut session = GameSession::new(Relay::new());
        assert_eq!(session.replay().unwrap_err(), ReplayNotReady);

        session.start_round(Some(seq("E,G")));
        session.submit_note(Note::E);
        assert_eq!(session.replay().unwrap_err(), ReplayNotReady);

        session.submit_note(Note::G);
        let mut handle = session
            .replay_with_gap(Duration::from_millis(1))
            .unwrap();
        let mut count = 0;
        while let Some(ack) = handle.next_ack().await {
            assert_eq!(ack.index, count);
            count += 1;
        }
        assert_eq!(count, 2);
    }
}
