//! The round state machine: `Idle` → `Running` → `Finished`.
//!
//! A round tracks a target sequence, the current match position, and the
//! score. Input events from any source are serialized through
//! [`GameEngine::submit_note`]; the matching rule is strictly positional
//! (compare against the expected note, no searching, no skipping, no
//! backtracking). Relaying accepted notes to external sinks is not the
//! engine's job and never influences these transitions.

use crate::note::Note;
use crate::sequence::Sequence;

/// Where an input event came from.
///
/// Origin only matters for UI highlighting; the matching rule ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOrigin {
    /// A key press mapped through [`Note::from_key_code`].
    Keyboard,
    /// A pointer click on an on-screen note button.
    Pointer,
    /// A byte from the external controller board.
    Controller,
}

/// A single note input plus its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    /// The note symbol played.
    pub note: Note,
    /// Where the input came from.
    pub origin: InputOrigin,
}

/// Outcome of submitting one note against the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// The round is not accepting input; state is unchanged.
    NotStarted,
    /// The note matched; `position` is the new match position.
    Correct {
        /// Match position after advancing.
        position: usize,
    },
    /// The note did not match the expected one; state is unchanged.
    Incorrect {
        /// The note that was expected at the current position.
        expected: Note,
    },
    /// The note matched and completed the round.
    Completed {
        /// Final score, equal to the sequence length.
        score: usize,
    },
}

/// The note-matching game engine.
///
/// Owns the target sequence and the round counters. Created idle; a round
/// begins with [`start_round`](GameEngine::start_round) and ends when the
/// match position reaches the end of the sequence. State is discarded and
/// replaced on the next `start_round`; no history survives a round.
///
/// Invariants, checked in tests:
/// - `position == score` at all times (no partial credit, no skipping)
/// - `finished` implies `started == false`
#[derive(Debug, Clone)]
pub struct GameEngine {
    sequence: Sequence,
    position: usize,
    score: usize,
    started: bool,
    finished: bool,
    last_message: String,
}

impl GameEngine {
    /// Creates an idle engine with the fallback song loaded.
    pub fn new() -> Self {
        GameEngine {
            sequence: Sequence::default_song(),
            position: 0,
            score: 0,
            started: false,
            finished: false,
            last_message: String::new(),
        }
    }

    /// Starts a fresh round over `sequence`.
    ///
    /// A missing or empty sequence is normalized to the built-in fallback
    /// song rather than rejected; the permissive behavior is intentional and
    /// centralizing it here keeps the policy a one-line change.
    pub fn start_round(&mut self, sequence: Option<Sequence>) {
        self.sequence = match sequence {
            Some(seq) if !seq.is_empty() => seq,
            _ => Sequence::default_song(),
        };
        self.position = 0;
        self.score = 0;
        self.started = true;
        self.finished = false;
        self.last_message = "Follow the sequence!".to_string();
    }

    /// Submits one note against the current position.
    ///
    /// Before the round starts this is a state-preserving no-op returning
    /// [`MatchResult::NotStarted`]. While running, a match advances position
    /// and score together; a mismatch changes nothing but the status
    /// message. The match that reaches the end of the sequence flips the
    /// round to finished and stops accepting input.
    pub fn submit_note(&mut self, note: Note) -> MatchResult {
        if !self.started {
            self.last_message = "Start the game first!".to_string();
            return MatchResult::NotStarted;
        }

        // started implies position < len, so the expected note exists
        let expected = self
            .sequence
            .get(self.position)
            .expect("running round has a current note");

        if note != expected {
            self.last_message = format!("Wrong note! Expected \"{}\". Try again.", expected);
            return MatchResult::Incorrect { expected };
        }

        self.position += 1;
        self.score += 1;

        if self.position == self.sequence.len() {
            self.started = false;
            self.finished = true;
            self.last_message = "Congratulations! You played the song!".to_string();
            MatchResult::Completed { score: self.score }
        } else {
            self.last_message = "Correct!".to_string();
            MatchResult::Correct {
                position: self.position,
            }
        }
    }

    /// Submits an input event; the origin is ignored by the matching rule.
    pub fn submit_event(&mut self, event: NoteEvent) -> MatchResult {
        self.submit_note(event.note)
    }

    /// The target sequence of the current (or last) round.
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Current match position into the sequence.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Count of correct matches so far; equals [`position`](Self::position).
    pub fn score(&self) -> usize {
        self.score
    }

    /// True while the round is accepting input.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// True once the round has been completed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The note expected next, while the round is running.
    pub fn expected_note(&self) -> Option<Note> {
        if self.started {
            self.sequence.get(self.position)
        } else {
            None
        }
    }

    /// The latest human-readable status line. Informational only.
    pub fn last_message(&self) -> &str {
        &self.last_message
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        GameEngine::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(symbols: &str) -> Sequence {
        Sequence::parse(symbols).unwrap()
    }

    #[test]
    fn test_idle_engine_rejects_input() {
        let mut engine = GameEngine::new();
        assert_eq!(engine.submit_note(Note::E), MatchResult::NotStarted);
        assert_eq!(engine.position(), 0);
        assert_eq!(engine.score(), 0);
        assert!(!engine.is_started());
        assert!(!engine.is_finished());
    }

    #[test]
    fn test_start_round_resets_counters() {
        let mut engine = GameEngine::new();
        engine.start_round(Some(seq("E,G")));
        engine.submit_note(Note::E);
        engine.start_round(Some(seq("C,D,E")));
        assert_eq!(engine.position(), 0);
        assert_eq!(engine.score(), 0);
        assert!(engine.is_started());
        assert!(!engine.is_finished());
        assert_eq!(engine.expected_note(), Some(Note::C));
    }

    #[test]
    fn test_empty_sequence_falls_back_to_default_song() {
        let mut engine = GameEngine::new();
        engine.start_round(Some(Sequence::new(vec![])));
        assert_eq!(engine.sequence(), &Sequence::default_song());

        engine.start_round(None);
        assert_eq!(engine.sequence(), &Sequence::default_song());
        assert!(engine.is_started());
    }

    #[test]
    fn test_mismatch_reports_expected_note() {
        let mut engine = GameEngine::new();
        engine.start_round(Some(seq("E,G")));
        assert_eq!(
            engine.submit_note(Note::A),
            MatchResult::Incorrect { expected: Note::E }
        );
        assert!(engine.last_message().contains("\"E\""));
    }

    #[test]
    fn test_completion_locks_the_round() {
        let mut engine = GameEngine::new();
        engine.start_round(Some(seq("G")));
        assert_eq!(engine.submit_note(Note::G), MatchResult::Completed { score: 1 });
        assert!(engine.is_finished());
        assert!(!engine.is_started());

        // No transition out of Finished except a fresh start_round
        assert_eq!(engine.submit_note(Note::G), MatchResult::NotStarted);
        assert_eq!(engine.position(), 1);
        assert_eq!(engine.score(), 1);
        assert!(engine.is_finished());
    }

    #[test]
    fn test_event_origin_does_not_affect_matching() {
        for origin in [
            InputOrigin::Keyboard,
            InputOrigin::Pointer,
            InputOrigin::Controller,
        ] {
            let mut engine = GameEngine::new();
            engine.start_round(Some(seq("E")));
            let result = engine.submit_event(NoteEvent {
                note: Note::E,
                origin,
            });
            assert_eq!(result, MatchResult::Completed { score: 1 });
        }
    }

    #[test]
    fn test_expected_note_none_outside_running_round() {
        let mut engine = GameEngine::new();
        assert_eq!(engine.expected_note(), None);
        engine.start_round(Some(seq("G")));
        assert_eq!(engine.expected_note(), Some(Note::G));
        engine.submit_note(Note::G);
        assert_eq!(engine.expected_note(), None);
    }
}
