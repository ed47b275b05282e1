//! Melodica Game Engine - Note-Matching Rounds Over Fixed Melodies
//!
//! This crate provides the pure core of the Melodica melody trainer: the
//! seven-symbol note alphabet, target sequences, and the round state machine
//! that matches player input against a melody one note at a time.
//!
//! The engine is deliberately free of I/O and async concerns. Input events
//! arrive from anywhere (keyboard, pointer, an external controller board);
//! the engine only cares about the note symbol. Relaying accepted notes to
//! feedback hardware lives in `melodica-relay`.
//!
//! # Example
//!
//! ```
//! use melodica_game::{GameEngine, MatchResult, Note, Sequence};
//!
//! let mut engine = GameEngine::new();
//! engine.start_round(Some(Sequence::new(vec![Note::E, Note::G])));
//!
//! assert!(matches!(engine.submit_note(Note::E), MatchResult::Correct { .. }));
//! assert!(matches!(engine.submit_note(Note::G), MatchResult::Completed { .. }));
//! assert!(engine.is_finished());
//! ```
//!
//! # Modules
//!
//! - [`note`]: Note symbols, parsing, and the keyboard key-code mapping
//! - [`sequence`]: Target sequences and the built-in fallback song
//! - [`engine`]: The round state machine and match results

pub mod engine;
pub mod note;
pub mod sequence;

// Re-export commonly used types at the crate root
pub use engine::{GameEngine, InputOrigin, MatchResult, NoteEvent};
pub use note::{Note, NoteParseError};
pub use sequence::{Sequence, SequenceParseError, JINGLE_BELLS};

/// Crate version for identification in status output.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
