//! Note symbols and the keyboard mapping used by the game controller.
//!
//! The playable alphabet is the seven natural notes C through B. Each note
//! carries the ASCII key code the original controller hardware reports, so
//! keyboard events and controller bytes resolve through the same table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A playable note symbol.
///
/// Serializes as the bare symbol letter (`"E"`), which is the form used by
/// the composition store and the relay wire payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Note {
    /// C (key code 67)
    C,
    /// D (key code 68)
    D,
    /// E (key code 69)
    E,
    /// F (key code 70)
    F,
    /// G (key code 71)
    G,
    /// A (key code 65)
    A,
    /// B (key code 66)
    B,
}

/// Error returned when a string does not name a playable note.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown note symbol: {0:?} (expected one of C, D, E, F, G, A, B)")]
pub struct NoteParseError(pub String);

impl Note {
    /// All notes in the order the controller lays them out (C through B).
    pub const ALL: [Note; 7] = [
        Note::C,
        Note::D,
        Note::E,
        Note::F,
        Note::G,
        Note::A,
        Note::B,
    ];

    /// Returns the note's symbol letter.
    pub fn symbol(&self) -> &'static str {
        match self {
            Note::C => "C",
            Note::D => "D",
            Note::E => "E",
            Note::F => "F",
            Note::G => "G",
            Note::A => "A",
            Note::B => "B",
        }
    }

    /// Returns the ASCII key code mapped to this note.
    ///
    /// These are the `keydown` codes the original controller listens for:
    /// the uppercase ASCII value of the symbol letter.
    pub fn key_code(&self) -> u8 {
        match self {
            Note::C => 67,
            Note::D => 68,
            Note::E => 69,
            Note::F => 70,
            Note::G => 71,
            Note::A => 65,
            Note::B => 66,
        }
    }

    /// Resolves a keyboard key code to a note, if it is mapped.
    ///
    /// # Examples
    /// ```
    /// use melodica_game::Note;
    ///
    /// assert_eq!(Note::from_key_code(69), Some(Note::E));
    /// assert_eq!(Note::from_key_code(90), None);
    /// ```
    pub fn from_key_code(code: u8) -> Option<Note> {
        Note::ALL.iter().copied().find(|n| n.key_code() == code)
    }

    /// Parses a note from its symbol, tolerating surrounding whitespace and
    /// lowercase input.
    pub fn parse(s: &str) -> Result<Note, NoteParseError> {
        match s.trim() {
            "C" | "c" => Ok(Note::C),
            "D" | "d" => Ok(Note::D),
            "E" | "e" => Ok(Note::E),
            "F" | "f" => Ok(Note::F),
            "G" | "g" => Ok(Note::G),
            "A" | "a" => Ok(Note::A),
            "B" | "b" => Ok(Note::B),
            other => Err(NoteParseError(other.to_string())),
        }
    }
}

impl std::fmt::Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::str::FromStr for Note {
    type Err = NoteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Note::parse(s)
    }
}
