//! Target sequences and the built-in fallback song.

use thiserror::Error;

use crate::note::Note;

/// The built-in fallback song: the Jingle Bells opening line.
///
/// Used whenever a round starts without a usable target sequence.
pub const JINGLE_BELLS: [Note; 26] = [
    Note::E, Note::E, Note::E, // Jingle
    Note::E, Note::E, Note::E, // Jingle
    Note::E, Note::G, Note::C, Note::D, Note::E, // All the way
    Note::F, Note::F, Note::F, Note::F, // Oh what fun
    Note::F, Note::E, Note::E, Note::E, Note::E, // It is to ride
    Note::E, Note::D, Note::D, Note::E, Note::D, Note::G, // In a one-horse open sleigh
];

/// Error returned when a comma-separated note string has an unknown symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid note {symbol:?} at position {index}")]
pub struct SequenceParseError {
    /// Zero-based index of the offending token.
    pub index: usize,
    /// The token that failed to parse.
    pub symbol: String,
}

/// An ordered list of note symbols defining a round's target melody.
///
/// Immutable once a round starts: the engine takes ownership of the sequence
/// at `start_round` and never mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence(Vec<Note>);

impl Sequence {
    /// Creates a sequence from a list of notes.
    pub fn new(notes: Vec<Note>) -> Self {
        Sequence(notes)
    }

    /// Parses the comma-separated form used by the composition store
    /// (`"E,E,G,C"`).
    ///
    /// Blank tokens are skipped, so a trailing comma or an all-whitespace
    /// string is not an error; an empty input parses to an empty sequence,
    /// which the engine normalizes to the fallback song at round start.
    pub fn parse(s: &str) -> Result<Sequence, SequenceParseError> {
        let mut notes = Vec::new();
        for (index, token) in s.split(',').enumerate() {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let note = Note::parse(token).map_err(|_| SequenceParseError {
                index,
                symbol: token.to_string(),
            })?;
            notes.push(note);
        }
        Ok(Sequence(notes))
    }

    /// Returns the built-in fallback song.
    pub fn default_song() -> Sequence {
        Sequence(JINGLE_BELLS.to_vec())
    }

    /// Returns the note at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<Note> {
        self.0.get(index).copied()
    }

    /// Number of notes in the sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the sequence has no notes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The notes as a slice, in order.
    pub fn notes(&self) -> &[Note] {
        &self.0
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, note) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(note.symbol())?;
        }
        Ok(())
    }
}

impl FromIterator<Note> for Sequence {
    fn from_iter<I: IntoIterator<Item = Note>>(iter: I) -> Self {
        Sequence(iter.into_iter().collect())
    }
}
