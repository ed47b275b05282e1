//! JSON file-backed composition catalog.
//!
//! The catalog is the local stand-in for the composition service: an ordered
//! list of `{id, title, composition, owner}` records in one JSON file. The
//! game only ever consumes the comma-separated note string; ownership is an
//! opaque label (identity is handled elsewhere entirely).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use melodica_game::{Sequence, SequenceParseError};

/// Default catalog file name, resolved against the working directory.
pub const DEFAULT_CATALOG_FILE: &str = "melodica-songs.json";

/// Error type for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog file is not valid JSON.
    #[error("catalog parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A composition's note string has an unknown symbol.
    #[error("invalid composition: {0}")]
    InvalidNotes(#[from] SequenceParseError),

    /// A composition must contain at least one note.
    #[error("composition has no notes")]
    EmptyComposition,

    /// Lookup by id failed.
    #[error("no song with id {0}")]
    NotFound(u64),
}

/// One stored composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    /// Catalog-assigned id, unique within the file.
    pub id: u64,
    /// Display title.
    pub title: String,
    /// Comma-separated note symbols (`"E,E,E,G"`).
    pub composition: String,
    /// Opaque owner label, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl Composition {
    /// Parses the stored note string into a playable sequence.
    pub fn sequence(&self) -> Result<Sequence, SequenceParseError> {
        Sequence::parse(&self.composition)
    }
}

/// A catalog bound to a file on disk.
///
/// Opening a missing file yields an empty catalog; the file is created on
/// the first [`add`](Catalog::add).
#[derive(Debug)]
pub struct Catalog {
    path: PathBuf,
    entries: Vec<Composition>,
}

impl Catalog {
    /// Opens the catalog at `path`, treating a missing file as empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Catalog { path, entries })
    }

    /// All compositions, in insertion order.
    pub fn entries(&self) -> &[Composition] {
        &self.entries
    }

    /// Looks up a composition by id.
    pub fn get(&self, id: u64) -> Option<&Composition> {
        self.entries.iter().find(|c| c.id == id)
    }

    /// Looks up a composition by id, erroring if absent.
    pub fn find(&self, id: u64) -> Result<&Composition, CatalogError> {
        self.get(id).ok_or(CatalogError::NotFound(id))
    }

    /// Validates and stores a new composition, assigning the next id and
    /// persisting the file before returning the stored record.
    pub fn add(
        &mut self,
        title: impl Into<String>,
        composition: impl Into<String>,
        owner: Option<String>,
    ) -> Result<&Composition, CatalogError> {
        let composition = composition.into();
        let sequence = Sequence::parse(&composition)?;
        if sequence.is_empty() {
            return Err(CatalogError::EmptyComposition);
        }

        let id = self.entries.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        self.entries.push(Composition {
            id,
            title: title.into(),
            composition,
            owner,
        });
        self.persist()?;
        Ok(self.entries.last().expect("entry was just pushed"))
    }

    /// Writes the catalog back to its file.
    fn persist(&self) -> Result<(), CatalogError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use melodica_game::Note;

    #[test]
    fn test_open_missing_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let catalog = Catalog::open(tmp.path().join("songs.json")).unwrap();
        assert!(catalog.entries().is_empty());
    }

    #[test]
    fn test_add_assigns_ids_and_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("songs.json");

        let mut catalog = Catalog::open(&path).unwrap();
        let first = catalog.add("Jingle", "E,E,E", None).unwrap().clone();
        assert_eq!(first.id, 1);
        let second = catalog
            .add("Scale", "C,D,E,F,G", Some("ana@example.com".to_string()))
            .unwrap()
            .clone();
        assert_eq!(second.id, 2);

        let reopened = Catalog::open(&path).unwrap();
        assert_eq!(reopened.entries(), &[first, second]);
    }

    #[test]
    fn test_add_rejects_bad_notes() {
        let tmp = tempfile::tempdir().unwrap();
        let mut catalog = Catalog::open(tmp.path().join("songs.json")).unwrap();

        assert!(matches!(
            catalog.add("Bad", "E,X", None),
            Err(CatalogError::InvalidNotes(_))
        ));
        assert!(matches!(
            catalog.add("Empty", " , ", None),
            Err(CatalogError::EmptyComposition)
        ));
        assert!(catalog.entries().is_empty());
    }

    #[test]
    fn test_find_reports_missing_ids() {
        let tmp = tempfile::tempdir().unwrap();
        let mut catalog = Catalog::open(tmp.path().join("songs.json")).unwrap();
        catalog.add("Jingle", "E,E,E", None).unwrap();

        assert!(catalog.find(1).is_ok());
        assert!(matches!(catalog.find(7), Err(CatalogError::NotFound(7))));
    }

    #[test]
    fn test_composition_sequence_parses() {
        let comp = Composition {
            id: 1,
            title: "Test".to_string(),
            composition: "E,G,C".to_string(),
            owner: None,
        };
        assert_eq!(
            comp.sequence().unwrap().notes(),
            &[Note::E, Note::G, Note::C]
        );
    }

    #[test]
    fn test_owner_is_optional_in_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("songs.json");
        std::fs::write(
            &path,
            r#"[{"id": 4, "title": "Old", "composition": "E,G"}]"#,
        )
        .unwrap();

        let catalog = Catalog::open(&path).unwrap();
        assert_eq!(catalog.get(4).unwrap().owner, None);
    }
}
