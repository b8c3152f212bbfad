//! Error types for catalog operations.

use std::path::PathBuf;

use fwgen_core::{Diagnose, ErrorDetail, ErrorKind};

use crate::catalog::EntryKind;

/// Errors that can occur while loading or querying the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// No record with this id was loaded.
    #[error("{} not found: {id}", kind.title())]
    NotFound { kind: EntryKind, id: String },

    /// The directory that should hold the records does not exist.
    #[error("{} directory not found: {}", kind.title(), path.display())]
    MissingDirectory { kind: EntryKind, path: PathBuf },

    /// Two records declare the same id.
    #[error("duplicate {kind} id '{id}' in {} and {}", first.display(), second.display())]
    DuplicateId {
        kind: EntryKind,
        id: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A record could not be deserialized.
    #[error("cannot parse {}: {detail}", path.display())]
    Parse { path: PathBuf, detail: String },

    /// A record parsed but describes impossible hardware.
    #[error("invalid record {}: {detail}", path.display())]
    Invalid { path: PathBuf, detail: String },

    /// I/O error reading a record or directory.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Diagnose for CatalogError {
    fn detail(&self) -> ErrorDetail {
        match self {
            CatalogError::NotFound { kind, .. } => ErrorDetail::new(
                ErrorKind::NotFound,
                self.to_string(),
                format!("Check {kind} files under {}/.", kind.dir_name()),
            ),
            CatalogError::MissingDirectory { kind, .. } => ErrorDetail::new(
                ErrorKind::NotFound,
                self.to_string(),
                format!(
                    "Point [data] root in fwgen.toml at a directory containing {}/.",
                    kind.dir_name()
                ),
            ),
            CatalogError::DuplicateId { .. }
            | CatalogError::Parse { .. }
            | CatalogError::Invalid { .. } => ErrorDetail::new(
                ErrorKind::NotFound,
                self.to_string(),
                "Fix the record so it matches the board/pack schema.",
            ),
            CatalogError::Io { .. } => ErrorDetail::new(
                ErrorKind::Generation,
                self.to_string(),
                "Check that the data directory is readable.",
            ),
        }
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
