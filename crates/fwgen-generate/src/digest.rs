//! SHA-256 digests of generated files.
//!
//! The manifest records one digest per generated file so a later run can
//! tell whether a file was edited by hand since it was written.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of a file's contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileDigest(String);

impl FileDigest {
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        FileDigest(hex_encode(&hasher.finalize()))
    }

    /// Digest of the file at `path`, or `None` if it cannot be read.
    pub fn of_file(path: &Path) -> Option<Self> {
        std::fs::read(path).ok().map(|data| Self::compute(&data))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
