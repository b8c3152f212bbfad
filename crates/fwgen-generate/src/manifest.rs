//! The generation manifest written at the root of every generated project.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fwgen_core::fsutil;
use fwgen_pins::{Level, PinMode, Pull, ResolvedPin};
use serde::{Deserialize, Serialize};

use crate::digest::FileDigest;
use crate::error::{GenerateError, Result};

/// File name of the manifest inside a generated project.
pub const MANIFEST_FILE: &str = "fwgen.project.json";

/// Toolchain family every generated project targets.
pub const TOOLCHAIN: &str = "arm-none-eabi";

/// One resolved pin as recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestPin {
    pub name: String,
    pub identifier: String,
    pub port: String,
    pub pin: u8,
    pub mode: PinMode,
    pub pull: Pull,
    pub initial: Level,
    pub active_high: bool,
    pub reserved: bool,
    #[serde(default)]
    pub reserved_reason: Option<String>,
    pub skip_initialization: bool,
}

impl From<&ResolvedPin> for ManifestPin {
    fn from(pin: &ResolvedPin) -> Self {
        Self {
            name: pin.name.clone(),
            identifier: pin.identifier.clone(),
            port: pin.port.to_string(),
            pin: pin.pin,
            mode: pin.mode,
            pull: pin.pull,
            initial: pin.initial,
            active_high: pin.active_high,
            reserved: pin.reserved,
            reserved_reason: pin.reserved_reason.clone(),
            skip_initialization: pin.skip_init,
        }
    }
}

/// Summary of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationManifest {
    /// UTC, ISO-8601 with a literal `Z`.
    pub generated_at: String,
    pub board: String,
    pub pack: String,
    pub mcu: String,
    /// Absolute path of the project directory.
    pub output_dir: PathBuf,
    pub toolchain: String,
    pub pins: Vec<ManifestPin>,
    /// Digest of every generated file, keyed by project-relative path.
    #[serde(default)]
    pub files: BTreeMap<String, FileDigest>,
}

/// Timestamp in the manifest's format, e.g. `2026-10-18T09:30:00.123456Z`.
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

impl GenerationManifest {
    pub fn path_in(project_dir: &Path) -> PathBuf {
        project_dir.join(MANIFEST_FILE)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(GenerateError::io("read", path))?;
        serde_json::from_str(&text).map_err(|e| GenerateError::Manifest {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }

    /// Load the manifest of `project_dir` if one exists.
    pub fn load_from(project_dir: &Path) -> Result<Option<Self>> {
        let path = Self::path_in(project_dir);
        if !path.is_file() {
            return Ok(None);
        }
        Self::load(&path).map(Some)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut text = serde_json::to_string_pretty(self).map_err(|e| GenerateError::Manifest {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        text.push('\n');
        fsutil::atomic_write(path, text.as_bytes()).map_err(GenerateError::io("write", path))
    }

    /// Recorded files whose current contents no longer match their digest.
    pub fn modified_files(&self, project_dir: &Path) -> Vec<String> {
        self.files
            .iter()
            .filter(|(rel, digest)| match FileDigest::of_file(&project_dir.join(rel)) {
                Some(current) => current != **digest,
                None => false,
            })
            .map(|(rel, _)| rel.clone())
            .collect()
    }
}
