//! `fwgen.toml` project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fwgen_catalog::EntryKind;
use fwgen_pins::PinRequest;
use fwgen_tools::BuildSystem;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "fwgen.toml";

/// The top-level structure of a project's `fwgen.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FwgenConfig {
    pub project: ProjectConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub flash: FlashConfig,
    /// Pin requests, in the order they are resolved.
    #[serde(default)]
    pub pins: Vec<PinRequest>,
}

/// Project metadata section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    /// Board id from the catalog.
    pub board: String,
    /// Firmware directory, relative to the directory holding `fwgen.toml`.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Display name of the board LED.
    #[serde(default)]
    pub led_alias: Option<String>,
}

fn default_output() -> PathBuf {
    PathBuf::from("firmware")
}

/// Where board and pack records live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding `boards/` and `packs/`, relative to the project.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    pub system: BuildSystem,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlashConfig {
    /// Adapter speed override for flashing.
    #[serde(default)]
    pub speed_khz: Option<u32>,
}

impl FwgenConfig {
    /// Search upward from `start_dir` for `fwgen.toml`, returning the parsed
    /// file and the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let config = Self::from_toml(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((config, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Absolute firmware directory for a config found in `project_dir`.
    pub fn output_dir(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.project.output)
    }

    /// Configured data root, resolved against `project_dir`.
    pub fn data_root(&self, project_dir: &Path) -> Option<PathBuf> {
        self.data.root.as_ref().map(|root| project_dir.join(root))
    }

    /// The default file written by `fwgen init`.
    pub fn template(name: &str, board: &str) -> String {
        format!(
            r#"[project]
name = "{name}"
board = "{board}"
output = "firmware"
# led_alias = "LD2"

[build]
system = "cmake"

# [data]
# root = "../fwgen-data"

# [flash]
# speed_khz = 1800

# [[pins]]
# name = "BTN1"
# port = "C"
# pin = 13
# mode = "input"
# pull = "up"
"#
        )
    }
}

/// The nearest ancestor of `start_dir` (inclusive) holding both `boards/`
/// and `packs/`.
pub fn find_data_root(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .find(|dir| {
            dir.join(EntryKind::Board.dir_name()).is_dir() && dir.join(EntryKind::Pack.dir_name()).is_dir()
        })
        .map(Path::to_path_buf)
}
