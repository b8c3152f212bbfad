//! Reading board and pack records from disk.
//!
//! Records are TOML or JSON, chosen by file extension. Parsing is followed by
//! normalization (derived defaults, case folding) and structural validation.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::board::BoardDefinition;
use crate::error::{CatalogError, Result};
use crate::pack::PackDefinition;

/// File names probed, in order, inside a pack directory.
pub const PACK_RECORD_NAMES: [&str; 2] = ["pack.toml", "pack.json"];

/// Serialization format of a record file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Toml,
    Json,
}

impl RecordFormat {
    /// Format implied by the file extension, if it is a record file at all.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Some(RecordFormat::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(RecordFormat::Json),
            _ => None,
        }
    }

    pub fn parse<T: DeserializeOwned>(self, text: &str) -> std::result::Result<T, String> {
        match self {
            RecordFormat::Toml => toml::from_str(text).map_err(|e| e.to_string()),
            RecordFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        }
    }
}

fn read_record<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = RecordFormat::from_path(path).ok_or_else(|| CatalogError::Parse {
        path: path.to_path_buf(),
        detail: "unsupported extension (expected .toml or .json)".into(),
    })?;
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    format.parse(&text).map_err(|detail| CatalogError::Parse {
        path: path.to_path_buf(),
        detail,
    })
}

fn check(path: &Path, problems: Vec<String>) -> Result<()> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::Invalid {
            path: path.to_path_buf(),
            detail: problems.join("; "),
        })
    }
}

/// Load one board record.
pub fn load_board(path: &Path) -> Result<BoardDefinition> {
    let mut board: BoardDefinition = read_record(path)?;
    board.normalize();
    check(path, board.problems())?;
    board.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
    board.source = path.to_path_buf();
    Ok(board)
}

/// Locate the record file of a pack directory.
pub fn pack_record_path(pack_dir: &Path) -> Option<PathBuf> {
    PACK_RECORD_NAMES
        .iter()
        .map(|name| pack_dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Load the pack rooted at `pack_dir`.
pub fn load_pack(pack_dir: &Path) -> Result<PackDefinition> {
    let path = pack_record_path(pack_dir).ok_or_else(|| CatalogError::Parse {
        path: pack_dir.to_path_buf(),
        detail: "no pack.toml or pack.json".into(),
    })?;
    let mut pack: PackDefinition = read_record(&path)?;
    pack.normalize();
    check(&path, pack.problems())?;
    pack.root = pack_dir.to_path_buf();
    pack.source = path;
    Ok(pack)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD_JSON: &str = r#"{
  "id": "nucleo_f030r8",
  "pack": "stm32f0",
  "mcu": "STM32F030R8Tx",
  "memory": {
    "flash": {"origin": "0x08000000", "length": "0x10000"},
    "ram": {"origin": "0x20000000", "length": "0x2000"}
  },
  "led": {"port": "a", "pin": 5},
  "reserved_pins": [{"port": "a", "pin": 13, "reason": "SWDIO"}],
  "openocd": {"interface_cfg": "interface/stlink.cfg", "speed_khz": 1000}
}"#;

    #[test]
    fn format_from_extension() {
        assert_eq!(RecordFormat::from_path(Path::new("b.toml")), Some(RecordFormat::Toml));
        assert_eq!(RecordFormat::from_path(Path::new("b.JSON")), Some(RecordFormat::Json));
        assert_eq!(RecordFormat::from_path(Path::new("README.md")), None);
    }

    #[test]
    fn load_json_board() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nucleo_f030r8.json");
        std::fs::write(&path, BOARD_JSON).unwrap();

        let board = load_board(&path).unwrap();
        assert_eq!(board.name, "nucleo_f030r8");
        assert_eq!(board.led.name, "LED");
        assert_eq!(board.led.port.to_string(), "A");
        assert_eq!(board.debug_probe.speed_khz, Some(1000));
        assert_eq!(board.root, dir.path());
        assert_eq!(board.source, path);
    }

    #[test]
    fn parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "id = [[[").unwrap();
        let err = load_board(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn invalid_board_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, BOARD_JSON.replace("\"pin\": 5", "\"pin\": 17")).unwrap();
        let err = load_board(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid { .. }));
    }

    #[test]
    fn pack_dir_without_record() {
        let dir = tempfile::tempdir().unwrap();
        assert!(pack_record_path(dir.path()).is_none());
        assert!(load_pack(dir.path()).is_err());
    }
}
