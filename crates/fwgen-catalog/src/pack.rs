//! MCU-family pack model.
//!
//! A pack lives in its own directory: `pack.toml` (or `pack.json`) plus a
//! `templates/` directory holding the files its bindings name.

use std::path::{Path, PathBuf};

use fwgen_core::numeric;
use serde::{Deserialize, Serialize};

/// Template bindings: which file under `templates/` produces each output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackTemplates {
    pub cmakelists: String,
    pub linker: String,
    pub system: String,
    pub main: String,
    pub family_gpio: String,
    /// Architecture-specific startup file, copied verbatim rather than rendered.
    pub startup: String,
    pub makefile: String,
    pub hal_h: String,
    pub hal_gpio_h: String,
    pub hal_gpio_c: String,
    pub hal_clock_h: String,
    pub hal_clock_c: String,
    pub hal_delay_h: String,
    pub hal_delay_c: String,
    pub app_pins_h: String,
    pub app_pins_c: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmsisConfig {
    pub strategy: String,
}

/// Debug-probe defaults for every board of the family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugProbeDefaults {
    /// Target description, relative to the pack directory unless absolute.
    pub target_cfg: String,
    #[serde(default = "default_transport")]
    pub transport: String,
    #[serde(default = "default_speed", deserialize_with = "numeric::deserialize")]
    pub speed_khz: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackDefaults {
    #[serde(default, deserialize_with = "numeric::deserialize")]
    pub system_clock_hz: u64,
}

/// An MCU-family template and default bundle. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub cpu: String,
    pub cmsis: CmsisConfig,
    pub templates: PackTemplates,
    #[serde(alias = "openocd")]
    pub debug_probe: DebugProbeDefaults,
    #[serde(default)]
    pub defaults: PackDefaults,
    /// The pack directory.
    #[serde(skip)]
    pub root: PathBuf,
    /// `pack.toml` or `pack.json` inside `root`.
    #[serde(skip)]
    pub source: PathBuf,
}

impl PackDefinition {
    pub fn templates_dir(&self) -> PathBuf {
        self.root.join("templates")
    }

    pub fn startup_path(&self) -> PathBuf {
        self.templates_dir().join(&self.templates.startup)
    }

    /// Absolute or pack-relative path of the debug-probe target description.
    pub fn target_cfg_path(&self) -> PathBuf {
        let cfg = Path::new(&self.debug_probe.target_cfg);
        if cfg.is_absolute() {
            cfg.to_path_buf()
        } else {
            self.root.join(cfg)
        }
    }

    pub fn system_clock_hz(&self) -> u64 {
        self.defaults.system_clock_hz
    }

    pub(crate) fn normalize(&mut self) {
        if self.name.trim().is_empty() {
            self.name = self.id.clone();
        }
    }

    pub(crate) fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.id.trim().is_empty() {
            problems.push("pack id is empty".to_string());
        }
        if self.cpu.trim().is_empty() {
            problems.push("cpu is empty".to_string());
        }
        if self.debug_probe.target_cfg.trim().is_empty() {
            problems.push("debug probe target_cfg is empty".to_string());
        }
        problems
    }
}

fn default_transport() -> String {
    "swd".to_string()
}

fn default_speed() -> u32 {
    4000
}
