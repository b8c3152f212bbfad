//! Debug-probe settings and the OpenOCD programming script.
//!
//! Board values override pack defaults; an explicit speed (e.g. from the
//! command line) overrides both.

use fwgen_catalog::{BoardDefinition, PackDefinition};
use serde::Serialize;

/// In-tree location of the pack's target description within a generated project.
pub const TARGET_CFG_PATH: &str = "openocd/target.cfg";

/// `None` for transports that mean "let the adapter decide".
pub fn normalize_transport(transport: &str) -> Option<String> {
    let trimmed = transport.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") || trimmed.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Effective probe configuration for one board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeSettings {
    pub interface_cfg: String,
    pub target_cfg: String,
    pub transport: Option<String>,
    pub speed_khz: u32,
    pub reset_config: Vec<String>,
}

impl ProbeSettings {
    pub fn resolve(board: &BoardDefinition, pack: &PackDefinition, speed_override: Option<u32>) -> Self {
        let probe = &board.debug_probe;
        let transport = probe
            .transport
            .as_deref()
            .unwrap_or(&pack.debug_probe.transport);
        Self {
            interface_cfg: probe.interface_cfg.trim().to_string(),
            target_cfg: TARGET_CFG_PATH.to_string(),
            transport: normalize_transport(transport),
            speed_khz: speed_override
                .or(probe.speed_khz)
                .unwrap_or(pack.debug_probe.speed_khz),
            reset_config: probe
                .reset_config
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// The `-c` script that programs, verifies and restarts `elf`.
    pub fn flash_script(&self, elf: &str) -> String {
        let mut parts: Vec<String> = self.reset_config.clone();
        if let Some(transport) = &self.transport {
            parts.push(format!("transport select {transport}"));
        }
        parts.push(format!("adapter speed {}", self.speed_khz));
        parts.push("init".to_string());
        parts.push("reset init".to_string());
        parts.push(format!("program {elf} verify reset exit"));
        parts.join("; ")
    }

    /// OpenOCD arguments, relative to the project directory.
    pub fn openocd_args(&self, elf: &str) -> Vec<String> {
        vec![
            "-f".to_string(),
            self.interface_cfg.clone(),
            "-f".to_string(),
            self.target_cfg.clone(),
            "-c".to_string(),
            self.flash_script(elf),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::{board, pack};

    #[test]
    fn transport_normalization() {
        assert_eq!(normalize_transport(""), None);
        assert_eq!(normalize_transport(" AUTO "), None);
        assert_eq!(normalize_transport("None"), None);
        assert_eq!(normalize_transport(" hla_swd "), Some("hla_swd".to_string()));
    }

    #[test]
    fn pack_defaults_apply() {
        let probe = ProbeSettings::resolve(&board(), &pack(), None);
        assert_eq!(probe.transport.as_deref(), Some("swd"));
        assert_eq!(probe.speed_khz, 4000);
        assert_eq!(
            probe.flash_script("build/firmware.elf"),
            "transport select swd; adapter speed 4000; init; reset init; program build/firmware.elf verify reset exit"
        );
    }

    #[test]
    fn board_and_override_precedence() {
        let mut board = board();
        board.debug_probe.transport = Some("auto".into());
        board.debug_probe.speed_khz = Some(1800);
        board.debug_probe.reset_config = vec!["reset_config srst_only".into(), " ".into()];
        let probe = ProbeSettings::resolve(&board, &pack(), None);
        assert_eq!(probe.speed_khz, 1800);
        assert_eq!(
            probe.flash_script("fw.elf"),
            "reset_config srst_only; adapter speed 1800; init; reset init; program fw.elf verify reset exit"
        );
        let probe = ProbeSettings::resolve(&board, &pack(), Some(950));
        assert_eq!(probe.speed_khz, 950);
    }

    #[test]
    fn openocd_arguments() {
        let probe = ProbeSettings::resolve(&board(), &pack(), None);
        let args = probe.openocd_args("build/firmware.elf");
        assert_eq!(&args[..4], ["-f", "interface/stlink.cfg", "-f", "openocd/target.cfg"]);
        assert_eq!(args[4], "-c");
    }
}
