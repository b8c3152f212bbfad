//! `fwgen doctor`: toolchain, catalog and project diagnostics.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use fwgen_catalog::Registry;
use fwgen_generate::GenerationManifest;
use fwgen_tools::{detect, ProcessRunner};

use crate::config::{FwgenConfig, CONFIG_FILE};

/// Print diagnostic information.
pub fn run(
    runner: &dyn ProcessRunner,
    project: Option<(&FwgenConfig, &Path)>,
    data_root: Option<&Path>,
    output_dir: Option<&Path>,
) -> Result<()> {
    print!("{}", report(runner, project, data_root, output_dir));
    Ok(())
}

pub(crate) fn report(
    runner: &dyn ProcessRunner,
    project: Option<(&FwgenConfig, &Path)>,
    data_root: Option<&Path>,
    output_dir: Option<&Path>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== fwgen Doctor ===");
    let _ = writeln!(out);
    let _ = writeln!(out, "fwgen version: {}", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(out);

    let _ = writeln!(out, "--- Toolchain ---");
    let status = detect(runner);
    for tool in &status.tools {
        let optional = if tool.spec.required { "" } else { " (optional)" };
        match &tool.version {
            Some(version) => {
                let _ = writeln!(out, "  {}: {version}", tool.spec.name);
            }
            None => {
                let _ = writeln!(
                    out,
                    "  {}: not found{optional}, needed for {}",
                    tool.spec.name, tool.spec.purpose
                );
            }
        }
    }
    let missing = status.missing_required();
    if !missing.is_empty() {
        let _ = writeln!(out, "  Missing required tools: {}", missing.join(", "));
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "--- Catalog ---");
    match data_root {
        Some(root) => {
            let _ = writeln!(out, "  Data root: {}", root.display());
            match Registry::load(root) {
                Ok(registry) => {
                    let _ = writeln!(out, "  Boards:    {}", registry.boards.len());
                    let _ = writeln!(out, "  Packs:     {}", registry.packs.len());
                }
                Err(e) => {
                    let _ = writeln!(out, "  error: {e}");
                }
            }
        }
        None => {
            let _ = writeln!(out, "  Data root: not found");
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "--- Project Status ---");
    match project {
        Some((config, dir)) => {
            let _ = writeln!(out, "  {CONFIG_FILE}: found at {}", dir.display());
            let _ = writeln!(out, "  Project: {}", config.project.name);
            let _ = writeln!(out, "  Board:   {}", config.project.board);
            let _ = writeln!(out, "  Pins:    {} requested", config.pins.len());
        }
        None => {
            let _ = writeln!(out, "  {CONFIG_FILE}: not found");
        }
    }
    if let Some(dir) = output_dir {
        match GenerationManifest::load_from(dir) {
            Ok(Some(manifest)) => {
                let _ = writeln!(out, "  Generated: {} ({})", manifest.generated_at, manifest.board);
                let edited = manifest.modified_files(dir);
                if !edited.is_empty() {
                    let _ = writeln!(out, "  Edited since generation: {}", edited.join(", "));
                }
            }
            Ok(None) => {
                let _ = writeln!(out, "  Generated: no (run `fwgen generate`)");
            }
            Err(e) => {
                let _ = writeln!(out, "  Generated: error reading manifest: {e}");
            }
        }
    }
    out
}
