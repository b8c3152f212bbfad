//! `fwgen flash`: program the board with the built image.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use fwgen_catalog::Registry;
use fwgen_generate::{GenerationManifest, ProbeSettings, MANIFEST_FILE};
use fwgen_tools::{detect, Flasher, ProcessRunner};

pub fn run(runner: &dyn ProcessRunner, registry: &Registry, project_dir: &Path, speed_khz: Option<u32>) -> Result<()> {
    flash_project(runner, registry, project_dir, speed_khz, &mut |line| println!("{line}"))?;
    println!("Flashed {}", project_dir.display());
    Ok(())
}

/// Flash using the board recorded in the project's generation manifest.
pub(crate) fn flash_project(
    runner: &dyn ProcessRunner,
    registry: &Registry,
    project_dir: &Path,
    speed_khz: Option<u32>,
    on_line: &mut dyn FnMut(&str),
) -> Result<()> {
    let manifest = GenerationManifest::load_from(project_dir)?.ok_or_else(|| {
        anyhow!(
            "no {MANIFEST_FILE} in {} (run `fwgen generate` first)",
            project_dir.display()
        )
    })?;
    let (board, pack) = registry.board_and_pack(&manifest.board)?;
    let probe = ProbeSettings::resolve(board, pack, speed_khz);

    detect(runner).require(&["openocd"])?;
    Flasher::new(project_dir, probe, runner)
        .flash(on_line)
        .with_context(|| format!("flashing {} onto {}", project_dir.display(), board.name))
}
