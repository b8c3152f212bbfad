//! Programming a board through OpenOCD.

use std::path::PathBuf;

use fwgen_generate::{ProbeSettings, ELF_PATH};

use crate::error::{Result, ToolError};
use crate::process::{CommandSpec, ProcessRunner};

/// Flashes a generated project's firmware image.
///
/// OpenOCD runs from the project directory, so the in-tree target file and
/// the ELF path are both project-relative.
#[derive(Debug)]
pub struct Flasher<'r> {
    project_dir: PathBuf,
    probe: ProbeSettings,
    runner: &'r dyn ProcessRunner,
}

impl<'r> Flasher<'r> {
    pub fn new(project_dir: impl Into<PathBuf>, probe: ProbeSettings, runner: &'r dyn ProcessRunner) -> Self {
        Self {
            project_dir: project_dir.into(),
            probe,
            runner,
        }
    }

    pub fn probe(&self) -> &ProbeSettings {
        &self.probe
    }

    pub fn command(&self) -> CommandSpec {
        CommandSpec::new("openocd")
            .args(self.probe.openocd_args(ELF_PATH))
            .current_dir(&self.project_dir)
    }

    fn require_file(&self, rel: &str, hint: &str) -> Result<()> {
        let path = self.project_dir.join(rel);
        if path.is_file() {
            Ok(())
        } else {
            Err(ToolError::Config(format!("{} not found; {hint}", path.display())))
        }
    }

    pub fn flash(&self, on_line: &mut dyn FnMut(&str)) -> Result<()> {
        self.require_file(&self.probe.target_cfg, "regenerate the project")?;
        self.require_file(ELF_PATH, "build the project first")?;
        let command = self.command();
        tracing::info!(command = %command, "flashing");
        self.runner.run_checked(&command, on_line)
    }
}
