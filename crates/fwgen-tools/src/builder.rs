//! Building a generated project.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};
use crate::process::{path_arg, CommandSpec, ProcessRunner};

/// How a generated project is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildSystem {
    /// `cmake -G Ninja` configure, then `cmake --build`.
    #[default]
    Cmake,
    /// The generated Makefile.
    Make,
}

impl BuildSystem {
    /// Tools this build system invokes, compiler included.
    pub fn required_tools(self) -> &'static [&'static str] {
        match self {
            BuildSystem::Cmake => &["arm-none-eabi-gcc", "arm-none-eabi-objcopy", "cmake", "ninja"],
            BuildSystem::Make => &["arm-none-eabi-gcc", "arm-none-eabi-objcopy", "make"],
        }
    }
}

impl fmt::Display for BuildSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildSystem::Cmake => f.write_str("cmake"),
            BuildSystem::Make => f.write_str("make"),
        }
    }
}

impl FromStr for BuildSystem {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cmake" | "ninja" => Ok(BuildSystem::Cmake),
            "make" => Ok(BuildSystem::Make),
            other => Err(format!("unknown build system '{other}' (expected cmake or make)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub project_dir: PathBuf,
    pub build_dir: PathBuf,
    pub system: BuildSystem,
}

impl BuildConfig {
    /// Build inside `<project_dir>/build`.
    pub fn new(project_dir: impl Into<PathBuf>, system: BuildSystem) -> Self {
        let project_dir = project_dir.into();
        Self {
            build_dir: project_dir.join("build"),
            project_dir,
            system,
        }
    }
}

/// Configures and builds a project through a [`ProcessRunner`].
#[derive(Debug)]
pub struct Builder<'r> {
    config: BuildConfig,
    runner: &'r dyn ProcessRunner,
}

impl<'r> Builder<'r> {
    pub fn new(config: BuildConfig, runner: &'r dyn ProcessRunner) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// The configure step, if the build system has one.
    pub fn configure_command(&self) -> Option<CommandSpec> {
        match self.config.system {
            BuildSystem::Cmake => Some(
                CommandSpec::new("cmake")
                    .args(["-S".to_string(), path_arg(&self.config.project_dir)])
                    .args(["-B".to_string(), path_arg(&self.config.build_dir)])
                    .args(["-G", "Ninja"])
                    .current_dir(&self.config.project_dir),
            ),
            BuildSystem::Make => None,
        }
    }

    pub fn build_command(&self) -> CommandSpec {
        match self.config.system {
            BuildSystem::Cmake => CommandSpec::new("cmake")
                .arg("--build")
                .arg(path_arg(&self.config.build_dir))
                .current_dir(&self.config.project_dir),
            BuildSystem::Make => CommandSpec::new("make").current_dir(&self.config.project_dir),
        }
    }

    fn check_project(&self, marker: &str) -> Result<()> {
        let path = self.config.project_dir.join(marker);
        if path.is_file() {
            Ok(())
        } else {
            Err(ToolError::Config(format!(
                "{marker} not found in the project directory {}",
                self.config.project_dir.display()
            )))
        }
    }

    pub fn configure(&self, on_line: &mut dyn FnMut(&str)) -> Result<()> {
        let Some(command) = self.configure_command() else {
            return Ok(());
        };
        self.check_project("CMakeLists.txt")?;
        tracing::info!(command = %command, "configuring");
        self.runner.run_checked(&command, on_line)
    }

    pub fn build(&self, on_line: &mut dyn FnMut(&str)) -> Result<()> {
        if self.config.system == BuildSystem::Make {
            self.check_project("Makefile")?;
        }
        let command = self.build_command();
        tracing::info!(command = %command, "building");
        self.runner.run_checked(&command, on_line)
    }

    /// Configure, then build.
    pub fn run(&self, on_line: &mut dyn FnMut(&str)) -> Result<()> {
        self.configure(on_line)?;
        self.build(on_line)
    }
}

/// The firmware image a successful build leaves in `project_dir`.
pub fn elf_path(project_dir: &Path) -> PathBuf {
    project_dir.join(fwgen_generate::ELF_PATH)
}
