//! Cross-toolchain detection.
//!
//! Each tool is probed by running it with `--version`; a tool counts as
//! installed when it starts at all, whatever its exit code.

use crate::error::{Result, ToolError};
use crate::process::{capture, CommandSpec, ProcessRunner};

/// A tool fwgen knows how to probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSpec {
    pub name: &'static str,
    /// Whether a complete build-and-flash setup needs it.
    pub required: bool,
    pub purpose: &'static str,
}

pub const KNOWN_TOOLS: [ToolSpec; 7] = [
    ToolSpec {
        name: "arm-none-eabi-gcc",
        required: true,
        purpose: "C compiler and assembler",
    },
    ToolSpec {
        name: "arm-none-eabi-objcopy",
        required: true,
        purpose: "HEX/BIN image conversion",
    },
    ToolSpec {
        name: "cmake",
        required: true,
        purpose: "build configuration",
    },
    ToolSpec {
        name: "ninja",
        required: true,
        purpose: "build execution",
    },
    ToolSpec {
        name: "make",
        required: false,
        purpose: "Makefile builds",
    },
    ToolSpec {
        name: "openocd",
        required: true,
        purpose: "debug probe flashing",
    },
    ToolSpec {
        name: "STM32_Programmer_CLI",
        required: false,
        purpose: "alternative flashing",
    },
];

/// Probe result for one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub spec: ToolSpec,
    /// First non-empty line of `--version` output; `None` when not found.
    pub version: Option<String>,
}

impl ToolStatus {
    pub fn found(&self) -> bool {
        self.version.is_some()
    }
}

/// Probe results for every known tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainStatus {
    pub tools: Vec<ToolStatus>,
}

impl ToolchainStatus {
    pub fn get(&self, name: &str) -> Option<&ToolStatus> {
        self.tools.iter().find(|t| t.spec.name == name)
    }

    /// Required tools that were not found.
    pub fn missing_required(&self) -> Vec<&'static str> {
        self.tools
            .iter()
            .filter(|t| t.spec.required && !t.found())
            .map(|t| t.spec.name)
            .collect()
    }

    /// Fail with every required tool that is missing.
    pub fn require_all(&self) -> Result<()> {
        missing_error(self.missing_required())
    }

    /// Fail with every tool in `names` that is missing.
    pub fn require(&self, names: &[&str]) -> Result<()> {
        let missing = names
            .iter()
            .copied()
            .filter(|name| !self.get(name).is_some_and(ToolStatus::found))
            .collect();
        missing_error(missing)
    }
}

fn missing_error(missing: Vec<&str>) -> Result<()> {
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ToolError::ToolMissing {
            tools: missing.into_iter().map(str::to_string).collect(),
        })
    }
}

fn probe(runner: &dyn ProcessRunner, spec: ToolSpec) -> ToolStatus {
    let command = CommandSpec::new(spec.name).arg("--version");
    let version = match capture(runner, &command) {
        Ok((_, lines)) => Some(
            lines
                .into_iter()
                .map(|l| l.trim().to_string())
                .find(|l| !l.is_empty())
                .unwrap_or_else(|| "(unknown version)".to_string()),
        ),
        Err(ToolError::ToolMissing { .. }) => None,
        Err(err) => {
            tracing::debug!(tool = spec.name, error = %err, "tool probe failed");
            None
        }
    };
    tracing::debug!(tool = spec.name, found = version.is_some(), "probed tool");
    ToolStatus { spec, version }
}

/// Probe every known tool.
pub fn detect(runner: &dyn ProcessRunner) -> ToolchainStatus {
    ToolchainStatus {
        tools: KNOWN_TOOLS.iter().map(|spec| probe(runner, *spec)).collect(),
    }
}
