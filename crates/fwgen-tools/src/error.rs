//! Errors from external tool invocations.

use std::io;

use fwgen_core::{Diagnose, ErrorDetail, ErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// A command ran and exited non-zero.
    #[error("`{command}` failed with exit code {code}")]
    ExternalProcess { command: String, code: i32 },

    /// Required tools are not installed or not on PATH.
    #[error("required tools not found: {}", tools.join(", "))]
    ToolMissing { tools: Vec<String> },

    /// A command could not be started for a reason other than a missing binary.
    #[error("cannot start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The project is not in a state the pipeline can work with.
    #[error("{0}")]
    Config(String),
}

impl Diagnose for ToolError {
    fn detail(&self) -> ErrorDetail {
        match self {
            ToolError::ExternalProcess { code, .. } => ErrorDetail::new(
                ErrorKind::ExternalProcess,
                format!("Command failed with exit code {code}."),
                "Review the command output and verify toolchain paths.",
            ),
            ToolError::ToolMissing { .. } => ErrorDetail::new(
                ErrorKind::ToolMissing,
                self.to_string(),
                "Install the missing tool and ensure it is on PATH.",
            ),
            ToolError::Spawn { source, .. } if source.kind() == io::ErrorKind::PermissionDenied => {
                ErrorDetail::new(
                    ErrorKind::ExternalProcess,
                    self.to_string(),
                    "Add your user to the dialout group and re-login.",
                )
            }
            ToolError::Spawn { .. } => ErrorDetail::new(
                ErrorKind::ExternalProcess,
                self.to_string(),
                "Review the logs for details and try again.",
            ),
            ToolError::Config(_) => ErrorDetail::new(
                ErrorKind::Generation,
                self.to_string(),
                "Generate the project first with `fwgen generate`.",
            ),
        }
    }
}

/// Result type for tool pipelines.
pub type Result<T> = std::result::Result<T, ToolError>;
