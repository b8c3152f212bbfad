//! Generation errors.

use std::path::PathBuf;

use fwgen_core::{Diagnose, ErrorDetail, ErrorKind};
use fwgen_pins::PinError;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Pin requests failed validation. Nothing was written.
    #[error(transparent)]
    Pins(#[from] PinError),

    /// A filesystem operation on the output tree failed.
    #[error("cannot {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A pack file the project needs does not exist.
    #[error("{what} not found: {}", path.display())]
    MissingSource { what: &'static str, path: PathBuf },

    /// The pack binds a template that is not in its templates directory.
    #[error("template '{template}' not found in {}", dir.display())]
    MissingTemplate { template: String, dir: PathBuf },

    /// A template failed to parse or referenced an undefined value.
    #[error("cannot render template '{template}': {detail}")]
    Render { template: String, detail: String },

    /// The manifest could not be encoded or decoded.
    #[error("invalid manifest {}: {detail}", path.display())]
    Manifest { path: PathBuf, detail: String },
}

impl GenerateError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| GenerateError::Io { action, path, source }
    }
}

impl Diagnose for GenerateError {
    fn detail(&self) -> ErrorDetail {
        match self {
            GenerateError::Pins(err) => err.detail(),
            GenerateError::Io { .. } => ErrorDetail::new(
                ErrorKind::Generation,
                self.to_string(),
                "Check that the output directory is writable and has free space.",
            ),
            GenerateError::MissingSource { .. } | GenerateError::MissingTemplate { .. } => ErrorDetail::new(
                ErrorKind::Generation,
                self.to_string(),
                "Check pack directories under packs/.",
            ),
            GenerateError::Render { .. } => ErrorDetail::new(
                ErrorKind::Generation,
                self.to_string(),
                "Fix the pack template; every referenced value must exist in the generation context.",
            ),
            GenerateError::Manifest { .. } => ErrorDetail::new(
                ErrorKind::Generation,
                self.to_string(),
                "Delete the manifest and generate again.",
            ),
        }
    }
}

/// Result type for generation.
pub type Result<T> = std::result::Result<T, GenerateError>;
