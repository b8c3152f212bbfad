//! Error taxonomy shared by every fwgen crate.
//!
//! Each crate keeps its own `thiserror` enum; [`Diagnose`] maps those errors
//! onto one taxonomy so callers can show a summary plus a corrective action
//! without knowing which crate failed.

use std::fmt;

/// Coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unknown board or pack id, or missing catalog data. Never after mutation.
    NotFound,
    /// Malformed pin request. Never after mutation.
    Validation,
    /// Filesystem failure or missing template/source file; may follow partial writes.
    Generation,
    /// An external tool exited non-zero.
    ExternalProcess,
    /// A required external tool is not installed.
    ToolMissing,
}

impl ErrorKind {
    /// Whether this kind of failure can leave the output directory partially written.
    pub fn may_follow_mutation(self) -> bool {
        matches!(self, ErrorKind::Generation | ErrorKind::ExternalProcess)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::Validation => "validation",
            ErrorKind::Generation => "generation",
            ErrorKind::ExternalProcess => "external process",
            ErrorKind::ToolMissing => "tool missing",
        };
        f.write_str(name)
    }
}

/// A human-readable failure summary with a suggested corrective action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub kind: ErrorKind,
    pub summary: String,
    pub action: String,
}

impl ErrorDetail {
    pub fn new(kind: ErrorKind, summary: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            kind,
            summary: summary.into(),
            action: action.into(),
        }
    }
}

/// Implemented by every error type that can reach a user.
pub trait Diagnose {
    fn detail(&self) -> ErrorDetail;
}
