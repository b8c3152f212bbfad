//! Pin resolution errors.
//!
//! Both variants are raised before anything is written to disk.

use std::fmt;

use fwgen_core::{Diagnose, ErrorDetail, ErrorKind, PinLocation};

/// The request field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinField {
    Name,
    Port,
    Pin,
    Mode,
    Pull,
    Initial,
}

impl fmt::Display for PinField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PinField::Name => "name",
            PinField::Port => "port",
            PinField::Pin => "pin",
            PinField::Mode => "mode",
            PinField::Pull => "pull",
            PinField::Initial => "initial",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PinError {
    /// A request field holds a value outside its domain.
    #[error("pin request #{index} ('{name}'): invalid {field} '{value}' (expected {expected})")]
    Validation {
        /// Zero-based position in the request list.
        index: usize,
        name: String,
        field: PinField,
        value: String,
        expected: &'static str,
    },

    /// Two requests name the same physical pin.
    #[error("pins '{first_name}' (#{first_index}) and '{second_name}' (#{second_index}) both use {location}")]
    DuplicateLocation {
        location: PinLocation,
        first_index: usize,
        first_name: String,
        second_index: usize,
        second_name: String,
    },
}

impl Diagnose for PinError {
    fn detail(&self) -> ErrorDetail {
        let action = match self {
            PinError::Validation { .. } => "Fix the pin definition ([[pins]] in fwgen.toml) and re-run.",
            PinError::DuplicateLocation { .. } => "Give each pin its own port/pin location.",
        };
        ErrorDetail::new(ErrorKind::Validation, self.to_string(), action)
    }
}

/// Result type for pin resolution.
pub type Result<T> = std::result::Result<T, PinError>;
