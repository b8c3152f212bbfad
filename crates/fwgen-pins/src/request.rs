//! Untrusted pin requests and their validation.

use std::fmt;
use std::str::FromStr;

use fwgen_core::{PinLocation, Port, PORT_PIN_COUNT};
use serde::{Deserialize, Serialize};

use crate::error::{PinError, PinField, Result};

/// GPIO direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinMode {
    Input,
    Output,
}

/// Internal pull resistor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pull {
    None,
    Up,
    Down,
}

/// Logic level driven at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    High,
}

macro_rules! keyword_enum {
    ($ty:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ();

            /// Case-insensitive, surrounding whitespace ignored.
            fn from_str(s: &str) -> std::result::Result<Self, ()> {
                let s = s.trim();
                $(if s.eq_ignore_ascii_case($text) {
                    return Ok($ty::$variant);
                })+
                Err(())
            }
        }
    };
}

keyword_enum!(PinMode { Input => "input", Output => "output" });
keyword_enum!(Pull { None => "none", Up => "up", Down => "down" });
keyword_enum!(Level { Low => "low", High => "high" });

/// A user's request for one GPIO pin, exactly as entered.
///
/// Nothing here is trusted; [`PinRequest::validate`] checks every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinRequest {
    pub name: String,
    pub port: String,
    pub pin: i64,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_pull")]
    pub pull: String,
    #[serde(default = "default_initial")]
    pub initial: String,
    #[serde(default = "default_true")]
    pub active_high: bool,
    /// Mark the pin reserved even if the board does not list it.
    #[serde(default)]
    pub reserved: bool,
}

impl PinRequest {
    /// An input request with no pull, initial low, active high.
    pub fn new(name: impl Into<String>, port: impl Into<String>, pin: i64) -> Self {
        Self {
            name: name.into(),
            port: port.into(),
            pin,
            mode: default_mode(),
            pull: default_pull(),
            initial: default_initial(),
            active_high: true,
            reserved: false,
        }
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn with_pull(mut self, pull: impl Into<String>) -> Self {
        self.pull = pull.into();
        self
    }

    pub fn with_initial(mut self, initial: impl Into<String>) -> Self {
        self.initial = initial.into();
        self
    }

    pub fn with_active_high(mut self, active_high: bool) -> Self {
        self.active_high = active_high;
        self
    }

    pub fn with_reserved(mut self, reserved: bool) -> Self {
        self.reserved = reserved;
        self
    }

    /// Check every field, `index` being the request's list position.
    pub fn validate(&self, index: usize) -> Result<ValidRequest> {
        let invalid = |field: PinField, value: String, expected: &'static str| PinError::Validation {
            index,
            name: self.name.clone(),
            field,
            value,
            expected,
        };

        let name = self.name.trim();
        if name.is_empty() {
            return Err(invalid(PinField::Name, self.name.clone(), "a non-empty name"));
        }
        let port: Port = self
            .port
            .parse()
            .map_err(|_| invalid(PinField::Port, self.port.clone(), "a port letter A-H"))?;
        let pin = u8::try_from(self.pin)
            .ok()
            .filter(|p| *p < PORT_PIN_COUNT)
            .ok_or_else(|| invalid(PinField::Pin, self.pin.to_string(), "a pin number 0-15"))?;
        let mode = self
            .mode
            .parse()
            .map_err(|_| invalid(PinField::Mode, self.mode.clone(), "input or output"))?;
        let pull = self
            .pull
            .parse()
            .map_err(|_| invalid(PinField::Pull, self.pull.clone(), "none, up or down"))?;
        let initial = self
            .initial
            .parse()
            .map_err(|_| invalid(PinField::Initial, self.initial.clone(), "low or high"))?;

        Ok(ValidRequest {
            index,
            name: name.to_string(),
            location: PinLocation::new(port, pin),
            mode,
            pull,
            initial,
            active_high: self.active_high,
            reserved: self.reserved,
        })
    }
}

/// A request whose fields all passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRequest {
    pub index: usize,
    pub name: String,
    pub location: PinLocation,
    pub mode: PinMode,
    pub pull: Pull,
    pub initial: Level,
    pub active_high: bool,
    pub reserved: bool,
}

fn default_mode() -> String {
    PinMode::Input.as_str().to_string()
}

fn default_pull() -> String {
    Pull::None.as_str().to_string()
}

fn default_initial() -> String {
    Level::Low.as_str().to_string()
}

fn default_true() -> bool {
    true
}
