//! GPIO ports and physical pin locations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of pins on every GPIO port.
pub const PORT_PIN_COUNT: u8 = 16;

/// A GPIO port letter, `A` through `H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl Port {
    /// All ports in letter order.
    pub const ALL: [Port; 8] = [
        Port::A,
        Port::B,
        Port::C,
        Port::D,
        Port::E,
        Port::F,
        Port::G,
        Port::H,
    ];

    /// The port letter.
    pub fn letter(self) -> char {
        match self {
            Port::A => 'A',
            Port::B => 'B',
            Port::C => 'C',
            Port::D => 'D',
            Port::E => 'E',
            Port::F => 'F',
            Port::G => 'G',
            Port::H => 'H',
        }
    }

    /// Zero-based index of the port (`A` = 0).
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Returned when text does not name a port `A`..`H`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid GPIO port '{0}' (expected A-H)")]
pub struct InvalidPort(pub String);

impl FromStr for Port {
    type Err = InvalidPort;

    /// Parse a port letter. Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_ascii_uppercase(),
            _ => return Err(InvalidPort(s.to_string())),
        };
        Port::ALL
            .iter()
            .copied()
            .find(|p| p.letter() == letter)
            .ok_or_else(|| InvalidPort(s.to_string()))
    }
}

impl TryFrom<String> for Port {
    type Error = InvalidPort;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Port> for String {
    fn from(port: Port) -> Self {
        port.letter().to_string()
    }
}

/// A physical pin: port plus pin number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PinLocation {
    pub port: Port,
    pub pin: u8,
}

impl PinLocation {
    pub fn new(port: Port, pin: u8) -> Self {
        Self { port, pin }
    }

    /// Every location of the given ports, port-major.
    pub fn all_on(ports: &[Port]) -> impl Iterator<Item = PinLocation> + '_ {
        ports
            .iter()
            .flat_map(|&port| (0..PORT_PIN_COUNT).map(move |pin| PinLocation::new(port, pin)))
    }
}

impl fmt::Display for PinLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port, self.pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_port_case_insensitive() {
        assert_eq!("a".parse::<Port>().unwrap(), Port::A);
        assert_eq!(" H ".parse::<Port>().unwrap(), Port::H);
        assert_eq!("c".parse::<Port>().unwrap().to_string(), "C");
    }

    #[test]
    fn reject_bad_ports() {
        assert!("I".parse::<Port>().is_err());
        assert!("".parse::<Port>().is_err());
        assert!("AB".parse::<Port>().is_err());
        assert!("1".parse::<Port>().is_err());
    }

    #[test]
    fn port_serde_uses_letter() {
        let json = serde_json::to_string(&Port::C).unwrap();
        assert_eq!(json, "\"C\"");
        let port: Port = serde_json::from_str("\"f\"").unwrap();
        assert_eq!(port, Port::F);
        assert!(serde_json::from_str::<Port>("\"Z\"").is_err());
    }

    #[test]
    fn location_display() {
        assert_eq!(PinLocation::new(Port::A, 5).to_string(), "PA5");
    }

    #[test]
    fn all_on_covers_every_pin() {
        let locations: Vec<_> = PinLocation::all_on(&[Port::A, Port::C]).collect();
        assert_eq!(locations.len(), 32);
        assert_eq!(locations[0], PinLocation::new(Port::A, 0));
        assert_eq!(locations[31], PinLocation::new(Port::C, 15));
    }
}
