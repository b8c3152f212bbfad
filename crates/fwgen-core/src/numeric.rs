//! Numeric fields in board and pack records.
//!
//! Memory origins are usually written as hex (`"0x08000000"`) while pin
//! numbers and speeds are plain integers. Every numeric field accepts a native
//! integer, decimal text, or `0x`-prefixed hex text.

use serde::{Deserialize, Deserializer};

/// Returned when numeric text cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid number '{text}': {detail}")]
pub struct ParseNumberError {
    pub text: String,
    pub detail: String,
}

/// Parse decimal or `0x`-prefixed hex text.
pub fn parse_u64(text: &str) -> Result<u64, ParseNumberError> {
    let trimmed = text.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse::<u64>(),
    };
    parsed.map_err(|e| ParseNumberError {
        text: text.to_string(),
        detail: e.to_string(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Int(u64),
    Text(String),
}

/// `deserialize_with` adapter for integer-or-text numeric fields.
///
/// Works for any integer type the parsed `u64` converts into, so out-of-range
/// values are rejected rather than truncated.
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let value = match RawNumber::deserialize(deserializer)? {
        RawNumber::Int(n) => n,
        RawNumber::Text(text) => parse_u64(&text).map_err(serde::de::Error::custom)?,
    };
    T::try_from(value).map_err(|_| serde::de::Error::custom(format!("number {value} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Region {
        #[serde(deserialize_with = "deserialize")]
        origin: u64,
        #[serde(deserialize_with = "deserialize")]
        pin: u8,
    }

    #[test]
    fn parse_decimal_and_hex() {
        assert_eq!(parse_u64("4000").unwrap(), 4000);
        assert_eq!(parse_u64("0x08000000").unwrap(), 0x0800_0000);
        assert_eq!(parse_u64(" 0X40000 ").unwrap(), 0x40000);
    }

    #[test]
    fn reject_garbage() {
        assert!(parse_u64("").is_err());
        assert!(parse_u64("0x").is_err());
        assert!(parse_u64("12kb").is_err());
        assert!(parse_u64("-1").is_err());
    }

    #[test]
    fn deserialize_from_toml_int_and_text() {
        let region: Region = toml::from_str("origin = \"0x20000000\"\npin = 5\n").unwrap();
        assert_eq!(region.origin, 0x2000_0000);
        assert_eq!(region.pin, 5);

        let region: Region = toml::from_str("origin = 134217728\npin = \"13\"\n").unwrap();
        assert_eq!(region.origin, 0x0800_0000);
        assert_eq!(region.pin, 13);
    }

    #[test]
    fn deserialize_from_json() {
        let region: Region = serde_json::from_str(r#"{"origin": "0x8000", "pin": "0xF"}"#).unwrap();
        assert_eq!(region.origin, 0x8000);
        assert_eq!(region.pin, 15);
    }

    #[test]
    fn deserialize_rejects_out_of_range() {
        let result: Result<Region, _> = toml::from_str("origin = 0\npin = 300\n");
        assert!(result.is_err());
    }
}
