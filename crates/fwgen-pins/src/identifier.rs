//! C identifiers for resolved pins.
//!
//! A display name such as `"user button"` becomes `APP_PIN_USER_BUTTON`.
//! Derivation is case-insensitive, so `"Sensor"` and `"sensor"` share a
//! canonical identifier and need a collision suffix.

use std::collections::HashSet;

/// Namespace prefix of every generated pin identifier.
pub const IDENTIFIER_PREFIX: &str = "APP_PIN_";

/// Stand-in for names with no usable characters.
const EMPTY_STEM: &str = "PIN";

/// Uppercase `name`, replace every non-alphanumeric character with `_`,
/// trim `_` from both ends, and make sure the result does not start with a digit.
pub fn identifier_stem(name: &str) -> String {
    let mapped: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = mapped.trim_matches('_');
    match trimmed.chars().next() {
        None => EMPTY_STEM.to_string(),
        Some(c) if c.is_ascii_digit() => format!("{EMPTY_STEM}_{trimmed}"),
        Some(_) => trimmed.to_string(),
    }
}

/// The identifier a pin named `name` gets when nothing collides with it.
pub fn canonical_identifier(name: &str) -> String {
    format!("{IDENTIFIER_PREFIX}{}", identifier_stem(name))
}

/// The identifier without its namespace prefix.
pub fn strip_prefix(identifier: &str) -> &str {
    identifier.strip_prefix(IDENTIFIER_PREFIX).unwrap_or(identifier)
}

/// `base` if unclaimed, else the first unclaimed of `base_2`, `base_3`, ...
pub fn first_unused(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{base}_{n}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
