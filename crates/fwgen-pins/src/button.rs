//! User button recognition.

use crate::identifier::strip_prefix;
use crate::resolve::ResolvedPin;

/// Names that mark a pin as the board's user button, compared case-insensitively.
pub const BUTTON_ALIASES: [&str; 7] = ["B1", "USER_BUTTON", "USER_BTN", "BUTTON", "BTN", "SW1", "SW"];

fn is_button_name(text: &str) -> bool {
    BUTTON_ALIASES.iter().any(|alias| alias.eq_ignore_ascii_case(text))
}

/// Identifier of the first pin whose display name or unprefixed identifier
/// is a button alias.
pub fn button_identifier(pins: &[ResolvedPin]) -> Option<&str> {
    pins.iter()
        .find(|pin| is_button_name(pin.name.trim()) || is_button_name(strip_prefix(&pin.identifier)))
        .map(|pin| pin.identifier.as_str())
}
