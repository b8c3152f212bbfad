//! Pin resolution engine.
//!
//! Merges a board's fixed facts (user LED, reserved pins) with arbitrary user
//! pin requests into an ordered, validated, conflict-free pin map:
//!
//! - [`request`]: untrusted [`PinRequest`]s and their validation
//! - [`identifier`]: C identifier derivation and collision suffixes
//! - [`resolve`]: the resolver producing a [`PinMap`]
//! - [`button`]: recognizing a user button among resolved pins
//! - [`populate`]: expanding a board into a request for every pin
//!
//! Every resolved map upholds three invariants: locations are pairwise
//! distinct, identifiers are pairwise distinct, and exactly one pin is the
//! LED, located at the board's LED location and carrying the canonical
//! identifier of the LED alias.

pub mod button;
pub mod error;
pub mod identifier;
pub mod populate;
pub mod request;
pub mod resolve;

pub use button::{button_identifier, BUTTON_ALIASES};
pub use error::{PinError, Result};
pub use identifier::{canonical_identifier, IDENTIFIER_PREFIX};
pub use populate::populate_all;
pub use request::{Level, PinMode, PinRequest, Pull};
pub use resolve::{effective_led_alias, resolve, PinMap, ResolvedPin};
