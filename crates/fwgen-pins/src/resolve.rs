//! Pin resolution.
//!
//! Resolution runs in three phases:
//!
//! 1. **Validate** every request and reject shared locations. Nothing has
//!    been named yet, so a failure here says nothing about identifiers.
//! 2. **Shape** each request into a tentative pin: the request at the board
//!    LED location takes the LED role (forced output/none/low, board
//!    polarity, alias name), reservations are attached, and an LED is
//!    synthesized at the end if no request claimed the location.
//! 3. **Name** every pin. The LED claims its canonical identifier first;
//!    the remaining pins claim theirs in list order, taking the first unused
//!    `_2`, `_3`, ... suffix on collision. Generated application code refers
//!    to the LED identifier, so it never carries a suffix.

use std::collections::{HashMap, HashSet};

use fwgen_catalog::BoardDefinition;
use fwgen_core::{PinLocation, Port};
use serde::Serialize;

use crate::button;
use crate::error::{PinError, Result};
use crate::identifier::{canonical_identifier, first_unused};
use crate::request::{Level, PinMode, PinRequest, Pull, ValidRequest};

/// A validated, uniquely named, conflict-free pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPin {
    /// Display name.
    pub name: String,
    /// C identifier, unique within the map.
    pub identifier: String,
    pub port: Port,
    pub pin: u8,
    pub mode: PinMode,
    pub pull: Pull,
    pub initial: Level,
    pub active_high: bool,
    pub is_led: bool,
    pub reserved: bool,
    pub reserved_reason: Option<String>,
    /// Reserved non-LED pins are documented but never configured.
    pub skip_init: bool,
}

impl ResolvedPin {
    pub fn location(&self) -> PinLocation {
        PinLocation::new(self.port, self.pin)
    }
}

/// The ordered result of resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinMap {
    pins: Vec<ResolvedPin>,
    led_index: usize,
}

impl PinMap {
    pub fn pins(&self) -> &[ResolvedPin] {
        &self.pins
    }

    /// The single LED pin.
    pub fn led(&self) -> &ResolvedPin {
        &self.pins[self.led_index]
    }

    /// Identifier of the first pin recognized as a user button.
    pub fn button_identifier(&self) -> Option<&str> {
        button::button_identifier(&self.pins)
    }

    /// Pins that generated code configures at start-up.
    pub fn initialized(&self) -> impl Iterator<Item = &ResolvedPin> {
        self.pins.iter().filter(|p| !p.skip_init)
    }

    pub fn get(&self, location: PinLocation) -> Option<&ResolvedPin> {
        self.pins.iter().find(|p| p.location() == location)
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}

/// The LED display name: the caller's alias, else the board's LED name, else `LED`.
pub fn effective_led_alias(board: &BoardDefinition, led_alias: Option<&str>) -> String {
    [led_alias.unwrap_or(""), board.led.name.as_str()]
        .into_iter()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or("LED")
        .to_string()
}

/// A pin with everything but its final identifier.
struct Tentative {
    name: String,
    location: PinLocation,
    mode: PinMode,
    pull: Pull,
    initial: Level,
    active_high: bool,
    is_led: bool,
    reserved: bool,
    reserved_reason: Option<String>,
}

impl Tentative {
    fn from_request(board: &BoardDefinition, alias: &str, req: ValidRequest) -> Self {
        let is_led = req.location == board.led_location();
        let mut pin = Tentative {
            name: req.name,
            location: req.location,
            mode: req.mode,
            pull: req.pull,
            initial: req.initial,
            active_high: req.active_high,
            is_led,
            reserved: req.reserved,
            reserved_reason: None,
        };
        if is_led {
            pin.take_led_role(board, alias);
        }
        pin.attach_reservation(board);
        pin
    }

    fn synthesized_led(board: &BoardDefinition, alias: &str) -> Self {
        let mut pin = Tentative {
            name: alias.to_string(),
            location: board.led_location(),
            mode: PinMode::Output,
            pull: Pull::None,
            initial: Level::Low,
            active_high: board.led.active_high,
            is_led: true,
            reserved: false,
            reserved_reason: None,
        };
        pin.attach_reservation(board);
        pin
    }

    /// The LED role overrides whatever the request declared.
    fn take_led_role(&mut self, board: &BoardDefinition, alias: &str) {
        if canonical_identifier(&self.name) != canonical_identifier(alias) {
            tracing::debug!(from = %self.name, to = %alias, "renaming LED pin to alias");
            self.name = alias.to_string();
        }
        self.mode = PinMode::Output;
        self.pull = Pull::None;
        self.initial = Level::Low;
        self.active_high = board.led.active_high;
    }

    fn attach_reservation(&mut self, board: &BoardDefinition) {
        if let Some(entry) = board.reservation(self.location) {
            self.reserved = true;
            let reason = entry.reason.trim();
            if !reason.is_empty() {
                self.reserved_reason = Some(reason.to_string());
            }
        }
    }

    fn finish(self, identifier: String) -> ResolvedPin {
        let skip_init = self.reserved && !self.is_led;
        ResolvedPin {
            name: self.name,
            identifier,
            port: self.location.port,
            pin: self.location.pin,
            mode: self.mode,
            pull: self.pull,
            initial: self.initial,
            active_high: self.active_high,
            is_led: self.is_led,
            reserved: self.reserved,
            reserved_reason: self.reserved_reason,
            skip_init,
        }
    }
}

fn validate_all(requests: &[PinRequest]) -> Result<Vec<ValidRequest>> {
    let mut valid = Vec::with_capacity(requests.len());
    let mut seen: HashMap<PinLocation, (usize, String)> = HashMap::new();
    for (index, request) in requests.iter().enumerate() {
        let req = request.validate(index)?;
        if let Some((first_index, first_name)) = seen.get(&req.location) {
            return Err(PinError::DuplicateLocation {
                location: req.location,
                first_index: *first_index,
                first_name: first_name.clone(),
                second_index: index,
                second_name: req.name,
            });
        }
        seen.insert(req.location, (index, req.name.clone()));
        valid.push(req);
    }
    Ok(valid)
}

fn assign_identifiers(pins: Vec<Tentative>, led_index: usize) -> Vec<ResolvedPin> {
    let mut identifiers: Vec<Option<String>> = vec![None; pins.len()];
    let mut taken: HashSet<String> = HashSet::new();

    let led_id = canonical_identifier(&pins[led_index].name);
    taken.insert(led_id.clone());
    identifiers[led_index] = Some(led_id);

    for (i, pin) in pins.iter().enumerate() {
        if i == led_index {
            continue;
        }
        let base = canonical_identifier(&pin.name);
        let id = first_unused(&base, &taken);
        if id != base {
            tracing::debug!(name = %pin.name, %base, assigned = %id, "identifier collision");
        }
        taken.insert(id.clone());
        identifiers[i] = Some(id);
    }

    pins.into_iter()
        .zip(identifiers)
        .map(|(pin, id)| pin.finish(id.unwrap_or_default()))
        .collect()
}

/// Resolve `requests` against `board`.
///
/// `led_alias` names the LED; see [`effective_led_alias`]. Order is preserved,
/// with a synthesized LED appended when no request sits on the LED location.
pub fn resolve(board: &BoardDefinition, requests: &[PinRequest], led_alias: Option<&str>) -> Result<PinMap> {
    let alias = effective_led_alias(board, led_alias);
    let valid = validate_all(requests)?;

    let mut pins: Vec<Tentative> = valid
        .into_iter()
        .map(|req| Tentative::from_request(board, &alias, req))
        .collect();
    let led_index = match pins.iter().position(|p| p.is_led) {
        Some(index) => index,
        None => {
            pins.push(Tentative::synthesized_led(board, &alias));
            pins.len() - 1
        }
    };

    let pins = assign_identifiers(pins, led_index);
    for pin in &pins {
        tracing::debug!(
            identifier = %pin.identifier,
            location = %pin.location(),
            mode = %pin.mode,
            led = pin.is_led,
            reserved = pin.reserved,
            "resolved pin"
        );
    }
    tracing::info!(count = pins.len(), led = %pins[led_index].identifier, "pin map resolved");
    Ok(PinMap { pins, led_index })
}
