//! Full pin maps: one request for every GPIO pin a board exposes.

use std::collections::{HashMap, HashSet};

use fwgen_catalog::BoardDefinition;
use fwgen_core::{PinLocation, Port};

use crate::request::{Level, PinMode, PinRequest, Pull};
use crate::resolve::effective_led_alias;

fn request_location(request: &PinRequest) -> Option<PinLocation> {
    let port: Port = request.port.parse().ok()?;
    let pin = u8::try_from(request.pin).ok()?;
    Some(PinLocation::new(port, pin))
}

/// A request for every pin `0..16` of every port on `board`, named `P<port><pin>`.
///
/// The LED location is named by the LED alias and carries the LED defaults;
/// board-reserved locations are flagged reserved. Each entry of
/// `explicit` replaces the generated request at its location. Explicit
/// requests that match no generated location, or repeat an already
/// replaced one, are appended so resolution can report them.
pub fn populate_all(board: &BoardDefinition, led_alias: Option<&str>, explicit: &[PinRequest]) -> Vec<PinRequest> {
    let alias = effective_led_alias(board, led_alias);
    let led = board.led_location();

    let mut ports = board.gpio_ports();
    if !ports.contains(&led.port) {
        ports.push(led.port);
        ports.sort();
    }

    let mut requests: Vec<PinRequest> = PinLocation::all_on(&ports)
        .map(|location| {
            let port = location.port.to_string();
            if location == led {
                PinRequest::new(alias.clone(), port, i64::from(location.pin))
                    .with_mode(PinMode::Output.as_str())
                    .with_pull(Pull::None.as_str())
                    .with_initial(Level::Low.as_str())
                    .with_active_high(board.led.active_high)
            } else {
                PinRequest::new(location.to_string(), port, i64::from(location.pin))
                    .with_reserved(board.is_reserved(location))
            }
        })
        .collect();

    let slots: HashMap<PinLocation, usize> = requests
        .iter()
        .enumerate()
        .filter_map(|(i, r)| request_location(r).map(|loc| (loc, i)))
        .collect();
    let mut replaced = HashSet::new();
    let mut extra = Vec::new();
    for request in explicit {
        match request_location(request).and_then(|loc| slots.get(&loc).map(|i| (loc, *i))) {
            Some((loc, slot)) if replaced.insert(loc) => {
                let mut request = request.clone();
                request.reserved |= board.is_reserved(loc);
                requests[slot] = request;
            }
            _ => extra.push(request.clone()),
        }
    }
    requests.extend(extra);
    tracing::debug!(board = %board.id, count = requests.len(), "populated full pin map");
    requests
}
