//! `fwgen pins`: resolve pin requests without generating anything.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use fwgen_catalog::{BoardDefinition, Registry};
use fwgen_pins::{populate_all, resolve, PinMap, PinRequest, ResolvedPin};

/// The requests to resolve: as given, or expanded to every board pin.
pub(crate) fn requests_for(
    board: &BoardDefinition,
    requests: &[PinRequest],
    led_alias: Option<&str>,
    all: bool,
) -> Vec<PinRequest> {
    if all {
        populate_all(board, led_alias, requests)
    } else {
        requests.to_vec()
    }
}

pub fn run(
    registry: &Registry,
    board_id: &str,
    requests: &[PinRequest],
    led_alias: Option<&str>,
    all: bool,
    json: bool,
) -> Result<()> {
    let board = registry.board(board_id)?;
    let requests = requests_for(board, requests, led_alias, all);
    let map = resolve(board, &requests, led_alias)?;
    if json {
        let text = serde_json::to_string_pretty(map.pins()).context("serializing resolved pins")?;
        println!("{text}");
    } else {
        print!("{}", pin_table(&map));
    }
    Ok(())
}

fn notes(pin: &ResolvedPin) -> String {
    let mut notes = Vec::new();
    if pin.is_led {
        notes.push("LED".to_string());
    }
    if pin.reserved {
        match &pin.reserved_reason {
            Some(reason) => notes.push(format!("reserved: {reason}")),
            None => notes.push("reserved".to_string()),
        }
    }
    if pin.skip_init {
        notes.push("not initialized".to_string());
    }
    notes.join(", ")
}

pub(crate) fn pin_table(map: &PinMap) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<24} {:<5} {:<6} {:<5} {:<5} {:<4} notes",
        "identifier", "pin", "mode", "pull", "init", "act"
    );
    for pin in map.pins() {
        let active = if pin.active_high { "high" } else { "low" };
        let _ = writeln!(
            out,
            "  {:<24} {:<5} {:<6} {:<5} {:<5} {:<4} {}",
            pin.identifier,
            pin.location().to_string(),
            pin.mode.as_str(),
            pin.pull.as_str(),
            pin.initial.as_str(),
            active,
            notes(pin)
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "LED: {} ({})", map.led().identifier, map.led().name);
    match map.button_identifier() {
        Some(button) => {
            let _ = writeln!(out, "Button: {button}");
        }
        None => {
            let _ = writeln!(out, "Button: none");
        }
    }
    out
}
