//! `fwgen boards` and `fwgen board <id>`: board listing and description.

use std::fmt::Write as _;

use anyhow::{bail, Context, Result};
use fwgen_catalog::{BoardDefinition, PackDefinition, Registry};
use fwgen_generate::ProbeSettings;

/// List every board in the catalog.
pub fn list(registry: &Registry) {
    print!("{}", board_table(registry));
}

pub(crate) fn board_table(registry: &Registry) -> String {
    let mut out = String::new();
    if registry.boards.is_empty() {
        let _ = writeln!(out, "No boards in {}", registry.boards.dir().display());
        return out;
    }
    let _ = writeln!(out, "Boards:");
    let _ = writeln!(out);
    for board in registry.boards.list() {
        let _ = writeln!(
            out,
            "  {:<20} {:<18} {:<16} pack {}",
            board.id, board.name, board.mcu, board.pack
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Use 'fwgen board <id>' for details.");
    out
}

/// Describe one board: human-readable, or the record as TOML or JSON.
pub fn show(registry: &Registry, id: &str, format: Option<&str>) -> Result<()> {
    let board = registry.board(id)?;
    let text = match format {
        None => {
            let pack = registry
                .pack(&board.pack)
                .with_context(|| format!("board '{id}' references a missing pack"))?;
            describe(board, pack)
        }
        Some("toml") => toml::to_string_pretty(board).context("serializing board as TOML")?,
        Some("json") => {
            let mut json = serde_json::to_string_pretty(board).context("serializing board as JSON")?;
            json.push('\n');
            json
        }
        Some(other) => bail!("unknown format '{other}' (expected toml or json)"),
    };
    print!("{text}");
    Ok(())
}

pub(crate) fn describe(board: &BoardDefinition, pack: &PackDefinition) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Board: {} ===", board.name);
    let _ = writeln!(out, "Id:   {}", board.id);
    let _ = writeln!(out, "MCU:  {}", board.mcu);
    let _ = writeln!(out, "Pack: {} ({}, {})", pack.id, pack.name, pack.cpu);
    let _ = writeln!(out);

    let _ = writeln!(out, "--- Memory ---");
    let flash = board.memory.flash;
    let ram = board.memory.ram;
    let _ = writeln!(out, "  Flash: 0x{:08X}, {} KiB", flash.origin, flash.length / 1024);
    let _ = writeln!(out, "  RAM:   0x{:08X}, {} KiB", ram.origin, ram.length / 1024);
    let _ = writeln!(out);

    let _ = writeln!(out, "--- LED ---");
    let polarity = if board.led.active_high { "active high" } else { "active low" };
    let _ = writeln!(out, "  {} on {} ({polarity})", board.led.name, board.led_location());
    let _ = writeln!(out);

    if let Some(serial) = &board.serial {
        let _ = writeln!(out, "--- Serial ---");
        let _ = writeln!(
            out,
            "  {} at {} baud, TX P{}{} AF{}, RX P{}{} AF{}",
            serial.usart,
            serial.baud,
            serial.tx.port,
            serial.tx.pin,
            serial.tx.af,
            serial.rx.port,
            serial.rx.pin,
            serial.rx.af
        );
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "--- Reserved Pins ---");
    if board.reserved_pins.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for reserved in &board.reserved_pins {
        if reserved.reason.is_empty() {
            let _ = writeln!(out, "  {}", reserved.location());
        } else {
            let _ = writeln!(out, "  {:<5} {}", reserved.location().to_string(), reserved.reason);
        }
    }
    let _ = writeln!(out);

    let probe = ProbeSettings::resolve(board, pack, None);
    let _ = writeln!(out, "--- Debug Probe ---");
    let _ = writeln!(out, "  Interface: {}", probe.interface_cfg);
    let _ = writeln!(out, "  Target:    {}", pack.debug_probe.target_cfg);
    let _ = writeln!(out, "  Transport: {}", probe.transport.as_deref().unwrap_or("(adapter default)"));
    let _ = writeln!(out, "  Speed:     {} kHz", probe.speed_khz);
    out
}
