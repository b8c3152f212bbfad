//! The flat value tree handed to every template.
//!
//! Building the context is pure: nothing here touches the filesystem.
//! Numeric facts that templates print in a fixed format (memory addresses)
//! are pre-formatted so templates need no formatting filters.

use fwgen_catalog::{BoardDefinition, PackDefinition};
use fwgen_pins::{Level, PinMap, PinMode, Pull, ResolvedPin};
use serde::Serialize;

use crate::probe::ProbeSettings;

/// Cross-compiler prefix used by every generated build file.
pub const TOOLCHAIN_PREFIX: &str = "arm-none-eabi-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedContext {
    pub name: String,
    pub identifier: String,
    pub port: String,
    /// Zero-based port index (A = 0), for register address arithmetic.
    pub port_index: usize,
    pub pin: u8,
    pub active_high: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinContext {
    pub name: String,
    pub identifier: String,
    pub port: String,
    pub port_index: usize,
    pub pin: u8,
    pub mode: PinMode,
    pub pull: Pull,
    pub initial: Level,
    pub active_high: bool,
    pub is_led: bool,
    pub reserved: bool,
    pub reserved_reason: Option<String>,
    pub skip_init: bool,
}

impl From<&ResolvedPin> for PinContext {
    fn from(pin: &ResolvedPin) -> Self {
        Self {
            name: pin.name.clone(),
            identifier: pin.identifier.clone(),
            port: pin.port.to_string(),
            port_index: pin.port.index(),
            pin: pin.pin,
            mode: pin.mode,
            pull: pin.pull,
            initial: pin.initial,
            active_high: pin.active_high,
            is_led: pin.is_led,
            reserved: pin.reserved,
            reserved_reason: pin.reserved_reason.clone(),
            skip_init: pin.skip_init,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerialPinContext {
    pub port: String,
    pub port_index: usize,
    pub pin: u8,
    pub af: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerialContext {
    pub usart: String,
    pub baud: u32,
    pub tx: SerialPinContext,
    pub rx: SerialPinContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeContext {
    pub interface_cfg: String,
    pub target_cfg: String,
    pub transport: Option<String>,
    pub speed_khz: u32,
    pub reset_config: Vec<String>,
    /// Complete OpenOCD `-c` script for the generated firmware.
    pub flash_script: String,
}

/// Everything a template may reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationContext {
    pub project_name: String,
    pub board_id: String,
    pub board_name: String,
    pub mcu: String,
    pub pack_id: String,
    pub pack_name: String,
    pub cpu: String,
    pub cmsis_strategy: String,
    pub system_clock_hz: u64,
    /// `0x` + 8 uppercase hex digits.
    pub flash_origin: String,
    /// `0x` + minimal uppercase hex digits.
    pub flash_length: String,
    pub ram_origin: String,
    pub ram_length: String,
    pub led: LedContext,
    /// Identifier of the recognized user button, if any.
    pub button_id: Option<String>,
    /// The button pin is configured at startup, so the main loop may read it.
    /// Reserved pins are left unconfigured and never polled.
    pub poll_button: bool,
    pub pins: Vec<PinContext>,
    pub serial: Option<SerialContext>,
    pub probe: ProbeContext,
    pub firmware: String,
    pub elf_path: String,
    pub toolchain_prefix: String,
}

fn origin_hex(value: u64) -> String {
    format!("0x{value:08X}")
}

fn length_hex(value: u64) -> String {
    format!("0x{value:X}")
}

/// Assemble the template context.
///
/// `firmware` names the build artifact; `elf_path` is where the build
/// leaves it, relative to the project directory.
pub fn build_context(
    project_name: &str,
    board: &BoardDefinition,
    pack: &PackDefinition,
    pins: &PinMap,
    probe: &ProbeSettings,
    firmware: &str,
    elf_path: &str,
) -> GenerationContext {
    let led = pins.led();
    let button_id = pins.button_identifier();
    let poll_button = pins
        .initialized()
        .any(|pin| Some(pin.identifier.as_str()) == button_id);
    let serial = board.serial.as_ref().map(|serial| {
        let side = |pin: &fwgen_catalog::SerialPin| SerialPinContext {
            port: pin.port.to_string(),
            port_index: pin.port.index(),
            pin: pin.pin,
            af: pin.af,
        };
        SerialContext {
            usart: serial.usart.clone(),
            baud: serial.baud,
            tx: side(&serial.tx),
            rx: side(&serial.rx),
        }
    });

    GenerationContext {
        project_name: project_name.to_string(),
        board_id: board.id.clone(),
        board_name: board.name.clone(),
        mcu: board.mcu.clone(),
        pack_id: pack.id.clone(),
        pack_name: pack.name.clone(),
        cpu: pack.cpu.clone(),
        cmsis_strategy: pack.cmsis.strategy.clone(),
        system_clock_hz: pack.system_clock_hz(),
        flash_origin: origin_hex(board.memory.flash.origin),
        flash_length: length_hex(board.memory.flash.length),
        ram_origin: origin_hex(board.memory.ram.origin),
        ram_length: length_hex(board.memory.ram.length),
        led: LedContext {
            name: led.name.clone(),
            identifier: led.identifier.clone(),
            port: led.port.to_string(),
            port_index: led.port.index(),
            pin: led.pin,
            active_high: led.active_high,
        },
        button_id: button_id.map(str::to_string),
        poll_button,
        pins: pins.pins().iter().map(PinContext::from).collect(),
        serial,
        probe: ProbeContext {
            interface_cfg: probe.interface_cfg.clone(),
            target_cfg: probe.target_cfg.clone(),
            transport: probe.transport.clone(),
            speed_khz: probe.speed_khz,
            reset_config: probe.reset_config.clone(),
            flash_script: probe.flash_script(elf_path),
        },
        firmware: firmware.to_string(),
        elf_path: elf_path.to_string(),
        toolchain_prefix: TOOLCHAIN_PREFIX.to_string(),
    }
}
