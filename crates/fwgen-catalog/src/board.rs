//! Board description model.
//!
//! A board record pins down everything generation needs to know about one
//! physical board: which pack builds it, its memory map, where the user LED
//! sits, which pins must not be touched and how the debug probe is wired.

use std::path::PathBuf;

use fwgen_core::numeric;
use fwgen_core::{PinLocation, Port, PORT_PIN_COUNT};
use serde::{Deserialize, Serialize};

/// A contiguous memory region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRegion {
    #[serde(deserialize_with = "numeric::deserialize")]
    pub origin: u64,
    #[serde(deserialize_with = "numeric::deserialize")]
    pub length: u64,
}

/// Flash and RAM regions used by the linker script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryMap {
    pub flash: MemoryRegion,
    pub ram: MemoryRegion,
}

/// The board's user LED.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedDefinition {
    #[serde(default = "default_led_name")]
    pub name: String,
    pub port: Port,
    #[serde(deserialize_with = "numeric::deserialize")]
    pub pin: u8,
    #[serde(default = "default_true")]
    pub active_high: bool,
}

impl LedDefinition {
    pub fn location(&self) -> PinLocation {
        PinLocation::new(self.port, self.pin)
    }
}

/// A pin the board wires to something that must not be reconfigured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedPin {
    pub port: Port,
    #[serde(deserialize_with = "numeric::deserialize")]
    pub pin: u8,
    #[serde(default)]
    pub reason: String,
}

impl ReservedPin {
    pub fn location(&self) -> PinLocation {
        PinLocation::new(self.port, self.pin)
    }
}

/// One side of the board's console UART.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialPin {
    pub port: Port,
    #[serde(deserialize_with = "numeric::deserialize")]
    pub pin: u8,
    /// Alternate function number routing the pin to the USART.
    #[serde(deserialize_with = "numeric::deserialize")]
    pub af: u8,
}

/// Console UART wiring (typically the probe's virtual COM port).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialDefinition {
    pub usart: String,
    #[serde(default = "default_baud", deserialize_with = "numeric::deserialize")]
    pub baud: u32,
    pub tx: SerialPin,
    pub rx: SerialPin,
}

/// How the debug probe attaches to this board.
///
/// `transport` and `speed_khz` are optional; when absent the pack defaults apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugProbeConfig {
    /// Probe interface description, e.g. `interface/stlink.cfg`.
    pub interface_cfg: String,
    #[serde(default)]
    pub transport: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_speed")]
    pub speed_khz: Option<u32>,
    /// Directives emitted before transport selection, e.g. `reset_config srst_only`.
    #[serde(default)]
    pub reset_config: Vec<String>,
}

/// A physical board description. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDefinition {
    pub id: String,
    /// Display name. Defaults to the id.
    #[serde(default)]
    pub name: String,
    /// Id of the pack that builds this board.
    pub pack: String,
    #[serde(default)]
    pub mcu: String,
    pub memory: MemoryMap,
    pub led: LedDefinition,
    #[serde(default)]
    pub serial: Option<SerialDefinition>,
    #[serde(default)]
    pub reserved_pins: Vec<ReservedPin>,
    #[serde(alias = "openocd")]
    pub debug_probe: DebugProbeConfig,
    /// GPIO ports bonded out on this package. All of `A`..`H` when absent.
    #[serde(default)]
    pub gpio_ports: Option<Vec<Port>>,
    /// Directory the record was loaded from.
    #[serde(skip)]
    pub root: PathBuf,
    /// The record file itself.
    #[serde(skip)]
    pub source: PathBuf,
}

impl BoardDefinition {
    pub fn led_location(&self) -> PinLocation {
        self.led.location()
    }

    /// The reservation entry covering `location`, if any.
    pub fn reservation(&self, location: PinLocation) -> Option<&ReservedPin> {
        self.reserved_pins.iter().find(|r| r.location() == location)
    }

    pub fn is_reserved(&self, location: PinLocation) -> bool {
        self.reservation(location).is_some()
    }

    /// Ports available on this board, in letter order.
    pub fn gpio_ports(&self) -> Vec<Port> {
        let mut ports = match &self.gpio_ports {
            Some(ports) if !ports.is_empty() => ports.clone(),
            _ => Port::ALL.to_vec(),
        };
        ports.sort();
        ports.dedup();
        ports
    }

    /// Fill defaults that depend on other fields and normalize text.
    pub(crate) fn normalize(&mut self) {
        if self.name.trim().is_empty() {
            self.name = self.id.clone();
        }
        if self.led.name.trim().is_empty() {
            self.led.name = default_led_name();
        }
        if let Some(serial) = &mut self.serial {
            serial.usart = serial.usart.trim().to_uppercase();
        }
    }

    /// Structural checks that serde cannot express.
    pub(crate) fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.id.trim().is_empty() {
            problems.push("board id is empty".to_string());
        }
        if self.pack.trim().is_empty() {
            problems.push("pack reference is empty".to_string());
        }
        if self.memory.flash.length == 0 {
            problems.push("flash length is zero".to_string());
        }
        if self.memory.ram.length == 0 {
            problems.push("ram length is zero".to_string());
        }
        if self.led.pin >= PORT_PIN_COUNT {
            problems.push(format!("LED pin {} is out of range 0-15", self.led.pin));
        }
        for reserved in &self.reserved_pins {
            if reserved.pin >= PORT_PIN_COUNT {
                problems.push(format!(
                    "reserved pin P{}{} is out of range 0-15",
                    reserved.port, reserved.pin
                ));
            }
        }
        if let Some(serial) = &self.serial {
            for (side, pin) in [("tx", &serial.tx), ("rx", &serial.rx)] {
                if pin.pin >= PORT_PIN_COUNT {
                    problems.push(format!("serial {side} pin {} is out of range 0-15", pin.pin));
                }
            }
        }
        if self.debug_probe.interface_cfg.trim().is_empty() {
            problems.push("debug probe interface_cfg is empty".to_string());
        }
        problems
    }
}

fn default_led_name() -> String {
    "LED".to_string()
}

fn default_true() -> bool {
    true
}

fn default_baud() -> u32 {
    115_200
}

fn deserialize_optional_speed<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    numeric::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUCLEO: &str = r#"
id = "nucleo_f091rc"
name = "NUCLEO-F091RC"
pack = "stm32f0"
mcu = "STM32F091RCTx"
gpio_ports = ["a", "B", "C", "D", "F"]

[memory.flash]
origin = "0x08000000"
length = "0x40000"

[memory.ram]
origin = "0x20000000"
length = 32768

[led]
name = "LD2"
port = "A"
pin = 5

[serial]
usart = "usart2"
tx = { port = "A", pin = 2, af = 1 }
rx = { port = "A", pin = 3, af = 1 }

[[reserved_pins]]
port = "A"
pin = 13
reason = "SWDIO"

[[reserved_pins]]
port = "A"
pin = 14

[debug_probe]
interface_cfg = "interface/stlink.cfg"
transport = "hla_swd"
"#;

    fn nucleo() -> BoardDefinition {
        let mut board: BoardDefinition = toml::from_str(NUCLEO).unwrap();
        board.normalize();
        board
    }

    #[test]
    fn parse_full_board() {
        let board = nucleo();
        assert_eq!(board.id, "nucleo_f091rc");
        assert_eq!(board.memory.flash.origin, 0x0800_0000);
        assert_eq!(board.memory.flash.length, 0x40000);
        assert_eq!(board.memory.ram.length, 0x8000);
        assert_eq!(board.led_location(), PinLocation::new(Port::A, 5));
        assert!(board.led.active_high);
        let serial = board.serial.as_ref().unwrap();
        assert_eq!(serial.usart, "USART2");
        assert_eq!(serial.baud, 115_200);
        assert_eq!(board.debug_probe.transport.as_deref(), Some("hla_swd"));
        assert_eq!(board.debug_probe.speed_khz, None);
        assert!(board.problems().is_empty());
    }

    #[test]
    fn reservation_lookup() {
        let board = nucleo();
        let swdio = board.reservation(PinLocation::new(Port::A, 13)).unwrap();
        assert_eq!(swdio.reason, "SWDIO");
        let swclk = board.reservation(PinLocation::new(Port::A, 14)).unwrap();
        assert_eq!(swclk.reason, "");
        assert!(!board.is_reserved(PinLocation::new(Port::C, 13)));
    }

    #[test]
    fn gpio_ports_sorted_and_defaulted() {
        let mut board = nucleo();
        assert_eq!(
            board.gpio_ports(),
            vec![Port::A, Port::B, Port::C, Port::D, Port::F]
        );
        board.gpio_ports = None;
        assert_eq!(board.gpio_ports().len(), 8);
    }

    #[test]
    fn name_defaults_to_id() {
        let text = NUCLEO.replace("name = \"NUCLEO-F091RC\"\n", "");
        let mut board: BoardDefinition = toml::from_str(&text).unwrap();
        board.normalize();
        assert_eq!(board.name, "nucleo_f091rc");
    }

    #[test]
    fn out_of_range_led_is_a_problem() {
        let mut board = nucleo();
        board.led.pin = 16;
        let problems = board.problems();
        assert!(problems.iter().any(|p| p.contains("LED pin 16")));
    }

    #[test]
    fn openocd_key_is_accepted() {
        let text = NUCLEO.replace("[debug_probe]", "[openocd]");
        let board: BoardDefinition = toml::from_str(&text).unwrap();
        assert_eq!(board.debug_probe.interface_cfg, "interface/stlink.cfg");
    }

    #[test]
    fn explicit_speed_parsed() {
        let text = NUCLEO.replace(
            "transport = \"hla_swd\"",
            "transport = \"hla_swd\"\nspeed_khz = \"1800\"",
        );
        let board: BoardDefinition = toml::from_str(&text).unwrap();
        assert_eq!(board.debug_probe.speed_khz, Some(1800));
    }
}
