//! End-to-end generation with the shipped stm32f0 pack and real templates.

use std::path::{Path, PathBuf};

use fwgen_catalog::Registry;
use fwgen_generate::{generate, GenerateOptions, GenerationManifest};
use fwgen_pins::PinRequest;

fn registry() -> Registry {
    Registry::load(&Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")).unwrap()
}

fn generate_into(out: &Path, requests: &[PinRequest], alias: Option<&str>) -> fwgen_generate::GenerationOutput {
    let registry = registry();
    let (board, pack) = registry.board_and_pack("nucleo_f091rc").unwrap();
    let options = GenerateOptions {
        led_alias: alias.map(str::to_string),
        ..GenerateOptions::new(out)
    };
    generate(board, pack, requests, &options).unwrap()
}

fn read(dir: &Path, file: &str) -> String {
    std::fs::read_to_string(dir.join(file)).unwrap()
}

#[test]
fn button_and_led_project() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("blinky");
    let requests = vec![PinRequest::new("BTN1", "C", 13).with_mode("input").with_pull("up")];
    let output = generate_into(&out, &requests, Some("LD2"));

    let family = read(&out, "family_gpio.h");
    assert!(family.contains("#define LED_PIN 5U"));
    assert!(family.contains("#define GPIO_BASE 0x48000000U"));

    let pins_h = read(&out, "app_pins.h");
    assert!(pins_h.contains("#define APP_PIN_BTN1 HAL_PIN(2U, 13U)"));
    assert!(pins_h.contains("#define APP_PIN_LD2 HAL_PIN(0U, 5U)"));
    assert!(pins_h.contains("#define APP_PIN_LED APP_PIN_LD2"));

    let pins_c = read(&out, "app_pins.c");
    assert!(pins_c.contains("hal_gpio_configure(APP_PIN_BTN1, HAL_GPIO_INPUT, HAL_GPIO_PULL_UP);"));
    assert!(pins_c.contains("hal_gpio_configure(APP_PIN_LD2, HAL_GPIO_OUTPUT, HAL_GPIO_PULL_NONE);"));

    assert!(read(&out, "main.c").contains("hal_gpio_toggle(APP_PIN_LD2);"));

    let makefile = read(&out, "Makefile");
    assert!(makefile.contains("CC := arm-none-eabi-gcc"));
    assert!(makefile.contains("\nflash: $(TARGET)\n\topenocd -f interface/stlink.cfg -f openocd/target.cfg"));

    let linker = read(&out, "linker.ld");
    assert!(linker.contains("FLASH (rx)  : ORIGIN = 0x08000000, LENGTH = 0x40000"));
    assert!(linker.contains("RAM   (rwx) : ORIGIN = 0x20000000, LENGTH = 0x8000"));

    assert!(read(&out, "CMakeLists.txt").contains("project(blinky C ASM)"));
    assert!(read(&out, "startup_gcc.s").contains("Reset_Handler:"));
    assert!(read(&out, "openocd/target.cfg").contains("target/stm32f0x.cfg"));

    let manifest = GenerationManifest::load_from(&out).unwrap().unwrap();
    assert_eq!(manifest, output.manifest);
    let ids: Vec<_> = manifest.pins.iter().map(|p| p.identifier.as_str()).collect();
    assert_eq!(ids, vec!["APP_PIN_BTN1", "APP_PIN_LD2"]);
}

#[test]
fn button_alias_drives_main_loop() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("button");
    let requests = vec![PinRequest::new("B1", "C", 13)];
    generate_into(&out, &requests, None);
    assert!(read(&out, "main.c").contains("if (hal_gpio_read(APP_PIN_B1) == 0) {"));
    assert!(read(&out, "app_pins.h").contains("#define APP_PIN_BUTTON APP_PIN_B1"));
}

#[test]
fn pin_named_button_defines_the_macro_once() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("named_button");
    generate_into(&out, &[PinRequest::new("Button", "C", 13)], None);
    let pins_h = read(&out, "app_pins.h");
    assert_eq!(pins_h.matches("#define APP_PIN_BUTTON ").count(), 1);
    assert!(pins_h.contains("#define APP_PIN_BUTTON HAL_PIN(2U, 13U)"));
    assert!(read(&out, "main.c").contains("if (hal_gpio_read(APP_PIN_BUTTON) == 0) {"));
}

#[test]
fn reserved_button_is_not_polled() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("reserved_button");
    generate_into(&out, &[PinRequest::new("SW1", "A", 13)], None);
    assert!(read(&out, "app_pins.h").contains("#define APP_PIN_BUTTON APP_PIN_SW1"));
    let main_c = read(&out, "main.c");
    assert!(!main_c.contains("hal_gpio_read"));
    assert!(main_c.contains("hal_gpio_toggle(APP_PIN_LD2);"));
}

#[test]
fn led_named_led_needs_no_alias_macro() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("plain");
    generate_into(&out, &[], Some("LED"));
    let pins_h = read(&out, "app_pins.h");
    assert_eq!(pins_h.matches("#define APP_PIN_LED ").count(), 1);
}

#[test]
fn reserved_pins_documented_not_initialized() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("reserved");
    let requests = vec![PinRequest::new("SWDIO", "A", 13), PinRequest::new("Relay", "B", 0).with_mode("output")];
    let output = generate_into(&out, &requests, None);

    assert!(output.manifest.pins[0].skip_initialization);
    assert!(read(&out, "app_pins.h").contains("#define APP_PIN_SWDIO"));
    let pins_c = read(&out, "app_pins.c");
    assert!(!pins_c.contains("APP_PIN_SWDIO"));
    assert!(pins_c.contains("PA13 is reserved (SWDIO) and left unconfigured."));
    assert!(pins_c.contains("hal_gpio_write(APP_PIN_RELAY, 0);"));
}

#[test]
fn regeneration_changes_only_timestamp() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("twice");
    let requests = vec![PinRequest::new("Sensor", "B", 3), PinRequest::new("sensor", "B", 4)];
    let first = generate_into(&out, &requests, Some("LD2"));
    let snapshot: Vec<(PathBuf, String)> = first
        .manifest
        .files
        .keys()
        .map(|rel| (out.join(rel), read(&out, rel)))
        .collect();

    let second = generate_into(&out, &requests, Some("LD2"));
    for (path, before) in snapshot {
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before, "{}", path.display());
    }
    let (mut a, mut b) = (first.manifest, second.manifest);
    a.generated_at.clear();
    b.generated_at.clear();
    assert_eq!(a, b);
    let ids: Vec<_> = b.pins.iter().map(|p| p.identifier.as_str()).collect();
    assert_eq!(ids, vec!["APP_PIN_SENSOR", "APP_PIN_SENSOR_2", "APP_PIN_LD2"]);
}
