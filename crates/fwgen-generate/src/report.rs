//! Human-readable summary of a generation run.

use std::fmt;
use std::path::PathBuf;

/// What a generation run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub board: String,
    pub pack: String,
    /// Absolute project directory.
    pub output_dir: PathBuf,
    /// Project-relative paths, in write order.
    pub files_written: Vec<String>,
    /// Files that had been edited since the previous run and were overwritten.
    pub overwritten_edits: Vec<String>,
    pub pin_count: usize,
    /// Reserved pins left unconfigured.
    pub skipped_pins: Vec<String>,
    pub led_identifier: String,
    pub button_identifier: Option<String>,
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generated {} ({}) into {}", self.board, self.pack, self.output_dir.display())?;
        writeln!(f, "  Files: {}", self.files_written.len())?;
        writeln!(f, "  Pins: {} (LED {})", self.pin_count, self.led_identifier)?;
        if let Some(button) = &self.button_identifier {
            writeln!(f, "  Button: {button}")?;
        }
        if !self.skipped_pins.is_empty() {
            writeln!(f, "  Reserved, not initialized: {}", self.skipped_pins.join(", "))?;
        }
        if !self.overwritten_edits.is_empty() {
            writeln!(f, "  Overwrote hand edits in: {}", self.overwritten_edits.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_optional_sections_only_when_present() {
        let mut report = GenerationReport {
            board: "nucleo_f091rc".into(),
            pack: "stm32f0".into(),
            output_dir: "/work/blinky".into(),
            files_written: vec!["main.c".into(), "linker.ld".into()],
            overwritten_edits: vec![],
            pin_count: 2,
            skipped_pins: vec![],
            led_identifier: "APP_PIN_LD2".into(),
            button_identifier: None,
        };
        let text = report.to_string();
        assert!(text.starts_with("Generated nucleo_f091rc (stm32f0) into /work/blinky\n"));
        assert!(text.contains("Pins: 2 (LED APP_PIN_LD2)"));
        assert!(!text.contains("Button"));
        assert!(!text.contains("hand edits"));

        report.button_identifier = Some("APP_PIN_B1".into());
        report.overwritten_edits = vec!["main.c".into()];
        let text = report.to_string();
        assert!(text.contains("Button: APP_PIN_B1"));
        assert!(text.contains("Overwrote hand edits in: main.c"));
    }
}
