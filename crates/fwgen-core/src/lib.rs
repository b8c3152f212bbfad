//! Shared vocabulary for the fwgen firmware scaffolder.
//!
//! Every other crate in the workspace builds on these types:
//! - [`gpio`]: GPIO ports and physical pin locations
//! - [`numeric`]: decimal / `0x`-hex numeric fields in description records
//! - [`diagnose`]: error taxonomy with human-readable corrective actions
//! - [`fsutil`]: idempotent directory creation and atomic file writes

pub mod diagnose;
pub mod fsutil;
pub mod gpio;
pub mod numeric;

pub use diagnose::{Diagnose, ErrorDetail, ErrorKind};
pub use gpio::{PinLocation, Port, PORT_PIN_COUNT};
