//! Board and pack description records.
//!
//! A **board** describes one physical development board: memory map, user
//! LED, reserved pins and debug-probe wiring. A **pack** bundles the templates
//! and defaults for an MCU family. Both are loaded once from disk into an
//! immutable [`Registry`] that the composition root passes by reference.

pub mod board;
pub mod catalog;
pub mod error;
pub mod pack;
pub mod parse;

pub use board::{
    BoardDefinition, DebugProbeConfig, LedDefinition, MemoryMap, MemoryRegion, ReservedPin,
    SerialDefinition, SerialPin,
};
pub use catalog::{BoardCatalog, Catalog, CatalogEntry, EntryKind, PackCatalog, Registry};
pub use error::{CatalogError, Result};
pub use pack::{CmsisConfig, DebugProbeDefaults, PackDefaults, PackDefinition, PackTemplates};
