//! Project generation for the fwgen firmware scaffolder.
//!
//! Turns a board, its pack and a list of pin requests into a complete
//! firmware project directory through a fixed pipeline:
//! pin resolution -> context build -> render -> copy -> manifest.
//!
//! Rendering sits behind [`TemplateRenderer`] so tests can substitute a fake;
//! [`MiniJinjaRenderer`] is the production implementation.

pub mod context;
pub mod digest;
pub mod error;
pub mod generator;
pub mod manifest;
pub mod probe;
pub mod render;
pub mod report;

pub use context::{build_context, GenerationContext, LedContext, PinContext, ProbeContext, SerialContext};
pub use digest::FileDigest;
pub use error::{GenerateError, Result};
pub use generator::{
    generate, generate_with, GenerateOptions, GenerationOutput, ELF_PATH, FIRMWARE_NAME, STARTUP_FILE,
    TOOLCHAIN_FILE,
};
pub use manifest::{GenerationManifest, ManifestPin, MANIFEST_FILE, TOOLCHAIN};
pub use probe::{normalize_transport, ProbeSettings, TARGET_CFG_PATH};
pub use render::{MiniJinjaRenderer, TemplateRenderer};
pub use report::GenerationReport;
