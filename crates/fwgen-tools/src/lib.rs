//! External tools driven by fwgen: the cross toolchain, build systems and
//! the OpenOCD debug probe.
//!
//! Every invocation is assembled as a [`CommandSpec`] and executed through
//! the [`ProcessRunner`] trait, so pipelines can be tested with a fake runner.

pub mod builder;
pub mod error;
pub mod flasher;
pub mod process;
pub mod toolchain;

pub use builder::{elf_path, BuildConfig, BuildSystem, Builder};
pub use error::{Result, ToolError};
pub use flasher::Flasher;
pub use process::{CommandSpec, ProcessRunner, SystemRunner};
pub use toolchain::{detect, ToolSpec, ToolStatus, ToolchainStatus, KNOWN_TOOLS};
