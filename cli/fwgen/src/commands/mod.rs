//! CLI command implementations.

pub mod boards;
pub mod build;
pub mod clean;
pub mod doctor;
pub mod flash;
pub mod generate;
pub mod init;
pub mod packs;
pub mod pins;
