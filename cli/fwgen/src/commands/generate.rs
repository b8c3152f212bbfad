//! `fwgen generate`: project generation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use fwgen_catalog::Registry;
use fwgen_generate::{generate, GenerateOptions, GenerationOutput};
use fwgen_pins::PinRequest;

use crate::commands::pins::requests_for;

/// Everything `fwgen generate` needs, merged from flags and `fwgen.toml`.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub board_id: String,
    pub output_dir: PathBuf,
    pub led_alias: Option<String>,
    pub project_name: Option<String>,
    pub speed_khz: Option<u32>,
    pub all_pins: bool,
    pub pins: Vec<PinRequest>,
}

pub fn run(registry: &Registry, request: &GenerateRequest) -> Result<()> {
    let output = generate_project(registry, request)?;
    print!("{}", output.report);
    Ok(())
}

pub(crate) fn generate_project(registry: &Registry, request: &GenerateRequest) -> Result<GenerationOutput> {
    let (board, pack) = registry.board_and_pack(&request.board_id)?;
    let requests = requests_for(board, &request.pins, request.led_alias.as_deref(), request.all_pins);
    let options = GenerateOptions {
        output_dir: request.output_dir.clone(),
        led_alias: request.led_alias.clone(),
        project_name: request.project_name.clone(),
        speed_khz: request.speed_khz,
    };
    generate(board, pack, &requests, &options)
        .with_context(|| format!("generating {} into {}", board.id, request.output_dir.display()))
}
