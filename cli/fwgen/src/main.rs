//! fwgen CLI: scaffold, build and flash STM32 firmware projects.

mod commands;
mod config;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, Subcommand};
use fwgen_catalog::{CatalogError, Registry};
use fwgen_core::{Diagnose, ErrorDetail};
use fwgen_generate::{GenerateError, GenerationManifest};
use fwgen_pins::PinError;
use fwgen_tools::{BuildSystem, SystemRunner, ToolError};

use config::FwgenConfig;

#[derive(Parser)]
#[command(name = "fwgen", version, about = "Embedded firmware project scaffolder")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Directory holding boards/ and packs/
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project with an fwgen.toml
    Init {
        /// Project name
        name: String,
        /// Board id to target
        #[arg(long, default_value = "nucleo_f091rc")]
        board: String,
    },
    /// List available boards
    Boards,
    /// Show details of a board
    Board {
        /// Board id
        id: String,
        /// Output format (default: human-readable, "toml" or "json")
        #[arg(long)]
        format: Option<String>,
    },
    /// List available packs
    Packs,
    /// Resolve the project's pin requests and print the result
    Pins {
        /// Board id (default: from fwgen.toml)
        #[arg(long)]
        board: Option<String>,
        /// LED display name
        #[arg(long)]
        led_alias: Option<String>,
        /// Include every pin of every board port
        #[arg(long)]
        all: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Generate the firmware project
    Generate {
        /// Board id (default: from fwgen.toml)
        #[arg(long)]
        board: Option<String>,
        /// Output directory (default: [project] output from fwgen.toml)
        #[arg(long)]
        output: Option<PathBuf>,
        /// LED display name
        #[arg(long)]
        led_alias: Option<String>,
        /// Configure every pin of every board port
        #[arg(long)]
        all_pins: bool,
        /// Adapter speed in kHz for the generated flash script
        #[arg(long)]
        speed: Option<u32>,
    },
    /// Check toolchain, catalog and project status
    Doctor,
    /// Build the generated project
    Build {
        /// Build system (cmake, make)
        #[arg(long)]
        system: Option<BuildSystem>,
        /// Generated project directory
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Flash the built firmware through OpenOCD
    Flash {
        /// Adapter speed in kHz
        #[arg(long)]
        speed: Option<u32>,
        /// Generated project directory
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Remove build outputs from the generated project
    Clean {
        /// Generated project directory
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        if let Some(detail) = diagnose(&e) {
            eprintln!("hint: {}", detail.action);
        }
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// The corrective action of the first library error in the chain.
fn diagnose(err: &anyhow::Error) -> Option<ErrorDetail> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<GenerateError>() {
            Some(e.detail())
        } else if let Some(e) = cause.downcast_ref::<PinError>() {
            Some(e.detail())
        } else if let Some(e) = cause.downcast_ref::<CatalogError>() {
            Some(e.detail())
        } else {
            cause.downcast_ref::<ToolError>().map(Diagnose::detail)
        }
    })
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let data = cli.data;

    match cli.command {
        Commands::Init { name, board } => commands::init::run(&name, &board),

        Commands::Boards => {
            let (config, project_dir) = load_config_optional(&cwd)?;
            let registry = load_registry(&cwd, data, config.as_ref().zip(project_dir.as_deref()))?;
            commands::boards::list(&registry);
            Ok(())
        }

        Commands::Board { id, format } => {
            let (config, project_dir) = load_config_optional(&cwd)?;
            let registry = load_registry(&cwd, data, config.as_ref().zip(project_dir.as_deref()))?;
            commands::boards::show(&registry, &id, format.as_deref())
        }

        Commands::Packs => {
            let (config, project_dir) = load_config_optional(&cwd)?;
            let registry = load_registry(&cwd, data, config.as_ref().zip(project_dir.as_deref()))?;
            commands::packs::list(&registry);
            Ok(())
        }

        Commands::Pins {
            board,
            led_alias,
            all,
            json,
        } => {
            let (config, project_dir) = load_config_optional(&cwd)?;
            let registry = load_registry(&cwd, data, config.as_ref().zip(project_dir.as_deref()))?;
            let board_id = board_id(board, config.as_ref())?;
            let led_alias = led_alias.or_else(|| config.as_ref().and_then(|c| c.project.led_alias.clone()));
            let requests = config.map(|c| c.pins).unwrap_or_default();
            commands::pins::run(
                &registry,
                &board_id,
                &requests,
                led_alias.as_deref(),
                all,
                json,
            )
        }

        Commands::Generate {
            board,
            output,
            led_alias,
            all_pins,
            speed,
        } => {
            let (config, project_dir) = load_config_optional(&cwd)?;
            let registry = load_registry(&cwd, data, config.as_ref().zip(project_dir.as_deref()))?;
            let board_id = board_id(board, config.as_ref())?;
            let output_dir = match (output, &config, &project_dir) {
                (Some(output), _, _) => cwd.join(output),
                (None, Some(config), Some(dir)) => config.output_dir(dir),
                _ => bail!("no output directory (pass --output or run `fwgen init` first)"),
            };
            let request = commands::generate::GenerateRequest {
                board_id,
                output_dir,
                led_alias: led_alias.or_else(|| config.as_ref().and_then(|c| c.project.led_alias.clone())),
                project_name: config.as_ref().map(|c| c.project.name.clone()),
                speed_khz: speed.or_else(|| config.as_ref().and_then(|c| c.flash.speed_khz)),
                all_pins,
                pins: config.map(|c| c.pins).unwrap_or_default(),
            };
            commands::generate::run(&registry, &request)
        }

        Commands::Doctor => {
            let (config, project_dir) = load_config_optional(&cwd)?;
            let context = config.as_ref().zip(project_dir.as_deref());
            let data_root = resolve_data_root(&cwd, data, context).ok();
            let output_dir = context.map(|(config, dir)| config.output_dir(dir));
            commands::doctor::run(
                &SystemRunner,
                context,
                data_root.as_deref(),
                output_dir.as_deref(),
            )
        }

        Commands::Build { system, dir } => {
            let (config, project_dir) = load_config_optional(&cwd)?;
            let firmware_dir = firmware_dir(&cwd, dir, config.as_ref().zip(project_dir.as_deref()))?;
            let system = system.unwrap_or_else(|| config.map(|c| c.build.system).unwrap_or_default());
            commands::build::run(&SystemRunner, &firmware_dir, system)
        }

        Commands::Flash { speed, dir } => {
            let (config, project_dir) = load_config_optional(&cwd)?;
            let context = config.as_ref().zip(project_dir.as_deref());
            let firmware_dir = firmware_dir(&cwd, dir, context)?;
            let registry = load_registry(&cwd, data, context)?;
            let speed = speed.or_else(|| config.as_ref().and_then(|c| c.flash.speed_khz));
            commands::flash::run(&SystemRunner, &registry, &firmware_dir, speed)
        }

        Commands::Clean { dir } => {
            let (config, project_dir) = load_config_optional(&cwd)?;
            let firmware_dir = firmware_dir(&cwd, dir, config.as_ref().zip(project_dir.as_deref()))?;
            commands::clean::run(&firmware_dir)
        }
    }
}

/// Try to load `fwgen.toml` from the current directory upward.
fn load_config_optional(cwd: &Path) -> anyhow::Result<(Option<FwgenConfig>, Option<PathBuf>)> {
    match FwgenConfig::find_and_load(cwd)? {
        Some((config, dir)) => Ok((Some(config), Some(dir))),
        None => Ok((None, None)),
    }
}

fn board_id(flag: Option<String>, config: Option<&FwgenConfig>) -> anyhow::Result<String> {
    match (flag, config) {
        (Some(id), _) => Ok(id),
        (None, Some(config)) => Ok(config.project.board.clone()),
        (None, None) => bail!("no board selected (pass --board or run `fwgen init` first)"),
    }
}

/// `--data`, then `[data] root`, then the nearest ancestor with `boards/` and `packs/`.
fn resolve_data_root(
    cwd: &Path,
    flag: Option<PathBuf>,
    config: Option<(&FwgenConfig, &Path)>,
) -> anyhow::Result<PathBuf> {
    if let Some(root) = flag {
        return Ok(cwd.join(root));
    }
    if let Some(root) = config.and_then(|(config, dir)| config.data_root(dir)) {
        return Ok(root);
    }
    let search_from = config.map(|(_, dir)| dir).unwrap_or(cwd);
    match config::find_data_root(search_from).or_else(|| config::find_data_root(cwd)) {
        Some(root) => Ok(root),
        None => bail!(
            "no boards/ and packs/ directories found above {} (pass --data or set [data] root in {})",
            cwd.display(),
            config::CONFIG_FILE
        ),
    }
}

fn load_registry(
    cwd: &Path,
    flag: Option<PathBuf>,
    config: Option<(&FwgenConfig, &Path)>,
) -> anyhow::Result<Registry> {
    let root = resolve_data_root(cwd, flag, config)?;
    Registry::load(&root).with_context(|| format!("loading catalog from {}", root.display()))
}

/// `--dir`, then the configured output, then the current directory if it
/// holds a generated project.
fn firmware_dir(
    cwd: &Path,
    flag: Option<PathBuf>,
    config: Option<(&FwgenConfig, &Path)>,
) -> anyhow::Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(cwd.join(dir));
    }
    if let Some((config, dir)) = config {
        return Ok(config.output_dir(dir));
    }
    if GenerationManifest::path_in(cwd).is_file() {
        return Ok(cwd.to_path_buf());
    }
    bail!(
        "no generated project found (pass --dir or run from a directory with {})",
        config::CONFIG_FILE
    )
}
