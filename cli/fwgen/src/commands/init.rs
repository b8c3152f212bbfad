//! `fwgen init`: project scaffolding.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::config::{FwgenConfig, CONFIG_FILE};

/// Create a new project directory `name` relative to the working directory.
pub fn run(name: &str, board: &str) -> Result<()> {
    let project_dir = Path::new(name);
    create_project(project_dir, name, board)
}

pub(crate) fn create_project(project_dir: &Path, name: &str, board: &str) -> Result<()> {
    if project_dir.exists() {
        bail!("directory '{}' already exists", project_dir.display());
    }

    fs::create_dir_all(project_dir)
        .with_context(|| format!("creating {}", project_dir.display()))?;

    fs::write(project_dir.join(CONFIG_FILE), FwgenConfig::template(name, board))
        .with_context(|| format!("writing {CONFIG_FILE}"))?;

    fs::write(project_dir.join(".gitignore"), "firmware/build/\nfirmware/out/\n")
        .context("writing .gitignore")?;

    println!("Created project '{name}' for board {board}");
    println!("  {name}/{CONFIG_FILE}");
    println!("  {name}/.gitignore");
    println!();
    println!("Next: cd {name} && fwgen generate");

    Ok(())
}
