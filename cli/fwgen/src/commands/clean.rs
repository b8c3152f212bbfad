//! `fwgen clean`: remove build outputs.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Directories of a generated project that only hold build outputs.
const OUTPUT_DIRS: [&str; 2] = ["build", "out"];

/// Empty the build output directories of a generated project.
///
/// The directories themselves stay, since generated build files expect them.
pub fn run(project_dir: &Path) -> Result<()> {
    for name in OUTPUT_DIRS {
        let dir = project_dir.join(name);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => {
                println!("Already clean: {} does not exist", dir.display());
                continue;
            }
        };
        let mut removed = 0usize;
        for entry in entries {
            let path = entry.with_context(|| format!("reading {}", dir.display()))?.path();
            let result = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            result.with_context(|| format!("removing {}", path.display()))?;
            removed += 1;
        }
        if removed == 0 {
            println!("Already clean: {}", dir.display());
        } else {
            println!("Removed {removed} entries from {}", dir.display());
        }
    }
    Ok(())
}
