//! Filesystem helpers for generated output.
//!
//! Text files are written to a temporary sibling and renamed over the target,
//! so a concurrent reader sees either the old or the new content. There is no
//! atomicity across several files.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Create `path` and all parents. Succeeds if it already exists.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Replace `path` with `contents` via write-to-temporary-then-rename.
pub fn atomic_write(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".fwgen-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    set_output_permissions(tmp.path(), path)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// Temporary files are created owner-only; generated sources should keep the
// permissions of the file they replace, or be world-readable when new.
#[cfg(unix)]
fn set_output_permissions(tmp: &Path, target: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let perms = match fs::metadata(target) {
        Ok(meta) => meta.permissions(),
        Err(_) => fs::Permissions::from_mode(0o644),
    };
    fs::set_permissions(tmp, perms)
}

#[cfg(not(unix))]
fn set_output_permissions(_tmp: &Path, _target: &Path) -> io::Result<()> {
    Ok(())
}
