use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs_err as fs;

const OUTPUT_DIR_NAME: &str = "achievements";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirState {
    Created,
    Existing,
}

/// `achievements/` next to the running executable.
pub fn default_output_dir() -> Result<PathBuf> {
    let exe = env::current_exe().context("could not locate the running executable")?;

    let Some(exe_dir) = exe.parent() else {
        anyhow::bail!("executable path {} has no parent directory", exe.display());
    };

    Ok(exe_dir.join(OUTPUT_DIR_NAME))
}

/// Makes sure `path` exists as a directory, creating it and any missing
/// parents.
pub fn ensure_output_dir(path: &Path) -> Result<DirState> {
    if path.is_dir() {
        log::info!("Folder {:?} already exists at {}", OUTPUT_DIR_NAME, path.display());
        return Ok(DirState::Existing);
    }

    fs::create_dir_all(path)?;
    log::info!("Folder {:?} created at {}", OUTPUT_DIR_NAME, path.display());

    Ok(DirState::Created)
}
