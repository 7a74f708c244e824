use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$DAYSLOT_HOME`, else `~/.dayslot`.
pub fn dayslot_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("DAYSLOT_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".dayslot"))
}

pub fn ensure_dayslot_home() -> Result<PathBuf> {
    let dir = dayslot_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
