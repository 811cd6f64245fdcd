use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn dailytasks_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".dailytasks"))
}

pub fn ensure_dailytasks_home() -> Result<PathBuf> {
    let dir = dailytasks_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_data_path() -> Result<PathBuf> {
    Ok(ensure_dailytasks_home()?.join("TaskData.json"))
}
