//! Centralized path management for bing-wallpaper

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "bing-wallpaper";
const DEFAULT_STORE_DIR: &str = ".wallpapers";

/// Get the config directory. Not created; the config file is optional.
pub fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Unable to determine user config directory")?
        .join(APP_DIR))
}

pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Default wallpaper store, `~/.wallpapers`
pub fn default_store_dir() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .context("Unable to determine home directory")?
        .join(DEFAULT_STORE_DIR))
}

/// Expand a leading `~` in a user-supplied path
pub fn expand_user_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}
