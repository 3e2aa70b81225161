use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::error::WallpaperError;
use crate::common::paths;

pub const ENV_DISPLAY: &str = "DISPLAY";
pub const ENV_COUNTRY: &str = "BING_WALLPAPER_COUNTRY";
pub const ENV_PATH: &str = "BING_WALLPAPER_PATH";
pub const ENV_DEBUG: &str = "APP_DEBUG";

/// Optional `config.toml`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct WallpaperConfig {
    pub country: Option<String>,
    pub path: Option<String>,
}

impl WallpaperConfig {
    pub fn config_file_path() -> Result<PathBuf, WallpaperError> {
        paths::config_file().map_err(|e| WallpaperError::Config(e.to_string()))
    }

    pub fn load() -> Result<Self, WallpaperError> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(cfg_path: &Path) -> Result<Self, WallpaperError> {
        if !cfg_path.exists() {
            return Ok(Self::default());
        }

        let s = fs::read_to_string(cfg_path).map_err(|e| WallpaperError::io(cfg_path, e))?;
        toml::from_str(&s).map_err(|e| {
            WallpaperError::Config(format!("parsing {}: {}", cfg_path.display(), e))
        })
    }
}

/// Values taken from the process environment
#[derive(Debug, Clone, Default)]
pub struct EnvSettings {
    pub display: Option<String>,
    pub country: Option<String>,
    pub path: Option<String>,
    pub debug: bool,
}

impl EnvSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            display: lookup(ENV_DISPLAY).filter(|d| !d.is_empty()),
            country: lookup(ENV_COUNTRY),
            path: lookup(ENV_PATH).filter(|p| !p.is_empty()),
            debug: lookup(ENV_DEBUG).as_deref() == Some("1"),
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub country: Option<String>,
    pub path: Option<String>,
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Flag,
    Env,
    File,
    Default,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Flag => "flag",
            Source::Env => "env",
            Source::File => "file",
            Source::Default => "default",
        }
    }
}

/// Resolved configuration for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub display: Option<String>,
    pub country: String,
    pub country_source: Source,
    pub store_dir: PathBuf,
    pub store_dir_source: Source,
    pub debug: bool,
}

impl Settings {
    pub fn load(cli: &CliOverrides, env: &EnvSettings) -> Result<Self, WallpaperError> {
        Self::resolve(cli, env, &WallpaperConfig::load()?)
    }

    /// Flag > environment > config file > default
    pub fn resolve(
        cli: &CliOverrides,
        env: &EnvSettings,
        file: &WallpaperConfig,
    ) -> Result<Self, WallpaperError> {
        let (country, country_source) = pick(&cli.country, &env.country, &file.country)
            .unwrap_or((String::new(), Source::Default));

        let (store_dir, store_dir_source) = match pick(&cli.path, &env.path, &file.path) {
            Some((raw, source)) => (paths::expand_user_path(&raw), source),
            None => (
                paths::default_store_dir().map_err(|e| WallpaperError::Config(e.to_string()))?,
                Source::Default,
            ),
        };

        Ok(Self {
            display: env.display.clone(),
            country,
            country_source,
            store_dir,
            store_dir_source,
            debug: cli.debug || env.debug,
        })
    }
}

fn pick(
    flag: &Option<String>,
    env: &Option<String>,
    file: &Option<String>,
) -> Option<(String, Source)> {
    flag.clone()
        .map(|v| (v, Source::Flag))
        .or_else(|| env.clone().map(|v| (v, Source::Env)))
        .or_else(|| file.clone().map(|v| (v, Source::File)))
}
