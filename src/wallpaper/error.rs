use std::path::PathBuf;
use thiserror::Error;

use crate::common::process::ProcessError;

#[derive(Error, Debug)]
pub enum WallpaperError {
    #[error("Network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("Failed to parse {what}: {message}")]
    Parse { what: String, message: String },

    #[error("{tool} failed: {message}")]
    ExternalTool { tool: String, message: String },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WallpaperError {
    pub fn network(url: &str, err: impl ToString) -> Self {
        WallpaperError::Network {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    pub fn parse(what: impl Into<String>, err: impl ToString) -> Self {
        WallpaperError::Parse {
            what: what.into(),
            message: err.to_string(),
        }
    }

    pub fn tool(tool: &str, message: impl Into<String>) -> Self {
        WallpaperError::ExternalTool {
            tool: tool.to_string(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WallpaperError::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable identifier used in JSON output
    pub fn code(&self) -> &'static str {
        match self {
            WallpaperError::Network { .. } => "network",
            WallpaperError::Parse { .. } => "parse",
            WallpaperError::ExternalTool { .. } => "external_tool",
            WallpaperError::Io { .. } => "io",
            WallpaperError::Config(_) => "config",
        }
    }
}

impl From<ProcessError> for WallpaperError {
    fn from(err: ProcessError) -> Self {
        WallpaperError::ExternalTool {
            tool: err.program().to_string(),
            message: err.to_string(),
        }
    }
}
