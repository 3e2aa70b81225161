use chrono::NaiveDate;
use clap::{Args, Subcommand};

#[derive(Subcommand, Debug, Clone)]
pub enum WallpaperCommands {
    /// Fetch the feed, download new wallpapers and apply today's (default)
    Update,
    /// Fetch the feed and download new wallpapers without touching the desktop
    Download,
    /// Apply a cached wallpaper to every monitor and workspace
    Apply(ApplyArgs),
    /// List cached wallpapers
    List,
    /// Show the resolved configuration
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct ApplyArgs {
    /// Date of the cached wallpaper (defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,
}
