mod common;
mod ui;
mod wallpaper;

use clap::Parser;

use crate::ui::prelude::*;
use crate::wallpaper::cli::WallpaperCommands;
use crate::wallpaper::commands::run_command;
use crate::wallpaper::config::{CliOverrides, EnvSettings};
use crate::wallpaper::error::WallpaperError;

/// Download the daily Bing wallpaper and set it on every Xfce monitor and workspace
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Activate debug mode (same as APP_DEBUG=1)
    #[arg(short, long, global = true)]
    debug: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Feed country code, empty for the global feed [env: BING_WALLPAPER_COUNTRY]
    #[arg(long, global = true, value_name = "CODE")]
    country: Option<String>,

    /// Wallpaper store directory [env: BING_WALLPAPER_PATH] [default: ~/.wallpapers]
    #[arg(long, global = true, value_name = "DIR")]
    path: Option<String>,

    #[command(subcommand)]
    command: Option<WallpaperCommands>,
}

fn run(cli: Cli) -> Result<(), WallpaperError> {
    let overrides = CliOverrides {
        country: cli.country,
        path: cli.path,
        debug: cli.debug,
    };
    let command = cli.command.unwrap_or(WallpaperCommands::Update);
    run_command(command, &overrides, &EnvSettings::from_env())
}

fn main() {
    let cli = Cli::parse();
    ui::init(cli.format, !cli.no_color);

    if let Err(e) = run(cli) {
        emit(Level::Error, e.code(), &format!("Error: {}", e), None);
        std::process::exit(1);
    }
}
