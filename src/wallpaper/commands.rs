use chrono::{Local, NaiveDate};
use colored::*;
use std::path::PathBuf;

use super::apply::{ApplyReport, apply_to_all};
use super::cli::{ApplyArgs, WallpaperCommands};
use super::config::{CliOverrides, EnvSettings, Settings, WallpaperConfig};
use super::error::WallpaperError;
use super::feed::{Feed, Fetcher, HttpFetcher, fetch_feed};
use super::store::{DownloadReport, WallpaperStore};
use super::xfce::XfceDesktop;
use crate::common::process::{CommandRunner, SystemRunner};
use crate::ui::{self, prelude::*};

#[derive(Debug)]
pub enum RunOutcome {
    /// No X display; nothing was touched
    NoDisplay,
    /// The wallpaper for the requested day is not in the store
    NotYetPublished { date: NaiveDate, path: PathBuf },
    Applied { path: PathBuf, report: ApplyReport },
}

/// Full update: fetch the feed, fill the store, apply `today`'s wallpaper.
pub fn update<F, R>(
    settings: &Settings,
    fetcher: &F,
    runner: &R,
    today: NaiveDate,
) -> Result<RunOutcome, WallpaperError>
where
    F: Fetcher + ?Sized,
    R: CommandRunner + ?Sized,
{
    let store = WallpaperStore::new(&settings.store_dir);
    download(settings, &store, fetcher)?;
    apply_cached(settings, &store, runner, today)
}

/// Fetch the feed and download every wallpaper missing from the store
pub fn download<F: Fetcher + ?Sized>(
    settings: &Settings,
    store: &WallpaperStore,
    fetcher: &F,
) -> Result<DownloadReport, WallpaperError> {
    store.ensure_dir()?;

    let feed = fetch_feed(fetcher, &settings.country)?;
    if let Some(raw) = raw_feed_dump(settings, &feed) {
        ui::raw(raw);
    }
    emit(
        Level::Info,
        "feed.fetched",
        &format!("Feed lists {} wallpapers", feed.entries.len()),
        Some(serde_json::json!({ "country": settings.country, "entries": feed.entries.len() })),
    );

    let report = store.download_missing(fetcher, &feed.entries);
    emit(
        Level::Info,
        "store.summary",
        &report.summary(),
        Some(serde_json::json!({
            "downloaded": report.downloaded.len(),
            "skipped": report.skipped.len(),
            "failed": report.failed.len(),
        })),
    );
    Ok(report)
}

/// Apply the stored wallpaper for `date` to every monitor and workspace
pub fn apply_cached<R: CommandRunner + ?Sized>(
    settings: &Settings,
    store: &WallpaperStore,
    runner: &R,
    date: NaiveDate,
) -> Result<RunOutcome, WallpaperError> {
    let Some(path) = store.cached(date) else {
        return Ok(RunOutcome::NotYetPublished {
            date,
            path: store.path_for(date),
        });
    };

    let desktop = XfceDesktop::new(runner);
    let report = apply_to_all(&desktop, &path)?;
    Ok(RunOutcome::Applied { path, report })
}

/// The response body exactly as served, when debug mode asks for it
fn raw_feed_dump<'a>(settings: &Settings, feed: &'a Feed) -> Option<&'a str> {
    settings.debug.then_some(feed.raw.as_str())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Commands that drive the desktop do nothing at all without a display
fn headless_outcome(command: &WallpaperCommands, env: &EnvSettings) -> Option<RunOutcome> {
    let needs_display = matches!(command, WallpaperCommands::Update | WallpaperCommands::Apply(_));
    (needs_display && env.display.is_none()).then_some(RunOutcome::NoDisplay)
}

/// Entry point: gate on the display, resolve settings, dispatch.
///
/// A headless `update` or `apply` returns before the config file or the home
/// directory is read.
pub fn run_command(
    command: WallpaperCommands,
    overrides: &CliOverrides,
    env: &EnvSettings,
) -> Result<(), WallpaperError> {
    if let Some(outcome) = headless_outcome(&command, env) {
        report_outcome(&outcome);
        return Ok(());
    }

    let settings = Settings::load(overrides, env)?;
    ui::set_debug_mode(settings.debug);
    emit(
        Level::Debug,
        "config.resolved",
        &format!(
            "store {} ({}), country {:?} ({})",
            settings.store_dir.display(),
            settings.store_dir_source.as_str(),
            settings.country,
            settings.country_source.as_str()
        ),
        None,
    );

    handle_wallpaper_command(command, &settings)
}

pub fn handle_wallpaper_command(
    command: WallpaperCommands,
    settings: &Settings,
) -> Result<(), WallpaperError> {
    match command {
        WallpaperCommands::Update => handle_update(settings),
        WallpaperCommands::Download => handle_download(settings),
        WallpaperCommands::Apply(args) => handle_apply(settings, args),
        WallpaperCommands::List => handle_list(settings),
        WallpaperCommands::Config => handle_config(settings),
    }
}

fn handle_update(settings: &Settings) -> Result<(), WallpaperError> {
    let fetcher = HttpFetcher::new()?;
    let outcome = update(settings, &fetcher, &SystemRunner, today())?;
    report_outcome(&outcome);
    Ok(())
}

fn handle_download(settings: &Settings) -> Result<(), WallpaperError> {
    let fetcher = HttpFetcher::new()?;
    let store = WallpaperStore::new(&settings.store_dir);
    download(settings, &store, &fetcher)?;
    Ok(())
}

fn handle_apply(settings: &Settings, args: ApplyArgs) -> Result<(), WallpaperError> {
    let store = WallpaperStore::new(&settings.store_dir);
    let date = args.date.unwrap_or_else(today);
    let outcome = apply_cached(settings, &store, &SystemRunner, date)?;
    report_outcome(&outcome);
    Ok(())
}

fn handle_list(settings: &Settings) -> Result<(), WallpaperError> {
    let store = WallpaperStore::new(&settings.store_dir);
    let wallpapers = store.list()?;
    if wallpapers.is_empty() {
        emit(
            Level::Info,
            "store.empty",
            &format!("No wallpapers cached in {}", store.dir().display()),
            None,
        );
        return Ok(());
    }

    for wallpaper in &wallpapers {
        emit(
            Level::Info,
            "store.entry",
            &format!("{}  {}", wallpaper.date.to_string().cyan(), wallpaper.path.display()),
            Some(serde_json::json!({
                "date": wallpaper.date.to_string(),
                "path": wallpaper.path.display().to_string(),
            })),
        );
    }
    Ok(())
}

fn handle_config(settings: &Settings) -> Result<(), WallpaperError> {
    let config_file = WallpaperConfig::config_file_path()?;
    let country = if settings.country.is_empty() {
        "(global)"
    } else {
        settings.country.as_str()
    };
    let lines = [
        ("config_file", config_file.display().to_string(), None),
        ("country", country.to_string(), Some(settings.country_source)),
        (
            "store_dir",
            settings.store_dir.display().to_string(),
            Some(settings.store_dir_source),
        ),
        (
            "display",
            settings.display.clone().unwrap_or_else(|| "(none)".to_string()),
            None,
        ),
    ];
    for (key, value, source) in lines {
        let message = match source {
            Some(source) => format!(
                "{} {} {}",
                format!("{:<12}", key).bold(),
                value,
                format!("[{}]", source.as_str()).dimmed()
            ),
            None => format!("{} {}", format!("{:<12}", key).bold(), value),
        };
        emit(
            Level::Info,
            "config.value",
            &message,
            Some(serde_json::json!({ "key": key, "value": value, "source": source })),
        );
    }
    Ok(())
}

fn report_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::NoDisplay => emit(
            Level::Info,
            "update.no_display",
            "$DISPLAY not set, nothing to do",
            None,
        ),
        RunOutcome::NotYetPublished { date, path } => emit(
            Level::Info,
            "update.not_yet_published",
            &format!("No wallpaper for {} yet ({} missing)", date, path.display()),
            Some(serde_json::json!({ "date": date.to_string(), "path": path.display().to_string() })),
        ),
        RunOutcome::Applied { path, report } => {
            emit(
                Level::Success,
                "apply.done",
                &format!(
                    "Wallpaper {} set on {} slot(s)",
                    path.display(),
                    report.applied.len()
                ),
                Some(serde_json::json!({
                    "path": path.display().to_string(),
                    "single_workspace_mode": report.single_workspace_mode,
                    "applied": report.applied,
                    "failed": report.failed.len(),
                })),
            );
            if !report.failed.is_empty() {
                emit(
                    Level::Warn,
                    "apply.partial",
                    &format!("{} slot(s) could not be updated", report.failed.len()),
                    None,
                );
            }
        }
    }
}
