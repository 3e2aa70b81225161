//! Local cache of downloaded wallpapers, one `<date>.jpg` per day

use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::error::WallpaperError;
use super::feed::{FeedEntry, Fetcher};
use crate::ui::prelude::*;

const EXTENSION: &str = "jpg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedWallpaper {
    pub date: NaiveDate,
    pub path: PathBuf,
}

#[derive(Debug, Default)]
pub struct DownloadReport {
    pub downloaded: Vec<NaiveDate>,
    pub skipped: Vec<NaiveDate>,
    pub failed: Vec<(NaiveDate, WallpaperError)>,
}

impl DownloadReport {
    pub fn summary(&self) -> String {
        format!(
            "{} downloaded, {} already cached, {} failed",
            self.downloaded.len(),
            self.skipped.len(),
            self.failed.len()
        )
    }
}

#[derive(Debug, Clone)]
pub struct WallpaperStore {
    dir: PathBuf,
}

impl WallpaperStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        path_for(&self.dir, date)
    }

    /// Create the store directory and its parents if missing
    pub fn ensure_dir(&self) -> Result<(), WallpaperError> {
        fs::create_dir_all(&self.dir).map_err(|e| WallpaperError::io(&self.dir, e))
    }

    /// The cached file for `date`, if it has been downloaded
    pub fn cached(&self, date: NaiveDate) -> Option<PathBuf> {
        let path = self.path_for(date);
        path.is_file().then_some(path)
    }

    /// Download every entry whose file is not yet in the store.
    ///
    /// Existing files are never refetched or overwritten. A failed entry is
    /// recorded in the report and the remaining entries are still processed.
    pub fn download_missing<F: Fetcher + ?Sized>(
        &self,
        fetcher: &F,
        entries: &[FeedEntry],
    ) -> DownloadReport {
        let mut report = DownloadReport::default();

        for entry in entries {
            let path = self.path_for(entry.date);
            if path.exists() {
                emit(
                    Level::Debug,
                    "store.skipped",
                    &format!("{} already cached at {}", entry.date, path.display()),
                    None,
                );
                report.skipped.push(entry.date);
                continue;
            }

            match self.download(fetcher, entry, &path) {
                Ok(()) => {
                    let message = match &entry.title {
                        Some(title) => format!("Downloaded wallpaper for {}: {}", entry.date, title),
                        None => format!("Downloaded wallpaper for {}", entry.date),
                    };
                    emit(
                        Level::Success,
                        "store.downloaded",
                        &message,
                        Some(serde_json::json!({
                            "date": entry.date.to_string(),
                            "path": path.display().to_string(),
                            "title": entry.title,
                            "copyright": entry.copyright,
                        })),
                    );
                    report.downloaded.push(entry.date);
                }
                Err(err) => {
                    emit(
                        Level::Warn,
                        "store.download_failed",
                        &format!("Failed to download wallpaper for {}: {}", entry.date, err),
                        Some(serde_json::json!({
                            "date": entry.date.to_string(),
                            "url": entry.image_url,
                        })),
                    );
                    report.failed.push((entry.date, err));
                }
            }
        }

        report
    }

    fn download<F: Fetcher + ?Sized>(
        &self,
        fetcher: &F,
        entry: &FeedEntry,
        path: &Path,
    ) -> Result<(), WallpaperError> {
        let bytes = fetcher.fetch(&entry.image_url)?;
        if bytes.is_empty() {
            return Err(WallpaperError::network(
                &entry.image_url,
                "server returned an empty body",
            ));
        }
        write_atomic(&self.dir, path, &bytes)
    }

    /// Cached wallpapers sorted by date. Files not named `<date>.jpg` are ignored.
    pub fn list(&self) -> Result<Vec<CachedWallpaper>, WallpaperError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let read_dir = fs::read_dir(&self.dir).map_err(|e| WallpaperError::io(&self.dir, e))?;
        let mut wallpapers = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| WallpaperError::io(&self.dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(date) = date_from_path(&path) {
                wallpapers.push(CachedWallpaper { date, path });
            }
        }
        wallpapers.sort_by_key(|w| w.date);
        Ok(wallpapers)
    }
}

/// `<dir>/<YYYY-MM-DD>.jpg`
pub fn path_for(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.{}", date.format("%Y-%m-%d"), EXTENSION))
}

fn date_from_path(path: &Path) -> Option<NaiveDate> {
    if path.extension()?.to_str()? != EXTENSION {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
}

/// Write into a temp file beside `path`, then rename it into place.
fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), WallpaperError> {
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| WallpaperError::io(dir, e))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| WallpaperError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| WallpaperError::io(path, e.error))?;
    Ok(())
}
