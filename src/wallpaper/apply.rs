use serde::Serialize;
use std::path::Path;

use super::error::WallpaperError;
use super::xfce::XfceDesktop;
use crate::common::process::CommandRunner;
use crate::ui::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub monitor: String,
    pub workspace: u32,
}

#[derive(Debug, Default)]
pub struct ApplyReport {
    pub single_workspace_mode: bool,
    pub applied: Vec<Slot>,
    pub failed: Vec<(Slot, WallpaperError)>,
}

/// Set `image` on every connected monitor × workspace.
///
/// Querying the mode, workspaces or monitors is fatal; a failing slot is
/// reported and skipped.
pub fn apply_to_all<R: CommandRunner + ?Sized>(
    desktop: &XfceDesktop<'_, R>,
    image: &Path,
) -> Result<ApplyReport, WallpaperError> {
    let single_workspace_mode = desktop.single_workspace_mode()?;
    emit(
        Level::Info,
        "apply.mode",
        &format!(
            "Running in {} workspace mode",
            if single_workspace_mode { "single" } else { "multi" }
        ),
        None,
    );

    let workspaces = desktop.workspaces(single_workspace_mode)?;
    let monitors = desktop.connected_monitors()?;
    if monitors.is_empty() {
        emit(
            Level::Warn,
            "apply.no_monitors",
            "No connected monitors reported by xrandr",
            None,
        );
    }

    let mut report = ApplyReport {
        single_workspace_mode,
        ..Default::default()
    };

    for monitor in &monitors {
        for &workspace in &workspaces {
            let slot = Slot {
                monitor: monitor.clone(),
                workspace,
            };
            emit(
                Level::Info,
                "apply.slot",
                &format!(
                    "Setting wallpaper for monitor {} workspace {}",
                    monitor, workspace
                ),
                Some(serde_json::json!(slot)),
            );
            match desktop.set_wallpaper(monitor, workspace, image) {
                Ok(()) => report.applied.push(slot),
                Err(err) => {
                    emit(
                        Level::Warn,
                        "apply.slot_failed",
                        &format!(
                            "Failed to set wallpaper for monitor {} workspace {}: {}",
                            monitor, workspace, err
                        ),
                        Some(serde_json::json!(slot)),
                    );
                    report.failed.push((slot, err));
                }
            }
        }
    }

    Ok(report)
}
