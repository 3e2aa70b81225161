//! Xfce desktop settings through `xfconf-query`, monitors through `xrandr`

use std::path::Path;

use super::error::WallpaperError;
use crate::common::process::{CommandOutput, CommandRunner};
use crate::ui::prelude::*;

pub const XFCONF_QUERY: &str = "xfconf-query";
pub const XRANDR: &str = "xrandr";

const DESKTOP_CHANNEL: &str = "xfce4-desktop";
const WM_CHANNEL: &str = "xfwm4";

const SINGLE_WORKSPACE_MODE: &str = "/backdrop/single-workspace-mode";
const SINGLE_WORKSPACE_NUMBER: &str = "/backdrop/single-workspace-number";
const WORKSPACE_COUNT: &str = "/general/workspace_count";

/// Marks an attached output in `xrandr --query`; excludes "disconnected".
const CONNECTED_MARKER: &str = " connected";

/// The property holding the wallpaper of one monitor/workspace slot
pub fn property_path(monitor: &str, workspace: u32) -> String {
    format!(
        "/backdrop/screen0/monitor{}/workspace{}/last-image",
        monitor, workspace
    )
}

/// Monitor names from `xrandr --query` output
pub fn parse_connected_monitors(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| line.contains(CONNECTED_MARKER))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

fn parse_workspace_number(property: &str, output: &str) -> Result<u32, WallpaperError> {
    output
        .trim()
        .parse::<u32>()
        .map_err(|e| WallpaperError::parse(format!("{} value {:?}", property, output.trim()), e))
}

pub struct XfceDesktop<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
}

impl<'a, R: CommandRunner + ?Sized> XfceDesktop<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }

    fn query(&self, channel: &str, property: &str) -> Result<CommandOutput, WallpaperError> {
        Ok(self
            .runner
            .run(XFCONF_QUERY, &["-c", channel, "-p", property])?)
    }

    fn set(
        &self,
        channel: &str,
        property: &str,
        kind: &str,
        value: &str,
    ) -> Result<(), WallpaperError> {
        let output = self.runner.run(
            XFCONF_QUERY,
            &["-c", channel, "-n", "-t", kind, "-p", property, "-s", value],
        )?;
        if !output.success {
            return Err(WallpaperError::tool(
                XFCONF_QUERY,
                format!("setting {}: {}", property, output.failure_summary()),
            ));
        }
        Ok(())
    }

    /// Whether one wallpaper is shared by all workspaces.
    ///
    /// When the property does not exist yet it is created as `false`
    /// (per-workspace wallpapers).
    pub fn single_workspace_mode(&self) -> Result<bool, WallpaperError> {
        let output = self.query(DESKTOP_CHANNEL, SINGLE_WORKSPACE_MODE)?;
        if output.success {
            return Ok(output.stdout.trim() == "true");
        }

        emit(
            Level::Warn,
            "xfce.mode_missing",
            &format!(
                "{} is not set ({}), falling back to multi-workspace mode",
                SINGLE_WORKSPACE_MODE,
                output.failure_summary()
            ),
            None,
        );
        self.set(DESKTOP_CHANNEL, SINGLE_WORKSPACE_MODE, "bool", "false")?;
        Ok(false)
    }

    /// `[n]` in single-workspace mode, `0..count` otherwise
    pub fn workspaces(&self, single_mode: bool) -> Result<Vec<u32>, WallpaperError> {
        let (channel, property) = if single_mode {
            (DESKTOP_CHANNEL, SINGLE_WORKSPACE_NUMBER)
        } else {
            (WM_CHANNEL, WORKSPACE_COUNT)
        };

        let output = self.query(channel, property)?;
        if !output.success {
            return Err(WallpaperError::tool(
                XFCONF_QUERY,
                format!("reading {}: {}", property, output.failure_summary()),
            ));
        }

        let number = parse_workspace_number(property, &output.stdout)?;
        Ok(if single_mode {
            vec![number]
        } else {
            (0..number).collect()
        })
    }

    pub fn connected_monitors(&self) -> Result<Vec<String>, WallpaperError> {
        let output = self.runner.run(XRANDR, &["--query"])?;
        if !output.success {
            return Err(WallpaperError::tool(XRANDR, output.failure_summary()));
        }
        Ok(parse_connected_monitors(&output.stdout))
    }

    pub fn set_wallpaper(
        &self,
        monitor: &str,
        workspace: u32,
        image: &Path,
    ) -> Result<(), WallpaperError> {
        let image = image.to_string_lossy();
        self.set(
            DESKTOP_CHANNEL,
            &property_path(monitor, workspace),
            "string",
            &image,
        )
    }
}
