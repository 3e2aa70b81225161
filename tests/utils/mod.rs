use anyhow::Result;
use std::process::Command;

use super::common::TestEnvironment;

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Fake tools first, then the system directories for `sh` and `cat`
fn search_path(env: &TestEnvironment) -> String {
    format!("{}:/usr/bin:/bin", env.bin_dir().display())
}

/// Run the binary with a scrubbed environment rooted in `env`.
///
/// `vars` are applied last and may override the defaults (`DISPLAY=:0`,
/// single-workspace mode with workspace 0, store in the temp dir).
pub fn run_wallpaper_command(
    env: &TestEnvironment,
    args: &[&str],
    vars: &[(&str, &str)],
) -> Result<CommandOutput> {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bing-wallpaper"));
    cmd.args(args)
        .env_clear()
        .env("HOME", env.home())
        .env("PATH", search_path(env))
        .env("DISPLAY", ":0")
        .env("BING_WALLPAPER_PATH", env.store_dir())
        .env("FAKE_LOG", env.log_path())
        .env("FAKE_MODE", "true")
        .env("FAKE_WORKSPACES", "0")
        .current_dir(env.path());

    for (key, value) in vars {
        cmd.env(key, value);
    }

    let output = cmd.output()?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

/// Same as [`run_wallpaper_command`] but without `DISPLAY`
pub fn run_headless(env: &TestEnvironment, args: &[&str]) -> Result<CommandOutput> {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bing-wallpaper"));
    cmd.args(args)
        .env_clear()
        .env("HOME", env.home())
        .env("PATH", search_path(env))
        .env("BING_WALLPAPER_PATH", env.store_dir())
        .env("FAKE_LOG", env.log_path())
        .current_dir(env.path());

    let output = cmd.output()?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

/// Parse JSON-lines output, skipping anything that is not an object
pub fn json_events(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .filter_map(|l| serde_json::from_str::<serde_json::Value>(l).ok())
        .filter(|v| v.is_object())
        .collect()
}
