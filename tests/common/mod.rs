use anyhow::Result;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stand-in for `xfconf-query`: logs its arguments, answers from `FAKE_*` variables.
const FAKE_XFCONF_QUERY: &str = r#"#!/bin/sh
echo "$*" >> "$FAKE_LOG"
case "$*" in
  *" -s "*)
    case "$*" in
      *"$FAKE_FAIL_SET"*) [ -n "$FAKE_FAIL_SET" ] && { echo "write denied" >&2; exit 1; } ;;
    esac
    exit 0 ;;
  *single-workspace-mode*)
    if [ "$FAKE_MODE" = missing ]; then
      echo 'Property "/backdrop/single-workspace-mode" does not exist on channel "xfce4-desktop".' >&2
      exit 1
    fi
    echo "$FAKE_MODE" ;;
  *single-workspace-number*|*workspace_count*)
    echo "$FAKE_WORKSPACES" ;;
  *)
    exit 1 ;;
esac
"#;

/// Isolated HOME, wallpaper store and a PATH holding fake desktop tools
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        fs::create_dir_all(temp_dir.path().join("home"))?;
        fs::create_dir_all(temp_dir.path().join("bin"))?;
        let env = Self { temp_dir };
        env.install_tool("xfconf-query", FAKE_XFCONF_QUERY)?;
        env.set_xrandr_output("", 0)?;
        Ok(env)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn home(&self) -> PathBuf {
        self.path().join("home")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.path().join("bin")
    }

    pub fn store_dir(&self) -> PathBuf {
        self.path().join("walls")
    }

    /// Every `xfconf-query` invocation, one argument string per line
    pub fn log_path(&self) -> PathBuf {
        self.path().join("xfconf.log")
    }

    pub fn install_tool(&self, name: &str, script: &str) -> Result<()> {
        let path = self.bin_dir().join(name);
        fs::write(&path, script)?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        Ok(())
    }

    /// Replace `xrandr` with a script printing `output` and exiting with `code`
    pub fn set_xrandr_output(&self, output: &str, code: i32) -> Result<()> {
        let script = format!(
            "#!/bin/sh\ncat <<'XRANDR'\n{}\nXRANDR\nexit {}\n",
            output.trim_end(),
            code
        );
        self.install_tool("xrandr", &script)
    }

    /// Put a cached wallpaper into the store
    pub fn cache_wallpaper(&self, date: &str, content: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(self.store_dir())?;
        let path = self.store_dir().join(format!("{}.jpg", date));
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn log_lines(&self) -> Vec<String> {
        fs::read_to_string(self.log_path())
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Logged `last-image` writes
    pub fn wallpaper_sets(&self) -> Vec<String> {
        self.log_lines()
            .into_iter()
            .filter(|l| l.contains("-t string") && l.contains(" -s "))
            .collect()
    }
}
