//! Where settings, the translation table and recordings live.
//!
//! | What                | Linux                                   |
//! |---------------------|-----------------------------------------|
//! | `settings.toml`     | `~/.config/therahand/`                  |
//! | `locale.json`       | `~/.config/therahand/`                  |
//! | `*.jsonl` sessions  | `~/.local/share/therahand/recordings/`  |
//!
//! Other platforms use the `dirs` equivalents (`%APPDATA%`,
//! `%LOCALAPPDATA%`, `~/Library/Application Support`).

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub settings_file: PathBuf,
    /// Default translation table.
    pub locale_file: PathBuf,
    /// Searched for recordings given by bare file name.
    pub recordings_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "therahand";

    /// Platform directories, falling back to `.` when one is unknown.
    pub fn new() -> Self {
        let base = |dir: Option<PathBuf>| dir.unwrap_or_else(|| PathBuf::from(".")).join(Self::APP_NAME);
        Self::from_dirs(&base(dirs::config_dir()), &base(dirs::data_local_dir()))
    }

    /// Lay the files out under explicit config and data directories.
    pub fn from_dirs(config_dir: &Path, data_dir: &Path) -> Self {
        Self {
            settings_file: config_dir.join("settings.toml"),
            locale_file: config_dir.join("locale.json"),
            recordings_dir: data_dir.join("recordings"),
        }
    }

    /// Resolve a `--recording` argument.
    ///
    /// Existing paths and anything with a directory part are used as given;
    /// a bare file name that does not exist in the working directory is
    /// looked up in [`recordings_dir`](Self::recordings_dir).
    pub fn resolve_recording(&self, given: &Path) -> PathBuf {
        let bare = given.parent().map_or(true, |p| p.as_os_str().is_empty());
        if given.exists() || !bare {
            return given.to_path_buf();
        }
        let stored = self.recordings_dir.join(given);
        if stored.exists() {
            log::debug!("recording resolved to {}", stored.display());
            stored
        } else {
            given.to_path_buf()
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
