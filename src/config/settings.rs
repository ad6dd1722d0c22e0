use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::installer::PackageManager;
use crate::{Error, Result, fs_ops};

pub const SETTINGS_FILENAME: &str = "settings.toml";

/// Per-user defaults read from `~/.config/bna/settings.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Registry file used instead of the bundled one.
    pub registry: Option<PathBuf>,
    /// Package manager used instead of lockfile detection.
    pub package_manager: Option<PackageManager>,
}

impl Settings {
    /// Get the settings path (~/.config/bna/settings.toml).
    pub fn global_path() -> Option<PathBuf> {
        let dirs = xdg::BaseDirectories::with_prefix("bna");
        dirs.get_config_home().map(|p| p.join(SETTINGS_FILENAME))
    }

    /// Load the user settings, or defaults if there are none.
    pub fn load() -> Result<Self> {
        match Self::global_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs_ops::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::SettingsParse(e.to_string()))
    }
}
