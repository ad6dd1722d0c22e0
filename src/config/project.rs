use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::layout::ProjectLayout;
use crate::{Result, fs_ops};

/// Directory layout of a project, persisted as `bna.json`.
///
/// All paths are relative to the project root. Fields missing from the file
/// take their default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub typescript: bool,
    pub tailwind: bool,
    pub src: String,
    pub components: String,
    pub utils: String,
    pub lib: String,
    pub hooks: String,
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            typescript: true,
            tailwind: false,
            src: "src".to_string(),
            components: "src/components".to_string(),
            utils: "src/lib/utils".to_string(),
            lib: "src/lib".to_string(),
            hooks: "src/hooks".to_string(),
            theme: "src/lib/theme".to_string(),
        }
    }
}

/// Read `bna.json` from the project root.
///
/// Returns `None` when the file is absent. A file that cannot be read or
/// parsed is logged and also treated as absent.
pub fn load_config(layout: &ProjectLayout) -> Option<Config> {
    let path = layout.config_json();
    if !fs_ops::exists(path) {
        debug!(path = %path.display(), "no config file");
        return None;
    }

    match fs_ops::read_json::<Config>(path) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("failed to read config file: {}", e);
            None
        }
    }
}

impl Config {
    /// Persist the default config, replacing any existing `bna.json`.
    pub fn init(layout: &ProjectLayout) -> Result<Self> {
        let config = Self::default();
        config.save(layout)?;
        Ok(config)
    }

    pub fn save(&self, layout: &ProjectLayout) -> Result<()> {
        fs_ops::write_json(layout.config_json(), self)
    }

    /// Absolute path of a component file given its registry-relative path.
    pub fn component_path(&self, root: &Path, relative: &str) -> PathBuf {
        self.components_dir(root).join(relative)
    }

    pub fn src_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.src)
    }

    pub fn components_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.components)
    }

    pub fn utils_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.utils)
    }

    pub fn lib_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.lib)
    }

    pub fn hooks_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.hooks)
    }

    pub fn theme_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.theme)
    }
}
