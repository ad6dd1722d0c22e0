use std::cell::OnceCell;
use std::path::{Path, PathBuf};

/// File name of the project config written by `bna init`.
pub const CONFIG_FILENAME: &str = "bna.json";

/// Encapsulates the well-known files at the root of an Expo project.
///
/// Provides lazy-cached path accessors for:
/// - `bna.json` - component library config
/// - `package.json` - npm manifest
/// - `app.json` / `expo.json` - Expo app config
#[derive(Debug)]
pub struct ProjectLayout {
    root: PathBuf,
    config_json: OnceCell<PathBuf>,
    package_json: OnceCell<PathBuf>,
    app_json: OnceCell<PathBuf>,
    expo_json: OnceCell<PathBuf>,
}

impl Clone for ProjectLayout {
    fn clone(&self) -> Self {
        Self::new(self.root.clone())
    }
}

impl ProjectLayout {
    /// Create a new ProjectLayout rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config_json: OnceCell::new(),
            package_json: OnceCell::new(),
            app_json: OnceCell::new(),
            expo_json: OnceCell::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns reference to the bna.json path.
    pub fn config_json(&self) -> &Path {
        self.config_json
            .get_or_init(|| self.root.join(CONFIG_FILENAME))
    }

    /// Returns reference to the package.json path.
    pub fn package_json(&self) -> &Path {
        self.package_json
            .get_or_init(|| self.root.join("package.json"))
    }

    /// Returns reference to the app.json path.
    pub fn app_json(&self) -> &Path {
        self.app_json.get_or_init(|| self.root.join("app.json"))
    }

    /// Returns reference to the expo.json path.
    pub fn expo_json(&self) -> &Path {
        self.expo_json.get_or_init(|| self.root.join("expo.json"))
    }
}
