//! Static files written into a project by `bna init`.

use std::path::{Path, PathBuf};

use super::engine::{Variables, interpolate};
use crate::config::Config;

/// A file to write: absolute target path and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    pub path: PathBuf,
    pub content: String,
}

impl ProjectFile {
    fn new(path: PathBuf, content: &str) -> Self {
        Self {
            path,
            content: content.to_string(),
        }
    }
}

const THEME: &str = include_str!("../../templates/project/theme.ts");
const CN: &str = include_str!("../../templates/project/cn.ts");
const COLORS: &str = include_str!("../../templates/project/colors.ts");
const UTILS_INDEX: &str = include_str!("../../templates/project/utils-index.ts");
const USE_THEME: &str = include_str!("../../templates/project/useTheme.ts");
const USE_COLOR_SCHEME: &str = include_str!("../../templates/project/useColorScheme.ts");
const HOOKS_INDEX: &str = include_str!("../../templates/project/hooks-index.ts");
const THEME_CONTEXT: &str = include_str!("../../templates/project/theme-context.tsx");
const TYPES: &str = include_str!("../../templates/project/types.ts");
const APP: &str = include_str!("../../templates/project/App.tsx");
const TSCONFIG: &str = include_str!("../../templates/project/tsconfig.json");
const METRO_CONFIG: &str = include_str!("../../templates/project/metro.config.js");
const BABEL_CONFIG: &str = include_str!("../../templates/project/babel.config.js");
const GITIGNORE: &str = include_str!("../../templates/project/gitignore");
const README: &str = include_str!("../../templates/project/README.md");

/// Theme, utility, hook and type files placed according to `config`.
pub fn library_files(config: &Config, root: &Path) -> Vec<ProjectFile> {
    let theme = config.theme_dir(root);
    let utils = config.utils_dir(root);
    let hooks = config.hooks_dir(root);
    let lib = config.lib_dir(root);
    let types = config.src_dir(root).join("types");

    vec![
        ProjectFile::new(theme.join("index.ts"), THEME),
        ProjectFile::new(utils.join("cn.ts"), CN),
        ProjectFile::new(utils.join("colors.ts"), COLORS),
        ProjectFile::new(utils.join("index.ts"), UTILS_INDEX),
        ProjectFile::new(hooks.join("useTheme.ts"), USE_THEME),
        ProjectFile::new(hooks.join("useColorScheme.ts"), USE_COLOR_SCHEME),
        ProjectFile::new(hooks.join("index.ts"), HOOKS_INDEX),
        ProjectFile::new(lib.join("theme-context.tsx"), THEME_CONTEXT),
        ProjectFile::new(types.join("index.ts"), TYPES),
    ]
}

/// Root tooling files. `init` writes each only if it does not exist yet.
pub fn project_config_files(root: &Path, project_name: &str) -> Vec<ProjectFile> {
    let vars: Variables = [("PROJECT_NAME".to_string(), project_name.to_string())]
        .into_iter()
        .collect();

    vec![
        ProjectFile::new(root.join("tsconfig.json"), TSCONFIG),
        ProjectFile::new(root.join("metro.config.js"), METRO_CONFIG),
        ProjectFile::new(root.join("babel.config.js"), BABEL_CONFIG),
        ProjectFile::new(root.join(".gitignore"), GITIGNORE),
        ProjectFile::new(root.join("README.md"), &interpolate(README, &vars)),
    ]
}

/// `App.tsx` wired to the theme provider.
pub fn app_entry(root: &Path) -> ProjectFile {
    ProjectFile::new(root.join("App.tsx"), APP)
}
