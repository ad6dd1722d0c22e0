use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::display_name;
use crate::config::Config;
use crate::installer::{
    CommandRunner, Installer, PackageManager, PackageManagerInstaller, ShellCommand, SystemRunner,
    installed_version,
};
use crate::layout::ProjectLayout;
use crate::prompt::{Prompter, TerminalPrompter};
use crate::{Error, Result, fs_ops, templates};

const DEPENDENCIES: [&str; 5] = [
    "react-native-vector-icons",
    "@react-native-async-storage/async-storage",
    "react-native-safe-area-context",
    "react-native-gesture-handler",
    "@react-native-community/slider",
];

const DEV_DEPENDENCIES: [&str; 2] = [
    "@types/react-native-vector-icons",
    "babel-plugin-module-resolver",
];

/// Where `init` operates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitTarget {
    /// Set up the project in the current directory.
    Existing { name: String, root: PathBuf },
    /// Scaffold `<cwd>/<name>` first.
    New { name: String, root: PathBuf },
}

impl InitTarget {
    pub fn root(&self) -> &Path {
        match self {
            InitTarget::Existing { root, .. } | InitTarget::New { root, .. } => root,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            InitTarget::Existing { name, .. } | InitTarget::New { name, .. } => name,
        }
    }
}

/// Initialize a project with the UI library.
pub fn run(
    cwd: &Path,
    project_name: Option<String>,
    overwrite: bool,
    skip_install: bool,
    package_manager: Option<PackageManager>,
) -> Result<()> {
    let prompter = TerminalPrompter;
    let runner = SystemRunner;

    let target = resolve_target(cwd, project_name, overwrite, &prompter)?;
    let is_new = matches!(target, InitTarget::New { .. });
    println!(
        "{} {} with the BNA UI library...",
        if is_new { "Initializing" } else { "Setting up" },
        target.name()
    );

    if is_new {
        create_expo_project(cwd, target.name(), &runner)?;
    } else {
        warn_if_not_expo(&ProjectLayout::new(target.root()));
    }

    let installer = PackageManagerInstaller::new(target.root(), package_manager, &runner);
    let installer: Option<&dyn Installer> = if skip_install {
        None
    } else {
        Some(&installer)
    };
    setup_project(target.root(), target.name(), installer)?;

    println!();
    println!("BNA UI library setup completed!");
    println!();
    if is_new {
        println!("Next steps:");
        println!("  cd {}", target.name());
        println!("  npx expo start");
        println!();
    }
    println!("Add components with:");
    println!("  npx bna add button");
    println!("  npx bna add input card");
    println!("  npx bna add --all");
    Ok(())
}

/// Decide which directory to initialize, asking when needed.
pub fn resolve_target(
    cwd: &Path,
    project_name: Option<String>,
    overwrite: bool,
    prompter: &dyn Prompter,
) -> Result<InitTarget> {
    let name = match project_name {
        Some(name) => name,
        None if ProjectLayout::new(cwd).package_json().exists() => {
            if !prompter.confirm("Initialize BNA in the current directory?", true)? {
                return Err(Error::Aborted);
            }
            return Ok(InitTarget::Existing {
                name: display_name(cwd),
                root: cwd.to_path_buf(),
            });
        }
        None => prompter.input("What is your project name?", "my-app")?,
    };

    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::ProjectNameRequired);
    }

    let root = cwd.join(&name);
    if root.exists() {
        if !overwrite
            && !prompter.confirm(
                &format!("Directory {} already exists. Continue?", name),
                false,
            )?
        {
            return Err(Error::Aborted);
        }
        println!("Using existing directory...");
    }

    Ok(InitTarget::New { name, root })
}

fn create_expo_project(cwd: &Path, name: &str, runner: &dyn CommandRunner) -> Result<()> {
    println!("Creating Expo project...");
    let command = ShellCommand::new("npx", cwd).args([
        "create-expo-app@latest",
        name,
        "--template",
        "blank-typescript",
    ]);
    runner.run(&command)?;
    println!("Expo project created");
    Ok(())
}

fn warn_if_not_expo(layout: &ProjectLayout) {
    let expo_config = layout.app_json().exists() || layout.expo_json().exists();
    match installed_version(layout.package_json(), "expo") {
        Some(version) => debug!(%version, "found expo dependency"),
        None if !expo_config => {
            warn!("this doesn't appear to be an Expo project, continuing anyway")
        }
        None => {}
    }
}

/// Write config, directories and library files into `root`, then install
/// the library's dependencies when an installer is given.
pub fn setup_project(
    root: &Path,
    project_name: &str,
    installer: Option<&dyn Installer>,
) -> Result<Config> {
    let layout = ProjectLayout::new(root);
    let config = Config::init(&layout)?;
    println!("Configuration saved to {}", layout.config_json().display());

    create_directory_structure(&config, root)?;

    println!("Setting up theme and utilities...");
    for file in templates::library_files(&config, root) {
        fs_ops::write(&file.path, &file.content)?;
    }

    if let Some(installer) = installer {
        let deps: Vec<String> = DEPENDENCIES.iter().map(|d| d.to_string()).collect();
        let dev_deps: Vec<String> = DEV_DEPENDENCIES.iter().map(|d| d.to_string()).collect();
        installer.install(&deps, false)?;
        installer.install(&dev_deps, true)?;
    }

    for file in templates::project_config_files(root, project_name) {
        if fs_ops::exists(&file.path) {
            debug!(path = %file.path.display(), "keeping existing file");
            continue;
        }
        fs_ops::write(&file.path, &file.content)?;
    }

    let app = templates::app_entry(root);
    if !fs_ops::exists(&app.path) {
        println!("App.tsx not found, creating a new one");
    }
    fs_ops::write(&app.path, &app.content)?;

    Ok(config)
}

fn create_directory_structure(config: &Config, root: &Path) -> Result<()> {
    let components = config.components_dir(root);
    let src = config.src_dir(root);
    let directories = [
        src.clone(),
        components.clone(),
        components.join("ui"),
        components.join("layout"),
        config.lib_dir(root),
        config.utils_dir(root),
        config.hooks_dir(root),
        config.theme_dir(root),
        src.join("constants"),
        src.join("types"),
    ];

    for dir in &directories {
        fs_ops::ensure_dir(dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use crate::testing::{RecordingInstaller, RecordingRunner, ScriptedPrompter};
    use std::fs;

    #[test]
    fn test_setup_project_writes_everything() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        let installer = RecordingInstaller::default();

        let config = setup_project(root, "shop", Some(&installer)).unwrap();

        assert_eq!(load_config(&ProjectLayout::new(root)), Some(config));
        for dir in [
            "src/components/ui",
            "src/components/layout",
            "src/constants",
            "src/types",
            "src/hooks",
            "src/lib/utils",
            "src/lib/theme",
        ] {
            assert!(root.join(dir).is_dir(), "{} missing", dir);
        }
        for file in [
            "src/lib/theme/index.ts",
            "src/lib/utils/cn.ts",
            "src/lib/utils/colors.ts",
            "src/hooks/useTheme.ts",
            "src/lib/theme-context.tsx",
            "src/types/index.ts",
            "tsconfig.json",
            "metro.config.js",
            "babel.config.js",
            ".gitignore",
            "README.md",
            "App.tsx",
        ] {
            assert!(root.join(file).is_file(), "{} missing", file);
        }

        let calls = installer.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0.len(), 5);
        assert!(!calls[0].1);
        assert_eq!(
            calls[1].0,
            vec!["@types/react-native-vector-icons", "babel-plugin-module-resolver"]
        );
        assert!(calls[1].1);
    }

    #[test]
    fn test_setup_project_keeps_existing_tooling_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("tsconfig.json"), "{}").unwrap();
        fs::write(root.join("README.md"), "# mine").unwrap();
        fs::write(root.join("App.tsx"), "// old app").unwrap();

        setup_project(root, "shop", None).unwrap();

        assert_eq!(fs::read_to_string(root.join("tsconfig.json")).unwrap(), "{}");
        assert_eq!(fs::read_to_string(root.join("README.md")).unwrap(), "# mine");
        assert!(
            fs::read_to_string(root.join("App.tsx"))
                .unwrap()
                .contains("ThemeProvider")
        );
    }

    #[test]
    fn test_setup_project_install_failure_is_fatal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let installer = RecordingInstaller::failing();

        let result = setup_project(temp_dir.path(), "shop", Some(&installer));
        assert!(matches!(result, Err(Error::CommandFailed { .. })));
    }

    #[test]
    fn test_resolve_target_with_name() {
        let temp_dir = tempfile::tempdir().unwrap();
        let prompter = ScriptedPrompter::default();

        let target =
            resolve_target(temp_dir.path(), Some("shop".to_string()), false, &prompter).unwrap();

        assert_eq!(
            target,
            InitTarget::New {
                name: "shop".to_string(),
                root: temp_dir.path().join("shop"),
            }
        );
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn test_resolve_target_existing_package_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("package.json"), "{}").unwrap();

        let target =
            resolve_target(temp_dir.path(), None, false, &ScriptedPrompter::new(&[true], &[]))
                .unwrap();
        assert!(matches!(target, InitTarget::Existing { ref root, .. } if root == temp_dir.path()));

        let declined =
            resolve_target(temp_dir.path(), None, false, &ScriptedPrompter::new(&[false], &[]));
        assert!(matches!(declined, Err(Error::Aborted)));
    }

    #[test]
    fn test_resolve_target_prompts_for_name() {
        let temp_dir = tempfile::tempdir().unwrap();

        let target =
            resolve_target(temp_dir.path(), None, false, &ScriptedPrompter::new(&[], &["app"]))
                .unwrap();
        assert_eq!(target.name(), "app");

        let empty =
            resolve_target(temp_dir.path(), None, false, &ScriptedPrompter::new(&[], &["  "]));
        assert!(matches!(empty, Err(Error::ProjectNameRequired)));
    }

    #[test]
    fn test_resolve_target_existing_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("shop")).unwrap();

        let declined = resolve_target(
            temp_dir.path(),
            Some("shop".to_string()),
            false,
            &ScriptedPrompter::new(&[false], &[]),
        );
        assert!(matches!(declined, Err(Error::Aborted)));

        // --overwrite skips the question
        let prompter = ScriptedPrompter::default();
        let target =
            resolve_target(temp_dir.path(), Some("shop".to_string()), true, &prompter).unwrap();
        assert_eq!(target.root(), temp_dir.path().join("shop"));
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn test_create_expo_project_command() {
        let temp_dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::default();

        create_expo_project(temp_dir.path(), "shop", &runner).unwrap();

        assert_eq!(
            runner.rendered(),
            vec!["npx create-expo-app@latest shop --template blank-typescript"]
        );
        assert_eq!(runner.commands()[0].cwd, temp_dir.path());
    }

    #[test]
    fn test_create_expo_project_failure() {
        let temp_dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::failing(&["npx create-expo-app"]);

        let result = create_expo_project(temp_dir.path(), "shop", &runner);
        assert!(matches!(result, Err(Error::CommandFailed { .. })));
    }
}
