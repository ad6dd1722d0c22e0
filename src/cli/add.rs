use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{Config, load_config};
use crate::installer::{Installer, PackageManager, PackageManagerInstaller, SystemRunner};
use crate::layout::ProjectLayout;
use crate::registry::{ComponentEntry, ComponentRegistry, collect_dependencies};
use crate::{Error, Result, fs_ops, templates};

/// What an `add` run changed.
#[derive(Debug, Default)]
pub struct AddReport {
    pub added: Vec<String>,
    pub files: Vec<PathBuf>,
    pub dependencies: Vec<String>,
    pub dev_dependencies: Vec<String>,
}

/// Add components to the project in `cwd`.
pub fn run(
    cwd: &Path,
    registry: &ComponentRegistry,
    components: Vec<String>,
    all: bool,
    overwrite: bool,
    package_manager: Option<PackageManager>,
) -> Result<()> {
    let layout = ProjectLayout::new(cwd);
    let config = load_config(&layout).ok_or(Error::NoConfig)?;

    let requested = requested_components(all, components, registry);
    if all {
        println!("Adding all components: {}", requested.join(", "));
    }

    let runner = SystemRunner;
    let installer = PackageManagerInstaller::new(cwd, package_manager, &runner);
    let report = add_components(cwd, &config, registry, &requested, overwrite, &installer)?;

    println!();
    println!("Added {} component(s): {}", report.added.len(), report.added.join(", "));
    if !report.dependencies.is_empty() {
        println!("Dependencies: {}", report.dependencies.join(", "));
    }
    if !report.dev_dependencies.is_empty() {
        println!("Dev dependencies: {}", report.dev_dependencies.join(", "));
    }
    Ok(())
}

/// The names an `add` run works on: every registry key (sorted) with
/// `--all`, otherwise the names given.
pub fn requested_components(
    all: bool,
    components: Vec<String>,
    registry: &ComponentRegistry,
) -> Vec<String> {
    if all { registry.names() } else { components }
}

/// Validate, gate, install dependencies for, and write `names`.
///
/// Nothing is installed or written unless every name is known and, without
/// `overwrite`, none of the components has a file on disk already.
pub fn add_components(
    root: &Path,
    config: &Config,
    registry: &ComponentRegistry,
    names: &[String],
    overwrite: bool,
    installer: &dyn Installer,
) -> Result<AddReport> {
    debug!(source = ?registry.source(), "using registry");
    let components = registry.resolve(names)?;
    let components_dir = config.components_dir(root);

    if !overwrite {
        let existing: Vec<String> = components
            .iter()
            .filter(|(_, entry)| entry.is_installed_in(&components_dir))
            .map(|(name, _)| name.to_string())
            .collect();
        if !existing.is_empty() {
            return Err(Error::ComponentsExist(existing));
        }
    }

    let deps = collect_dependencies(&components);
    debug!(?deps, "dependency union");
    installer.install(&deps.dependencies, false)?;
    installer.install(&deps.dev_dependencies, true)?;

    let mut report = AddReport {
        dependencies: deps.dependencies,
        dev_dependencies: deps.dev_dependencies,
        ..Default::default()
    };

    for (name, entry) in components {
        println!("Adding {}...", name);
        let written = write_component(root, config, entry)?;
        report.files.extend(written);
        report.added.push(name.to_string());
    }

    Ok(report)
}

fn write_component(root: &Path, config: &Config, entry: &ComponentEntry) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(entry.files.len());
    for file in &entry.files {
        let target = config.component_path(root, &file.path);
        let content = templates::render(&file.template, &entry.name);
        fs_ops::write(&target, &content)?;
        written.push(target);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FileDescriptor;
    use crate::testing::RecordingInstaller;
    use std::collections::BTreeMap;
    use std::fs;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn component(name: &str, path: &str, deps: &[&str], dev: &[&str]) -> ComponentEntry {
        ComponentEntry {
            name: name.to_string(),
            files: vec![FileDescriptor {
                path: path.to_string(),
                template: format!("{}.template.tsx", name.to_lowercase()),
            }],
            dependencies: names(deps),
            dev_dependencies: names(dev),
        }
    }

    fn registry() -> ComponentRegistry {
        let mut entries = BTreeMap::new();
        entries.insert("button".to_string(), component("Button", "ui/button.tsx", &[], &[]));
        entries.insert(
            "modal".to_string(),
            component(
                "Modal",
                "ui/modal.tsx",
                &["react-native-reanimated", "react-native-gesture-handler"],
                &[],
            ),
        );
        entries.insert(
            "spinner".to_string(),
            component("Spinner", "ui/spinner.tsx", &["react-native-reanimated"], &[]),
        );
        entries.insert(
            "calendar".to_string(),
            component("Calendar", "ui/calendar.tsx", &[], &["@types/calendar"]),
        );
        ComponentRegistry::from_entries(entries)
    }

    fn sorted(mut v: Vec<String>) -> Vec<String> {
        v.sort();
        v
    }

    #[test]
    fn test_add_button_and_modal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        let installer = RecordingInstaller::default();

        let report = add_components(
            root,
            &Config::default(),
            &registry(),
            &names(&["button", "modal"]),
            false,
            &installer,
        )
        .unwrap();

        let calls = installer.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            sorted(calls[0].0.clone()),
            vec!["react-native-gesture-handler", "react-native-reanimated"]
        );
        assert!(!calls[0].1);

        assert_eq!(report.files.len(), 2);
        let button = root.join("src/components/ui/button.tsx");
        let modal = root.join("src/components/ui/modal.tsx");
        assert!(fs::read_to_string(&button).unwrap().contains("export function Button("));
        assert!(fs::read_to_string(&modal).unwrap().contains("export function CustomModal("));
    }

    #[test]
    fn test_unknown_component_rejects_whole_batch() {
        let temp_dir = tempfile::tempdir().unwrap();
        let installer = RecordingInstaller::default();

        let err = add_components(
            temp_dir.path(),
            &Config::default(),
            &registry(),
            &names(&["foo", "button"]),
            false,
            &installer,
        )
        .unwrap_err();

        match err {
            Error::UnknownComponents { unknown, available } => {
                assert_eq!(unknown, vec!["foo"]);
                assert_eq!(available, vec!["button", "calendar", "modal", "spinner"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(installer.calls().is_empty());
        assert!(!temp_dir.path().join("src").exists());
    }

    #[test]
    fn test_existing_component_blocks_everything() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        let existing = root.join("src/components/ui/modal.tsx");
        fs::create_dir_all(existing.parent().unwrap()).unwrap();
        fs::write(&existing, "// mine").unwrap();
        let installer = RecordingInstaller::default();

        let err = add_components(
            root,
            &Config::default(),
            &registry(),
            &names(&["button", "modal"]),
            false,
            &installer,
        )
        .unwrap_err();

        assert!(matches!(err, Error::ComponentsExist(ref names) if names == &["modal"]));
        assert!(installer.calls().is_empty());
        assert!(!root.join("src/components/ui/button.tsx").exists());
        assert_eq!(fs::read_to_string(&existing).unwrap(), "// mine");
    }

    #[test]
    fn test_overwrite_replaces_existing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        let existing = root.join("src/components/ui/button.tsx");
        fs::create_dir_all(existing.parent().unwrap()).unwrap();
        fs::write(&existing, "// old").unwrap();
        let installer = RecordingInstaller::default();

        add_components(
            root,
            &Config::default(),
            &registry(),
            &names(&["button"]),
            true,
            &installer,
        )
        .unwrap();

        assert!(fs::read_to_string(&existing).unwrap().contains("export function Button("));
        // button has no dependencies
        assert!(installer.calls().is_empty());
    }

    #[test]
    fn test_dependency_union_is_deduplicated_and_split() {
        let temp_dir = tempfile::tempdir().unwrap();
        let installer = RecordingInstaller::default();

        let report = add_components(
            temp_dir.path(),
            &Config::default(),
            &registry(),
            &names(&["spinner", "modal", "calendar"]),
            false,
            &installer,
        )
        .unwrap();

        let calls = installer.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0],
            (
                names(&["react-native-reanimated", "react-native-gesture-handler"]),
                false
            )
        );
        assert_eq!(calls[1], (names(&["@types/calendar"]), true));
        assert_eq!(report.added, vec!["spinner", "modal", "calendar"]);
    }

    #[test]
    fn test_all_is_every_registry_key() {
        let temp_dir = tempfile::tempdir().unwrap();
        let registry = registry();
        let installer = RecordingInstaller::default();

        // explicit names are ignored with --all
        let requested = requested_components(true, names(&["spinner", "button"]), &registry);
        assert_eq!(requested, vec!["button", "calendar", "modal", "spinner"]);

        let report = add_components(
            temp_dir.path(),
            &Config::default(),
            &registry,
            &requested,
            false,
            &installer,
        )
        .unwrap();

        assert_eq!(report.added, vec!["button", "calendar", "modal", "spinner"]);
        assert_eq!(report.files.len(), 4);
    }

    #[test]
    fn test_requested_without_all_keeps_names() {
        let requested = requested_components(false, names(&["modal", "button"]), &registry());
        assert_eq!(requested, vec!["modal", "button"]);
    }

    #[test]
    fn test_all_with_empty_registry_does_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let registry = ComponentRegistry::from_entries(BTreeMap::new());
        let installer = RecordingInstaller::default();

        let requested = requested_components(true, Vec::new(), &registry);
        assert!(requested.is_empty());

        let report = add_components(
            temp_dir.path(),
            &Config::default(),
            &registry,
            &requested,
            false,
            &installer,
        )
        .unwrap();

        assert!(report.added.is_empty());
        assert!(report.files.is_empty());
        assert!(installer.calls().is_empty());
        assert!(!temp_dir.path().join("src").exists());
    }

    #[test]
    fn test_canned_source_written_verbatim() {
        let temp_dir = tempfile::tempdir().unwrap();

        add_components(
            temp_dir.path(),
            &Config::default(),
            &registry(),
            &names(&["modal"]),
            false,
            &RecordingInstaller::default(),
        )
        .unwrap();

        let written =
            fs::read_to_string(temp_dir.path().join("src/components/ui/modal.tsx")).unwrap();
        assert_eq!(written, templates::render("modal.template.tsx", "Modal"));
    }

    #[test]
    fn test_unknown_template_writes_stub() {
        let temp_dir = tempfile::tempdir().unwrap();
        let installer = RecordingInstaller::default();

        add_components(
            temp_dir.path(),
            &Config::default(),
            &registry(),
            &names(&["calendar"]),
            false,
            &installer,
        )
        .unwrap();

        let content =
            fs::read_to_string(temp_dir.path().join("src/components/ui/calendar.tsx")).unwrap();
        assert!(content.contains("export function Calendar("));
    }

    #[test]
    fn test_custom_components_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config {
            components: "app/ui-kit".to_string(),
            ..Config::default()
        };

        add_components(
            temp_dir.path(),
            &config,
            &registry(),
            &names(&["button"]),
            false,
            &RecordingInstaller::default(),
        )
        .unwrap();

        assert!(temp_dir.path().join("app/ui-kit/ui/button.tsx").exists());
    }

    #[test]
    fn test_install_failure_writes_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let installer = RecordingInstaller::failing();

        let result = add_components(
            temp_dir.path(),
            &Config::default(),
            &registry(),
            &names(&["modal"]),
            false,
            &installer,
        );

        assert!(matches!(result, Err(Error::CommandFailed { .. })));
        assert!(!temp_dir.path().join("src/components/ui/modal.tsx").exists());
    }

    #[test]
    fn test_write_failure_keeps_earlier_components() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        // A regular file where modal's directory should be
        let mut entries = BTreeMap::new();
        entries.insert("button".to_string(), component("Button", "ui/button.tsx", &[], &[]));
        entries.insert(
            "modal".to_string(),
            component("Modal", "blocked/modal.tsx", &[], &[]),
        );
        let registry = ComponentRegistry::from_entries(entries);
        fs::create_dir_all(root.join("src/components")).unwrap();
        fs::write(root.join("src/components/blocked"), "").unwrap();

        let result = add_components(
            root,
            &Config::default(),
            &registry,
            &names(&["button", "modal"]),
            false,
            &RecordingInstaller::default(),
        );

        assert!(matches!(result, Err(Error::FileWrite { .. })));
        assert!(root.join("src/components/ui/button.tsx").exists());
    }

    #[test]
    fn test_run_without_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = run(
            temp_dir.path(),
            &registry(),
            names(&["button"]),
            false,
            false,
            None,
        );
        assert!(matches!(result, Err(Error::NoConfig)));
    }
}
