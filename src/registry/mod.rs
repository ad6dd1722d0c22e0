mod builtin;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{Error, Result, fs_ops};

const BUNDLED_REGISTRY: &str = include_str!("../../templates/components/registry.json");

/// One file a component installs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Target path relative to the configured components directory.
    pub path: String,
    /// Template id selecting the generated content.
    pub template: String,
}

/// A registry entry: display name, files and npm dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentEntry {
    pub name: String,
    pub files: Vec<FileDescriptor>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub dev_dependencies: Vec<String>,
}

impl ComponentEntry {
    /// A component counts as installed when any of its files exists.
    pub fn is_installed_in(&self, components_dir: &Path) -> bool {
        self.files
            .iter()
            .any(|file| fs_ops::exists(&components_dir.join(&file.path)))
    }
}

/// Where the registry in use came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrySource {
    File(PathBuf),
    /// `registry.json` compiled into the binary.
    Bundled,
    Builtin,
}

/// Component name to entry, sorted by name.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    entries: BTreeMap<String, ComponentEntry>,
    source: RegistrySource,
}

/// Dependency unions for a set of components, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    pub dependencies: Vec<String>,
    pub dev_dependencies: Vec<String>,
}

impl ComponentRegistry {
    /// Load the registry from `path` if given and readable, else the bundled
    /// `registry.json`, else the built-in table.
    pub fn load(path: Option<&Path>) -> Self {
        if let Some(path) = path {
            if fs_ops::exists(path) {
                match Self::from_file(path) {
                    Ok(registry) => return registry,
                    Err(e) => warn!("could not load registry, using bundled components: {}", e),
                }
            } else {
                warn!(path = %path.display(), "registry file not found, using bundled components");
            }
        }

        match Self::bundled() {
            Ok(registry) => registry,
            Err(e) => {
                warn!("bundled registry is invalid, using built-in components: {}", e);
                Self::builtin()
            }
        }
    }

    fn bundled() -> serde_json::Result<Self> {
        let entries: BTreeMap<String, ComponentEntry> = serde_json::from_str(BUNDLED_REGISTRY)?;
        debug!(count = entries.len(), "loaded bundled registry");
        Ok(Self {
            entries,
            source: RegistrySource::Bundled,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let entries: BTreeMap<String, ComponentEntry> = fs_ops::read_json(path)?;
        debug!(path = %path.display(), count = entries.len(), "loaded registry");
        Ok(Self {
            entries,
            source: RegistrySource::File(path.to_path_buf()),
        })
    }

    pub fn builtin() -> Self {
        Self {
            entries: builtin::entries(),
            source: RegistrySource::Builtin,
        }
    }

    pub fn from_entries(entries: BTreeMap<String, ComponentEntry>) -> Self {
        Self {
            entries,
            source: RegistrySource::Builtin,
        }
    }

    pub fn source(&self) -> &RegistrySource {
        &self.source
    }

    pub fn get(&self, name: &str) -> Option<&ComponentEntry> {
        self.entries.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ComponentEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up every requested name. Fails listing all unknown names if any
    /// is missing. Repeated names are kept once, in request order.
    pub fn resolve<'a>(&'a self, names: &[String]) -> Result<Vec<(&'a str, &'a ComponentEntry)>> {
        let mut seen = FxHashSet::default();
        let mut found = Vec::new();
        let mut unknown = Vec::new();

        for name in names {
            match self.entries.get_key_value(name.as_str()) {
                Some((key, entry)) => {
                    if seen.insert(key.as_str()) {
                        found.push((key.as_str(), entry));
                    }
                }
                None => {
                    if !unknown.contains(name) {
                        unknown.push(name.clone());
                    }
                }
            }
        }

        if !unknown.is_empty() {
            return Err(Error::UnknownComponents {
                unknown,
                available: self.names(),
            });
        }
        Ok(found)
    }
}

/// Union of runtime and dev dependencies across `components`, deduplicated.
pub fn collect_dependencies(components: &[(&str, &ComponentEntry)]) -> DependencySet {
    fn union<'a>(lists: impl Iterator<Item = &'a Vec<String>>) -> Vec<String> {
        let mut seen = FxHashSet::default();
        lists
            .flatten()
            .filter(|dep| seen.insert(*dep))
            .cloned()
            .collect()
    }

    DependencySet {
        dependencies: union(components.iter().map(|(_, e)| &e.dependencies)),
        dev_dependencies: union(components.iter().map(|(_, e)| &e.dev_dependencies)),
    }
}
