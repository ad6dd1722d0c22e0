//! Read-modify-write helpers for a host project's `package.json`.
//!
//! No locking: concurrent invocations against one project are unsupported.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

use crate::{Error, Result, fs_ops};

const DEPENDENCY_SECTIONS: [&str; 3] = ["dependencies", "devDependencies", "peerDependencies"];

/// Entries merged into `package.json` by [`update_package_json`].
#[derive(Debug, Clone, Default)]
pub struct PackageJsonUpdate {
    pub name: Option<String>,
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
    pub scripts: BTreeMap<String, String>,
}

/// Whether `package` appears in any dependency section.
pub fn is_package_installed(package_json: &Path, package: &str) -> bool {
    installed_version(package_json, package).is_some()
}

/// The version range declared for `package`, if any. Unreadable or missing
/// manifests count as "not installed".
pub fn installed_version(package_json: &Path, package: &str) -> Option<String> {
    if !fs_ops::exists(package_json) {
        return None;
    }
    let manifest: Value = fs_ops::read_json(package_json).ok()?;

    DEPENDENCY_SECTIONS.iter().find_map(|section| {
        manifest
            .get(section)
            .and_then(|deps| deps.get(package))
            .and_then(Value::as_str)
            .map(str::to_string)
    })
}

/// Shallow-merge `update` into the manifest, keeping existing key order.
pub fn update_package_json(package_json: &Path, update: &PackageJsonUpdate) -> Result<()> {
    let mut manifest: Value = fs_ops::read_json(package_json)?;
    let root = manifest.as_object_mut().ok_or_else(|| Error::JsonShape {
        path: package_json.to_path_buf(),
        reason: "top level is not an object".to_string(),
    })?;

    if let Some(name) = &update.name {
        root.insert("name".to_string(), Value::String(name.clone()));
    }

    let sections = [
        ("dependencies", &update.dependencies),
        ("devDependencies", &update.dev_dependencies),
        ("scripts", &update.scripts),
    ];
    for (key, entries) in sections {
        if entries.is_empty() {
            continue;
        }
        let section = root
            .entry(key)
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(section) = section.as_object_mut() else {
            return Err(Error::JsonShape {
                path: package_json.to_path_buf(),
                reason: format!("\"{}\" is not an object", key),
            });
        };
        for (k, v) in entries {
            section.insert(k.clone(), Value::String(v.clone()));
        }
    }

    fs_ops::write_json(package_json, &manifest)
}
