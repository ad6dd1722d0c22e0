use rustc_hash::FxHashSet;
use std::path::Path;
use tracing::debug;

use crate::Result;
use crate::config::{Config, load_config};
use crate::layout::ProjectLayout;
use crate::registry::ComponentRegistry;

/// List registry components and mark the installed ones.
pub fn run(cwd: &Path, registry: &ComponentRegistry) -> Result<()> {
    debug!(source = ?registry.source(), "using registry");
    let config = load_config(&ProjectLayout::new(cwd));
    let installed = installed_components(cwd, config.as_ref(), registry);
    print!("{}", render(registry, &installed));
    Ok(())
}

/// Names of components with at least one file under the components
/// directory. Without a config nothing is installed.
pub fn installed_components<'a>(
    root: &Path,
    config: Option<&Config>,
    registry: &'a ComponentRegistry,
) -> FxHashSet<&'a str> {
    let Some(config) = config else {
        return FxHashSet::default();
    };
    let components_dir = config.components_dir(root);

    registry
        .iter()
        .filter(|(_, entry)| entry.is_installed_in(&components_dir))
        .map(|(name, _)| name)
        .collect()
}

fn render(registry: &ComponentRegistry, installed: &FxHashSet<&str>) -> String {
    let width = registry.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let mut out = String::from("Available components:\n\n");

    for (name, entry) in registry.iter() {
        let marker = if installed.contains(name) { "[x]" } else { "[ ]" };
        let deps = if entry.dependencies.is_empty() {
            String::new()
        } else {
            format!(" (deps: {})", entry.dependencies.join(", "))
        };
        out.push_str(&format!(
            "{} {:<width$} - {}{}\n",
            marker,
            name,
            entry.name,
            deps,
            width = width
        ));
    }

    out.push_str(&format!("\nTotal: {} components\n", registry.len()));
    out.push_str(&format!("Installed: {} components\n", installed.len()));
    if installed.is_empty() {
        out.push_str("\nAdd your first component with: bna add button\n");
    }
    out
}
