mod package_json;
mod process;

pub use package_json::{
    PackageJsonUpdate, installed_version, is_package_installed, update_package_json,
};
pub use process::{CommandRunner, ShellCommand, SystemRunner};

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::Result;

/// Lockfiles in detection priority order.
const LOCKFILES: [(&str, PackageManager); 3] = [
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("yarn.lock", PackageManager::Yarn),
    ("package-lock.json", PackageManager::Npm),
];

/// A JavaScript package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl PackageManager {
    pub fn as_str(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
        }
    }

    /// Detect the package manager from lockfiles in `dir`.
    ///
    /// Checks `pnpm-lock.yaml`, `yarn.lock`, `package-lock.json` in that
    /// order and falls back to npm.
    pub fn detect(dir: &Path) -> Self {
        for (file, manager) in LOCKFILES {
            if dir.join(file).exists() {
                debug!(lockfile = file, %manager, "detected package manager");
                return manager;
            }
        }
        PackageManager::Npm
    }

    /// Detect the package manager that launched this process from
    /// `npm_config_user_agent` (e.g. `pnpm/9.1.0 npm/? node/v20`).
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        match user_agent {
            Some(ua) if ua.starts_with("pnpm") => PackageManager::Pnpm,
            Some(ua) if ua.starts_with("yarn") => PackageManager::Yarn,
            Some(ua) if ua.starts_with("bun") => PackageManager::Bun,
            _ => PackageManager::Npm,
        }
    }

    /// Command adding `packages` as regular or dev dependencies.
    pub fn add_command(self, packages: &[String], dev: bool, cwd: &Path) -> ShellCommand {
        let cmd = ShellCommand::new(self.as_str(), cwd);
        let cmd = match (self, dev) {
            (PackageManager::Npm, false) => cmd.args(["install", "--save"]),
            (PackageManager::Npm, true) => cmd.args(["install", "--save-dev"]),
            (PackageManager::Yarn | PackageManager::Bun, false) => cmd.arg("add"),
            (PackageManager::Yarn | PackageManager::Bun, true) => cmd.args(["add", "--dev"]),
            (PackageManager::Pnpm, false) => cmd.arg("add"),
            (PackageManager::Pnpm, true) => cmd.args(["add", "--save-dev"]),
        };
        cmd.args(packages.iter().cloned())
    }

    /// Command installing everything declared in `package.json`.
    pub fn install_all_command(self, cwd: &Path) -> ShellCommand {
        ShellCommand::new(self.as_str(), cwd).arg("install")
    }

    /// How a user runs a `package.json` script with this manager.
    pub fn run_script(self, script: &str) -> String {
        match self {
            PackageManager::Npm => format!("npm run {}", script),
            other => format!("{} {}", other.as_str(), script),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Installs packages into a project.
pub trait Installer {
    /// Install `packages` in one batch. An empty list is a no-op.
    fn install(&self, packages: &[String], dev: bool) -> Result<()>;
}

/// Installs packages by running the project's package manager.
pub struct PackageManagerInstaller<'a> {
    cwd: PathBuf,
    package_manager: Option<PackageManager>,
    runner: &'a dyn CommandRunner,
}

impl<'a> PackageManagerInstaller<'a> {
    /// An explicit `package_manager` wins over lockfile detection.
    pub fn new(
        cwd: impl Into<PathBuf>,
        package_manager: Option<PackageManager>,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            cwd: cwd.into(),
            package_manager,
            runner,
        }
    }

    pub fn package_manager(&self) -> PackageManager {
        self.package_manager
            .unwrap_or_else(|| PackageManager::detect(&self.cwd))
    }
}

impl Installer for PackageManagerInstaller<'_> {
    #[instrument(skip(self), fields(cwd = %self.cwd.display()))]
    fn install(&self, packages: &[String], dev: bool) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }

        let command = self.package_manager().add_command(packages, dev, &self.cwd);
        println!(
            "Installing {}dependencies: {}",
            if dev { "dev " } else { "" },
            packages.join(", ")
        );
        self.runner.run(&command)?;
        println!("{}ependencies installed", if dev { "Dev d" } else { "D" });
        Ok(())
    }
}
