mod add;
mod convex;
mod init;
mod list;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::installer::PackageManager;
use crate::registry::ComponentRegistry;
use crate::{Error, Result};

#[derive(Parser)]
#[command(name = "bna")]
#[command(about = "UI component library CLI for Expo projects")]
#[command(version)]
pub struct Cli {
    /// Registry file to use instead of the bundled one
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new project with the UI library
    Init {
        /// Name of the project (prompted for when omitted)
        project_name: Option<String>,

        /// Use an existing directory without asking
        #[arg(short, long)]
        overwrite: bool,

        /// Skip installing the library's npm dependencies
        #[arg(long)]
        skip_install: bool,

        /// Package manager to install with
        #[arg(long, value_enum)]
        package_manager: Option<PackageManager>,
    },

    /// Add UI components to your project
    Add {
        /// Components to add
        #[arg(required_unless_present = "all")]
        components: Vec<String>,

        /// Add all components
        #[arg(short, long)]
        all: bool,

        /// Replace components whose files already exist
        #[arg(short, long)]
        overwrite: bool,

        /// Package manager to install with
        #[arg(long, value_enum)]
        package_manager: Option<PackageManager>,
    },

    /// List available components and whether they are installed
    List,

    /// Create an Expo project with a Convex backend
    Convex(convex::ConvexArgs),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let settings = Settings::load()?;
        let cwd = current_dir()?;
        let registry_path = self.registry.or_else(|| settings.registry.clone());

        match self.command {
            Commands::Init {
                project_name,
                overwrite,
                skip_install,
                package_manager,
            } => init::run(
                &cwd,
                project_name,
                overwrite,
                skip_install,
                package_manager.or(settings.package_manager),
            ),
            Commands::Add {
                components,
                all,
                overwrite,
                package_manager,
            } => {
                let registry = ComponentRegistry::load(registry_path.as_deref());
                add::run(
                    &cwd,
                    &registry,
                    components,
                    all,
                    overwrite,
                    package_manager.or(settings.package_manager),
                )
            }
            Commands::List => {
                let registry = ComponentRegistry::load(registry_path.as_deref());
                list::run(&cwd, &registry)
            }
            Commands::Convex(args) => convex::run(&cwd, args),
        }
    }
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| Error::FileRead {
        path: PathBuf::from("."),
        source: e,
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
