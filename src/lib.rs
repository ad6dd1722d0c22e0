pub mod cli;
pub mod config;
pub mod fs_ops;
pub mod installer;
pub mod layout;
pub mod prompt;
pub mod registry;
pub mod templates;

#[cfg(test)]
pub(crate) mod testing;

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Config errors
    #[error("no bna.json found (run 'bna init' first)")]
    NoConfig,

    #[error("failed to parse settings: {0}")]
    SettingsParse(String),

    // Registry errors
    #[error(
        "components not found: {}\navailable components: {}",
        .unknown.join(", "),
        .available.join(", ")
    )]
    UnknownComponents {
        unknown: Vec<String>,
        available: Vec<String>,
    },

    #[error("components already exist: {} (use --overwrite to replace them)", .0.join(", "))]
    ComponentsExist(Vec<String>),

    // Project errors
    #[error("project name is required")]
    ProjectNameRequired,

    #[error("invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("directory {0} already exists and is not empty")]
    DirectoryNotEmpty(PathBuf),

    #[error("template directory not found at {0}")]
    TemplateNotFound(PathBuf),

    #[error("operation aborted by user")]
    Aborted,

    #[error("prompt failed: {0}")]
    Prompt(#[source] dialoguer::Error),

    // Filesystem errors
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy {from} to {to}: {source}")]
    FileCopy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON in {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected JSON in {path}: {reason}")]
    JsonShape { path: PathBuf, reason: String },

    // Subprocess errors
    #[error("failed to run `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {}", .code.map_or_else(|| "a signal".to_string(), |c| format!("status {}", c)))]
    CommandFailed { command: String, code: Option<i32> },
}
