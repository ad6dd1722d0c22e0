mod project;
mod settings;

pub use project::{Config, load_config};
pub use settings::{SETTINGS_FILENAME, Settings};
