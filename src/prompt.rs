use dialoguer::{Confirm, Error as DialoguerError, Input};
use std::io::ErrorKind;

use crate::{Error, Result};

/// Interactive questions asked by `init` and `convex`.
pub trait Prompter {
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;

    /// Ask for a line of text; an empty answer yields `default`.
    fn input(&self, message: &str, default: &str) -> Result<String>;
}

/// Prompts on the controlling terminal. Ctrl-C maps to [`Error::Aborted`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact()
            .map_err(map_prompt_error)
    }

    fn input(&self, message: &str, default: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(message)
            .default(default.to_string())
            .interact_text()
            .map_err(map_prompt_error)
    }
}

fn map_prompt_error(err: DialoguerError) -> Error {
    match err {
        DialoguerError::IO(e) if e.kind() == ErrorKind::Interrupted => Error::Aborted,
        other => Error::Prompt(other),
    }
}
