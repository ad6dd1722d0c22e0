//! Fakes for the subprocess, installer and prompt seams.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::installer::{CommandRunner, Installer, ShellCommand};
use crate::prompt::Prompter;
use crate::{Error, Result};

/// Records commands instead of running them. Commands whose rendering
/// starts with one of `fail_prefixes` fail with exit status 1.
#[derive(Default)]
pub struct RecordingRunner {
    fail_prefixes: Vec<String>,
    commands: RefCell<Vec<ShellCommand>>,
}

impl RecordingRunner {
    pub fn failing(prefixes: &[&str]) -> Self {
        Self {
            fail_prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
            commands: RefCell::default(),
        }
    }

    pub fn commands(&self) -> Vec<ShellCommand> {
        self.commands.borrow().clone()
    }

    pub fn rendered(&self) -> Vec<String> {
        self.commands.borrow().iter().map(|c| c.to_string()).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &ShellCommand) -> Result<()> {
        self.commands.borrow_mut().push(command.clone());
        let rendered = command.to_string();
        if self.fail_prefixes.iter().any(|p| rendered.starts_with(p)) {
            return Err(Error::CommandFailed {
                command: rendered,
                code: Some(1),
            });
        }
        Ok(())
    }
}

/// Records install batches as `(packages, dev)`.
#[derive(Default)]
pub struct RecordingInstaller {
    fail: bool,
    calls: RefCell<Vec<(Vec<String>, bool)>>,
}

impl RecordingInstaller {
    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: RefCell::default(),
        }
    }

    pub fn calls(&self) -> Vec<(Vec<String>, bool)> {
        self.calls.borrow().clone()
    }
}

impl Installer for RecordingInstaller {
    fn install(&self, packages: &[String], dev: bool) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }
        self.calls.borrow_mut().push((packages.to_vec(), dev));
        if self.fail {
            return Err(Error::CommandFailed {
                command: "install".to_string(),
                code: Some(1),
            });
        }
        Ok(())
    }
}

/// Answers prompts from queues. Running out of answers aborts.
#[derive(Default)]
pub struct ScriptedPrompter {
    confirms: RefCell<VecDeque<bool>>,
    inputs: RefCell<VecDeque<String>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(confirms: &[bool], inputs: &[&str]) -> Self {
        Self {
            confirms: RefCell::new(confirms.iter().copied().collect()),
            inputs: RefCell::new(inputs.iter().map(|s| s.to_string()).collect()),
            asked: RefCell::default(),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, message: &str, _default: bool) -> Result<bool> {
        self.asked.borrow_mut().push(message.to_string());
        self.confirms.borrow_mut().pop_front().ok_or(Error::Aborted)
    }

    fn input(&self, message: &str, _default: &str) -> Result<String> {
        self.asked.borrow_mut().push(message.to_string());
        self.inputs.borrow_mut().pop_front().ok_or(Error::Aborted)
    }
}
