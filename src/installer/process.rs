use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, instrument};

use crate::{Error, Result};

/// An external program invocation: program, arguments, working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl ShellCommand {
    pub fn new(program: impl Into<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs external commands to completion.
pub trait CommandRunner {
    fn run(&self, command: &ShellCommand) -> Result<()>;
}

/// Runs commands as child processes sharing this terminal.
///
/// Blocks until the child exits; there is no timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    #[instrument(skip(self), fields(command = %command, cwd = %command.cwd.display()))]
    fn run(&self, command: &ShellCommand) -> Result<()> {
        debug!("spawning");

        // npm, npx and friends are .cmd shims on Windows
        let mut child = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&command.program);
            c
        } else {
            Command::new(&command.program)
        };

        let status = child
            .args(&command.args)
            .current_dir(&command.cwd)
            .status()
            .map_err(|e| Error::CommandSpawn {
                command: command.to_string(),
                source: e,
            })?;

        debug!(%status, "command finished");
        if status.success() {
            Ok(())
        } else {
            Err(Error::CommandFailed {
                command: command.to_string(),
                code: status.code(),
            })
        }
    }
}
