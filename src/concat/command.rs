//! External process invocation.

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::process::Command;

/// A program and its arguments, run without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self { program: program.into(), args: Vec::new() }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Exit status and captured stderr of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external commands to completion.
pub trait CommandRunner {
    /// Run `command` and wait for it.
    ///
    /// # Errors
    /// Returns an error only if the process could not be started; a non-zero
    /// exit is reported through [`CommandOutput::code`].
    fn run(&self, command: &ExternalCommand) -> io::Result<CommandOutput>;
}

/// Runs commands as child processes of this one.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ExternalCommand) -> io::Result<CommandOutput> {
        let output = Command::new(&command.program).args(&command.args).output()?;
        Ok(CommandOutput { code: output.status.code(), stderr: String::from_utf8_lossy(&output.stderr).into_owned() })
    }
}
