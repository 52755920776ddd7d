use super::Context;
use crate::error::{Error, Result};
use crate::loader::Template;
use log::{debug, info};
use serde_json::Value;
use std::path::Path;
use std::process::{Command, Stdio};

/// Runs a shell command inside the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCommand {
    command: String,
}

impl RunCommand {
    pub fn new<S: Into<String>>(command: S) -> Self {
        Self { command: command.into() }
    }

    pub fn from_args(args: Option<Value>) -> Result<Self> {
        match args {
            Some(Value::String(command)) => Ok(Self::new(command)),
            _ => Err(Error::ConfigError("run expects a shell command string".to_string())),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Runs the command, rendered against the collected variables.
    ///
    /// # Errors
    /// * `Error::CommandFailure` if the command exits unsuccessfully
    pub fn execute(&self, _template: &Template, output: &Path, context: &mut Context) -> Result<()> {
        let command = context.render(&self.command)?;
        info!("Running '{}' in '{}'.", command, output.display());

        let status = shell(&command)
            .current_dir(output)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;

        debug!("'{}' finished with {}.", command, status);
        if !status.success() {
            return Err(Error::CommandFailure { command, status });
        }
        Ok(())
    }
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut process = Command::new("sh");
    process.arg("-c").arg(command);
    process
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut process = Command::new("cmd");
    process.arg("/C").arg(command);
    process
}
