//! Program execution.
//! The runner resolves the program of a template and executes its steps in order.

use crate::commands::{default_program, Context, ProgramStep};
use crate::error::Result;
use crate::loader::Template;
use log::{debug, error};
use std::fs;
use std::path::Path;

/// Executes the program of one template.
pub struct Runner<'a> {
    template: &'a Template,
}

impl<'a> Runner<'a> {
    pub fn new(template: &'a Template) -> Self {
        Self { template }
    }

    /// Runs the program against `output`.
    ///
    /// The program is the `program` of the settings when present and not
    /// empty, the default prompt-then-copy program otherwise. Unsupported
    /// steps are reported and skipped; a failing command stops the run.
    ///
    /// # Errors
    /// * `Error::SettingsParseError` if the settings cannot be loaded
    /// * Any error returned by a command, e.g. `Error::CommandFailure`
    pub fn run(&self, output: &Path, context: &mut Context) -> Result<()> {
        let settings = self.template.settings()?;
        let default;
        let program: &[ProgramStep] = match &settings.program {
            Some(program) if !program.is_empty() => program.as_slice(),
            _ => {
                debug!("Using the default program.");
                default = default_program();
                default.as_slice()
            }
        };

        if !output.exists() {
            debug!("Creating output directory '{}'.", output.display());
            fs::create_dir_all(output)?;
        }

        for step in program {
            match step {
                ProgramStep::Command(command) => {
                    debug!("New program command: {}", command);
                    command.execute(self.template, output, context)?;
                }
                ProgramStep::Unsupported(value) => {
                    error!("Unsupported command: {}", value);
                }
            }
        }
        Ok(())
    }
}
