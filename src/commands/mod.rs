//! Program steps.
//! A template program is an ordered list of commands; each command reads the
//! template and writes to the output directory or to the collected variables.
use crate::error::{Error, Result};
use crate::loader::Template;
use crate::prompt::Prompter;
use crate::renderer::TemplateRenderer;
use crate::variables::Variables;
use log::debug;
use serde_json::Value;
use std::fmt;
use std::path::Path;

pub mod copy;
pub mod prompt;
pub mod run;

pub use copy::CopyCommand;
pub use prompt::PromptCommand;
pub use run::RunCommand;

/// State shared by the commands of one run.
pub struct Context<'a> {
    pub variables: Variables,
    pub prompter: &'a dyn Prompter,
    pub renderer: &'a dyn TemplateRenderer,
}

impl<'a> Context<'a> {
    pub fn new(prompter: &'a dyn Prompter, renderer: &'a dyn TemplateRenderer) -> Self {
        Self { variables: Variables::new(), prompter, renderer }
    }

    /// Renders `template` against the variables collected so far.
    pub fn render(&self, template: &str) -> Result<String> {
        self.renderer.render(template, &self.variables.to_context())
    }
}

/// A built-in command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(RunCommand),
    Copy(CopyCommand),
    Prompt(PromptCommand),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Run(_) => "run",
            Command::Copy(_) => "copy",
            Command::Prompt(_) => "prompt",
        }
    }

    pub fn execute(&self, template: &Template, output: &Path, context: &mut Context) -> Result<()> {
        match self {
            Command::Run(command) => command.execute(template, output, context),
            Command::Copy(command) => command.execute(template, output, context),
            Command::Prompt(command) => command.execute(template, output, context),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Run(command) => write!(f, "run(\"{}\")", command.command()),
            Command::Copy(command) => write!(f, "copy(\"{}\")", command.source()),
            Command::Prompt(command) => match command.questions() {
                Some(_) => write!(f, "prompt(...)"),
                None => write!(f, "prompt()"),
            },
        }
    }
}

/// An element of a program as written in the settings.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramStep {
    Command(Command),
    /// An element that does not name a known command or has malformed arguments
    Unsupported(Value),
}

/// Builds a command from its optional settings arguments.
pub type Constructor = fn(Option<Value>) -> Result<Command>;

fn build_run(args: Option<Value>) -> Result<Command> {
    RunCommand::from_args(args).map(Command::Run)
}

fn build_copy(args: Option<Value>) -> Result<Command> {
    CopyCommand::from_args(args).map(Command::Copy)
}

fn build_prompt(args: Option<Value>) -> Result<Command> {
    PromptCommand::from_args(args).map(Command::Prompt)
}

/// Commands addressable by name from the settings.
pub const COMMANDS: [(&str, Constructor); 3] =
    [("run", build_run), ("copy", build_copy), ("prompt", build_prompt)];

pub fn lookup(name: &str) -> Option<Constructor> {
    COMMANDS.iter().find(|(n, _)| *n == name).map(|(_, constructor)| *constructor)
}

fn construct(name: &str, args: Option<Value>) -> Result<Command> {
    let constructor = lookup(name)
        .ok_or_else(|| Error::ConfigError(format!("unknown command '{}'", name)))?;
    constructor(args)
}

/// Turns a settings program element into a step.
///
/// Accepted shapes are a bare command name (`"copy"`) or a single-key map
/// from command name to arguments (`{"run": "make"}`).
pub fn parse_step(value: Value) -> ProgramStep {
    let built = match &value {
        Value::String(name) => construct(name, None),
        Value::Object(map) if map.len() == 1 => match map.iter().next() {
            Some((name, args)) => construct(name, Some(args.clone())),
            None => Err(Error::ConfigError("empty program step".to_string())),
        },
        _ => Err(Error::ConfigError("a step is a command name or a single-key map".to_string())),
    };

    match built {
        Ok(command) => ProgramStep::Command(command),
        Err(e) => {
            debug!("Program step {} is not a command: {}", value, e);
            ProgramStep::Unsupported(value)
        }
    }
}

/// The program used when the settings do not define one: prompt, then copy.
pub fn default_program() -> Vec<ProgramStep> {
    vec![
        ProgramStep::Command(Command::Prompt(PromptCommand::default())),
        ProgramStep::Command(Command::Copy(CopyCommand::default())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup() {
        assert!(lookup("run").is_some());
        assert!(lookup("copy").is_some());
        assert!(lookup("prompt").is_some());
        assert!(lookup("deploy").is_none());
    }

    #[test]
    fn test_parse_step_shapes() {
        assert_eq!(
            parse_step(json!("copy")),
            ProgramStep::Command(Command::Copy(CopyCommand::default()))
        );
        assert_eq!(
            parse_step(json!({"copy": "skel"})),
            ProgramStep::Command(Command::Copy(CopyCommand::new("skel")))
        );
        assert_eq!(
            parse_step(json!({"run": "make"})),
            ProgramStep::Command(Command::Run(RunCommand::new("make")))
        );
    }

    #[test]
    fn test_parse_step_unsupported() {
        for value in [json!("run"), json!({"run": 3}), json!({"a": 1, "b": 2}), json!(7)] {
            assert_eq!(parse_step(value.clone()), ProgramStep::Unsupported(value));
        }
    }

    #[test]
    fn test_default_program_order() {
        let names: Vec<&str> = default_program()
            .iter()
            .map(|step| match step {
                ProgramStep::Command(command) => command.name(),
                ProgramStep::Unsupported(_) => "unsupported",
            })
            .collect();
        assert_eq!(names, vec!["prompt", "copy"]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Command::Run(RunCommand::new("ls")).to_string(), "run(\"ls\")");
        assert_eq!(Command::Copy(CopyCommand::default()).to_string(), "copy(\"files\")");
        assert_eq!(Command::Prompt(PromptCommand::default()).to_string(), "prompt()");
    }
}
