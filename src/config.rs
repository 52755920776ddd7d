//! Settings, question and metadata documents of a template.
//! Every document may be written as JSON or YAML; JSON is tried first.

use crate::commands::{parse_step, ProgramStep};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// The kind of answer a question expects.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    #[default]
    Text,
    Password,
    Confirm,
    List,
    Checkbox,
}

/// A single question asked by the prompt command.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Question {
    /// Variable the answer is stored under
    pub name: String,
    /// Text shown to the user; may reference earlier answers
    #[serde(alias = "prompt", alias = "help")]
    pub message: String,
    #[serde(default, alias = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub default: Option<Value>,
    /// Options for `list` and `checkbox` questions
    #[serde(default)]
    pub choices: Vec<String>,
}

/// Where the questions of a prompt come from.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum QuestionSpec {
    /// Path of a question file inside the template
    File(String),
    Inline(Vec<Question>),
}

/// Parsed settings of a template.
#[derive(Debug, Default)]
pub struct Settings {
    /// Explicit program; `None` when the settings do not define one
    pub program: Option<Vec<ProgramStep>>,
    pub questions: Option<QuestionSpec>,
    /// Extra glob patterns excluded from copying
    pub ignore: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    #[serde(default, alias = "PROGRAM")]
    program: Option<Vec<Value>>,
    #[serde(default, alias = "QUESTIONS")]
    questions: Option<QuestionSpec>,
    #[serde(default, alias = "IGNORE")]
    ignore: Vec<String>,
}

/// Package metadata used by the repository.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    pub name: String,
    pub version: String,
}

impl Metadata {
    /// Checks that the metadata can address a repository directory.
    ///
    /// # Returns
    /// * `Result<semver::Version>` - The parsed package version
    ///
    /// # Errors
    /// * `Error::ValidationError` for an empty or path-like name, or a version
    ///   that is not a semantic version
    pub fn validate(&self) -> Result<semver::Version> {
        let name = self.name.trim();
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(Error::ValidationError(format!(
                "invalid package name '{}'",
                self.name
            )));
        }
        semver::Version::parse(&self.version).map_err(|e| {
            Error::ValidationError(format!(
                "invalid version '{}' of package '{}': {}",
                self.version, self.name, e
            ))
        })
    }
}

/// Parses a JSON or YAML document.
///
/// # Arguments
/// * `content` - Raw document content
/// * `origin` - Name used in error messages
///
/// # Errors
/// * `Error::SettingsParseError` if the content is neither valid JSON nor valid YAML
fn parse_document<T: DeserializeOwned>(content: &str, origin: &str) -> Result<T> {
    match serde_json::from_str(content) {
        Ok(v) => Ok(v),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::SettingsParseError(format!("invalid {}: {}", origin, e))),
    }
}

/// Parses settings content and resolves the program steps through the command table.
pub fn parse_settings(content: &str, origin: &str) -> Result<Settings> {
    let raw: RawSettings = if content.trim().is_empty() {
        RawSettings::default()
    } else {
        parse_document(content, origin)?
    };

    let program = raw.program.map(|steps| steps.into_iter().map(parse_step).collect());

    Ok(Settings { program, questions: raw.questions, ignore: raw.ignore })
}

/// Parses an external question file: a list of question definitions.
pub fn parse_questions(content: &str, origin: &str) -> Result<Vec<Question>> {
    parse_document(content, origin)
}

pub fn parse_metadata(content: &str, origin: &str) -> Result<Metadata> {
    parse_document(content, origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;

    #[test]
    fn test_parse_yaml_settings() {
        let content = r#"
questions:
  - name: name
    message: "name:"
  - name: micro
    prompt: "Micro framework?"
    kind: list
    choices: [flask, bottle]
program:
  - prompt
  - copy: files
  - run: git init
"#;
        let settings = parse_settings(content, "settings.yml").unwrap();

        let Some(QuestionSpec::Inline(questions)) = settings.questions else {
            panic!("Expected inline questions");
        };
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].kind, QuestionKind::Text);
        assert_eq!(questions[1].kind, QuestionKind::List);
        assert_eq!(questions[1].message, "Micro framework?");

        let program = settings.program.unwrap();
        assert_eq!(program.len(), 3);
        assert!(matches!(program[0], ProgramStep::Command(Command::Prompt(_))));
        assert!(matches!(program[1], ProgramStep::Command(Command::Copy(_))));
        assert!(matches!(program[2], ProgramStep::Command(Command::Run(_))));
    }

    #[test]
    fn test_parse_json_settings_with_upper_case_keys() {
        let content = r#"{"QUESTIONS": "questions.json", "PROGRAM": [{"copy": {"source": "skel"}}]}"#;
        let settings = parse_settings(content, "settings.json").unwrap();

        assert_eq!(settings.questions, Some(QuestionSpec::File("questions.json".into())));
        assert_eq!(settings.program.unwrap().len(), 1);
    }

    #[test]
    fn test_empty_settings() {
        let settings = parse_settings("  \n", "settings.yml").unwrap();
        assert!(settings.program.is_none());
        assert!(settings.questions.is_none());
        assert!(settings.ignore.is_empty());
    }

    #[test]
    fn test_malformed_settings() {
        let result = parse_settings("program: [prompt", "settings.yml");
        assert!(matches!(result, Err(Error::SettingsParseError(_))));
    }

    #[test]
    fn test_unknown_command_is_kept_as_unsupported() {
        let settings = parse_settings(r#"{"program": ["deploy", 42]}"#, "settings.json").unwrap();
        let program = settings.program.unwrap();
        assert!(program.iter().all(|step| matches!(step, ProgramStep::Unsupported(_))));
    }

    #[test]
    fn test_metadata_validation() {
        let metadata = Metadata { name: "basic".into(), version: "1.2.0".into() };
        assert_eq!(metadata.validate().unwrap(), semver::Version::new(1, 2, 0));

        let metadata = Metadata { name: "../basic".into(), version: "1.2.0".into() };
        assert!(matches!(metadata.validate(), Err(Error::ValidationError(_))));

        let metadata = Metadata { name: "basic".into(), version: "latest".into() };
        assert!(matches!(metadata.validate(), Err(Error::ValidationError(_))));
    }
}
