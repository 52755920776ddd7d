//! User input handling.
//! Questions are answered either interactively through dialoguer or from a
//! preloaded set of answers.

use crate::config::{Question, QuestionKind};
use crate::error::{Error, Result};
use dialoguer::{Confirm, Input, MultiSelect, Password, Select};
use serde_json::{Map, Value};
use std::io::Read;

/// Collaborator that turns questions into answers.
pub trait Prompter {
    /// Answers one question.
    ///
    /// # Arguments
    /// * `question` - The question, with its message already rendered
    /// * `default` - The rendered default value, if any
    fn ask(&self, question: &Question, default: Option<&Value>) -> Result<Value>;

    /// Answers a list of questions in order and returns them keyed by name.
    fn prompt(&self, questions: &[Question]) -> Result<Map<String, Value>> {
        let mut answers = Map::new();
        for question in questions {
            let value = self.ask(question, question.default.as_ref())?;
            answers.insert(question.name.clone(), value);
        }
        Ok(answers)
    }
}

/// Interactive prompter backed by dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

fn dialoguer_error(e: dialoguer::Error) -> Error {
    Error::PromptError(e.to_string())
}

/// Retrieves the index of the default choice of a single choice question
fn get_single_choice_default(question: &Question, default: Option<&Value>) -> usize {
    default
        .and_then(Value::as_str)
        .and_then(|default| question.choices.iter().position(|choice| choice == default))
        .unwrap_or(0)
}

/// Retrieves the preselected choices of a multiple choice question
fn get_multiple_choice_default(question: &Question, default: Option<&Value>) -> Vec<bool> {
    let selected: Vec<&str> = match default {
        Some(Value::Array(values)) => values.iter().filter_map(Value::as_str).collect(),
        Some(Value::String(value)) => vec![value.as_str()],
        _ => Vec::new(),
    };
    question.choices.iter().map(|choice| selected.contains(&choice.as_str())).collect()
}

fn require_choices(question: &Question) -> Result<()> {
    if question.choices.is_empty() {
        return Err(Error::PromptError(format!(
            "question '{}' has no choices",
            question.name
        )));
    }
    Ok(())
}

impl Prompter for DialoguerPrompter {
    fn ask(&self, question: &Question, default: Option<&Value>) -> Result<Value> {
        let prompt = question.message.trim_end_matches(':').to_string();

        match question.kind {
            QuestionKind::Text => {
                let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
                if let Some(default) = default {
                    let default = match default {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    input = input.default(default);
                }
                let answer = input.interact_text().map_err(dialoguer_error)?;
                Ok(Value::String(answer))
            }
            QuestionKind::Password => {
                let answer = Password::new()
                    .with_prompt(prompt)
                    .allow_empty_password(true)
                    .interact()
                    .map_err(dialoguer_error)?;
                Ok(Value::String(answer))
            }
            QuestionKind::Confirm => {
                let default = default.and_then(Value::as_bool).unwrap_or(false);
                let answer = Confirm::new()
                    .with_prompt(prompt)
                    .default(default)
                    .interact()
                    .map_err(dialoguer_error)?;
                Ok(Value::Bool(answer))
            }
            QuestionKind::List => {
                require_choices(question)?;
                let selection = Select::new()
                    .with_prompt(prompt)
                    .default(get_single_choice_default(question, default))
                    .items(&question.choices)
                    .interact()
                    .map_err(dialoguer_error)?;
                Ok(Value::String(question.choices[selection].clone()))
            }
            QuestionKind::Checkbox => {
                require_choices(question)?;
                let defaults = get_multiple_choice_default(question, default);
                let selection = MultiSelect::new()
                    .with_prompt(prompt)
                    .items(&question.choices)
                    .defaults(&defaults)
                    .interact()
                    .map_err(dialoguer_error)?;
                Ok(Value::Array(
                    selection
                        .into_iter()
                        .map(|i| Value::String(question.choices[i].clone()))
                        .collect(),
                ))
            }
        }
    }
}

/// Non-interactive prompter answering from a preloaded JSON object.
///
/// Questions without a preloaded answer fall back to their default value.
#[derive(Debug, Default, Clone)]
pub struct PresetPrompter {
    answers: Map<String, Value>,
}

impl PresetPrompter {
    pub fn new(answers: Map<String, Value>) -> Self {
        Self { answers }
    }

    /// Builds a prompter from a JSON object, as read from stdin.
    ///
    /// # Errors
    /// * `Error::PromptError` if the content is not a JSON object
    pub fn from_json(content: &str) -> Result<Self> {
        let content = content.trim();
        if content.is_empty() {
            return Ok(Self::default());
        }
        match serde_json::from_str(content) {
            Ok(Value::Object(answers)) => Ok(Self::new(answers)),
            Ok(other) => Err(Error::PromptError(format!(
                "expected a JSON object of answers, got {}",
                other
            ))),
            Err(e) => Err(Error::PromptError(format!("failed to parse answers as JSON: {}", e))),
        }
    }

    pub fn from_stdin() -> Result<Self> {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Self::from_json(&buffer)
    }
}

impl Prompter for PresetPrompter {
    fn ask(&self, question: &Question, default: Option<&Value>) -> Result<Value> {
        if let Some(answer) = self.answers.get(&question.name) {
            return Ok(answer.clone());
        }
        default.cloned().ok_or_else(|| {
            Error::PromptError(format!("no answer provided for '{}'", question.name))
        })
    }
}
