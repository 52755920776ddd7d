use super::Context;
use crate::config::{parse_questions, Question, QuestionSpec};
use crate::error::{Error, Result};
use crate::loader::Template;
use log::debug;
use serde_json::Value;
use std::path::Path;

/// Asks questions and merges the answers into the collected variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptCommand {
    questions: Option<QuestionSpec>,
}

impl PromptCommand {
    pub fn new(questions: Option<QuestionSpec>) -> Self {
        Self { questions }
    }

    pub fn from_args(args: Option<Value>) -> Result<Self> {
        match args {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(value) => serde_json::from_value(value)
                .map(|questions| Self::new(Some(questions)))
                .map_err(|e| Error::ConfigError(format!("invalid prompt questions: {}", e))),
        }
    }

    pub fn questions(&self) -> Option<&QuestionSpec> {
        self.questions.as_ref()
    }

    /// Resolves the question list: own questions first, then the settings.
    /// An empty inline list counts as no questions of its own.
    fn resolve(&self, template: &Template) -> Result<Option<Vec<Question>>> {
        let own = self.questions.as_ref().filter(|spec| {
            !matches!(spec, QuestionSpec::Inline(questions) if questions.is_empty())
        });
        let spec = match own {
            Some(spec) => spec,
            None => match &template.settings()?.questions {
                Some(spec) => spec,
                None => return Ok(None),
            },
        };

        match spec {
            QuestionSpec::Inline(questions) => Ok(Some(questions.clone())),
            QuestionSpec::File(name) => {
                let content = template.read_to_string(name)?.ok_or_else(|| {
                    Error::ConfigError(format!("question file '{}' not found", name))
                })?;
                parse_questions(&content, name).map(Some)
            }
        }
    }

    pub fn execute(&self, template: &Template, _output: &Path, context: &mut Context) -> Result<()> {
        let Some(questions) = self.resolve(template)? else {
            debug!("No questions to prompt");
            return Ok(());
        };

        // Asked one at a time so messages and defaults can use earlier answers.
        for mut question in questions {
            question.message = context.render(&question.message)?;
            if let Some(Value::String(default)) = &question.default {
                question.default = Some(Value::String(context.render(default)?));
            }

            let answers = context.prompter.prompt(std::slice::from_ref(&question))?;
            debug!("Collected answers for '{}'.", question.name);
            context.variables.update(answers);
        }
        Ok(())
    }
}
