//! Interactive answer collection
//!
//! This module provides:
//! - Question definitions with validation and transforms
//! - Answer maps and the caller-owned answer store
//! - The collector that walks a prompt's questions in order

pub mod answers;
pub mod collector;
pub mod question;

use serde::{de, Deserialize, Deserializer, Serialize};

pub use answers::{Answer, AnswerMap, AnswerStore};
pub use collector::{AnswerCollector, Prompter};
pub use question::{PromptKind, Question, QuestionOptions, Transform, Validation};

/// The ordered question list of a template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Prompt {
    /// Name answers are stored under; set to the manifest name after loading
    pub name: String,
    pub questions: Vec<Question>,
}

impl Prompt {
    pub fn new(name: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            name: name.into(),
            questions,
        }
    }
}

/// `prompt` may be written as a bare question list or as `{ questions: [...] }`
impl<'de> Deserialize<'de> for Prompt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Table {
            #[serde(default)]
            name: String,
            #[serde(default)]
            questions: Vec<Question>,
        }

        let value = serde_yaml::Value::deserialize(deserializer)?;
        let prompt = match value {
            serde_yaml::Value::Null => Prompt::default(),
            serde_yaml::Value::Sequence(_) => Prompt {
                name: String::new(),
                questions: serde_yaml::from_value(value).map_err(de::Error::custom)?,
            },
            other => {
                let table: Table = serde_yaml::from_value(other).map_err(de::Error::custom)?;
                Prompt {
                    name: table.name,
                    questions: table.questions,
                }
            }
        };

        Ok(prompt)
    }
}
