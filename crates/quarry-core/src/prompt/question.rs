//! Question definitions, validation and answer transforms

use super::answers::Answer;
use serde::{Deserialize, Serialize};

/// The kind of prompt a question is rendered as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptKind {
    #[serde(alias = "input")]
    Input,
    #[serde(alias = "multiline")]
    Multiline,
    #[serde(alias = "password")]
    Password,
    #[serde(alias = "confirm")]
    Confirm,
    #[serde(alias = "select")]
    Select,
    #[serde(alias = "multiSelect", alias = "multiselect")]
    MultiSelect,
    #[serde(alias = "editor")]
    Editor,
}

/// Display options for a question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuestionOptions {
    #[serde(deserialize_with = "crate::yaml::string")]
    pub message: String,
    #[serde(deserialize_with = "crate::yaml::string")]
    pub default: String,
    #[serde(deserialize_with = "crate::yaml::string")]
    pub help: String,
    #[serde(deserialize_with = "crate::yaml::strings")]
    pub options: Vec<String>,
    pub page_size: usize,
    pub vim_mode: bool,
    #[serde(deserialize_with = "crate::yaml::string")]
    pub editor: String,
    pub hide_default: bool,
    pub append_default: bool,
    #[serde(deserialize_with = "crate::yaml::string")]
    pub file_name: String,
}

impl QuestionOptions {
    /// Default for confirm questions: empty means no, otherwise a truthy spelling
    pub fn default_bool(&self) -> bool {
        matches!(
            self.default.trim().to_lowercase().as_str(),
            "true" | "t" | "yes" | "y" | "1"
        )
    }
}

/// Acceptance rules applied before an answer is stored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Validation {
    pub required: bool,
    /// Only enforced when greater than 1
    pub min_length: usize,
    /// Only enforced when greater than 0
    pub max_length: usize,
}

impl Validation {
    /// Check an answer, returning the message to show the operator on rejection
    pub fn check(&self, answer: &Answer) -> Result<(), String> {
        if self.required && answer.is_empty() {
            return Err("this response is required".to_string());
        }

        if let Answer::Text(text) = answer {
            let len = text.chars().count();

            if self.min_length > 1 && len < self.min_length {
                return Err(format!(
                    "this response must be {} or more characters",
                    self.min_length
                ));
            }

            if self.max_length > 0 && len > self.max_length {
                return Err(format!(
                    "this response must have {} or less characters",
                    self.max_length
                ));
            }
        }

        Ok(())
    }
}

/// Transform applied to a text answer before it is stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transform {
    #[default]
    #[serde(rename = "", alias = "None", alias = "none")]
    None,
    #[serde(alias = "title")]
    Title,
    #[serde(alias = "toLower", alias = "lower")]
    ToLower,
    #[serde(alias = "slug")]
    Slug,
}

impl Transform {
    pub fn apply(&self, answer: &Answer) -> Answer {
        match (self, answer) {
            (Self::None, _) => answer.clone(),
            (Self::Title, Answer::Text(text)) => Answer::Text(title_case(text)),
            (Self::ToLower, Answer::Text(text)) => Answer::Text(text.to_lowercase()),
            (Self::Slug, Answer::Text(text)) => Answer::Text(slug::slugify(text)),
            _ => answer.clone(),
        }
    }
}

/// Upper-case the first letter of every word, leaving the rest untouched
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_boundary = true;

    for c in text.chars() {
        if at_boundary && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_boundary = !(c.is_alphanumeric() || c == '_');
    }

    out
}

/// A single question from the manifest's prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Answer key
    #[serde(deserialize_with = "crate::yaml::string")]
    pub name: String,

    #[serde(rename = "type")]
    pub kind: PromptKind,

    #[serde(default, rename = "prompt")]
    pub options: QuestionOptions,

    #[serde(default, rename = "validate")]
    pub validation: Validation,

    #[serde(default)]
    pub transform: Transform,

    /// Gating expression; empty means always asked
    #[serde(default, deserialize_with = "crate::yaml::string")]
    pub when: String,
}

impl Question {
    pub fn check_valid(&self, answer: &Answer) -> Result<(), String> {
        self.validation.check(answer)
    }

    /// Message shown to the operator, falling back to the answer key
    pub fn message(&self) -> &str {
        if self.options.message.is_empty() {
            &self.name
        } else {
            &self.options.message
        }
    }
}
