//! Collected answers

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Prefix of the shadow key holding an untransformed answer
pub const RAW_PREFIX: &str = "Raw";

/// A single answer value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    Bool(bool),
    List(Vec<String>),
}

impl Answer {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Bool(_) => false,
            Self::List(items) => items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Answers for one template, keyed by question name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerMap(BTreeMap<String, Answer>);

static EMPTY_ANSWERS: AnswerMap = AnswerMap(BTreeMap::new());

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Answer> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Store a transformed answer and its raw shadow entry
    pub fn record(&mut self, name: &str, raw: Answer, transformed: Answer) {
        self.0.insert(format!("{}{}", RAW_PREFIX, name), raw);
        self.0.insert(name.to_string(), transformed);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Answer)> {
        self.0.iter()
    }
}

/// Caller-owned answers for every template touched in this run
///
/// Answers accumulate per template name: asking the same template twice adds
/// to the existing map instead of starting over.
#[derive(Debug, Clone, Default)]
pub struct AnswerStore {
    templates: HashMap<String, AnswerMap>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers for a template, empty if none were collected yet
    pub fn answers(&self, template: &str) -> &AnswerMap {
        self.templates.get(template).unwrap_or(&EMPTY_ANSWERS)
    }

    /// Replace the answers for a template
    pub fn commit(&mut self, template: &str, answers: AnswerMap) {
        self.templates.insert(template.to_string(), answers);
    }

    /// Drop every collected answer
    pub fn reset(&mut self) {
        self.templates.clear();
    }
}
