//! Values visible to `when` expressions and fill templates

use crate::prompt::AnswerMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Rule-local variables attached to a fill rule
pub type Vars = BTreeMap<String, serde_yaml::Value>;

/// Process environment variables as a flat map
pub type ProcessEnv = BTreeMap<String, String>;

static EMPTY_VARS: Vars = BTreeMap::new();

/// Snapshot the process environment; non UTF-8 entries are lossily converted
pub fn process_env() -> ProcessEnv {
    std::env::vars_os()
        .map(|(k, v)| {
            (
                k.to_string_lossy().into_owned(),
                v.to_string_lossy().into_owned(),
            )
        })
        .collect()
}

/// Template metadata exposed as `Template`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateMeta {
    pub name: String,
    pub author: String,
    pub description: String,
}

/// Read-only environment for one `when` evaluation or fill render
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WhenEnvironment<'a> {
    pub answers: &'a AnswerMap,
    pub template: &'a TemplateMeta,
    pub vars: &'a Vars,
    pub env: &'a ProcessEnv,
}

impl<'a> WhenEnvironment<'a> {
    /// Environment without rule-local variables (questions and copy rules)
    pub fn without_vars(
        answers: &'a AnswerMap,
        template: &'a TemplateMeta,
        env: &'a ProcessEnv,
    ) -> Self {
        Self {
            answers,
            template,
            vars: &EMPTY_VARS,
            env,
        }
    }

    pub fn with_vars(mut self, vars: &'a Vars) -> Self {
        self.vars = vars;
        self
    }
}
