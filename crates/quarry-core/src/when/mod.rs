//! `when` gating expressions
//!
//! Questions, copy rules and fill rules carry an optional `when` string. The
//! literals `""`, `true` and `always` pass and `false` and `never` fail without
//! compiling anything. Anything else is compiled as a minijinja expression over
//! `Answers`, `Template`, `Vars` and `Env`, and only passes when it evaluates to
//! the boolean `true`.
//!
//! `&&`, `||` and a prefix `!` are accepted as spellings of `and`, `or` and `not`.

pub mod environment;

use crate::error::{QuarryError, Result};
use crate::prompt::AnswerMap;
use minijinja::value::ValueKind;
use minijinja::{Environment, Expression, UndefinedBehavior};

pub use environment::{process_env, ProcessEnv, TemplateMeta, Vars, WhenEnvironment};

/// Whether the expression passes without evaluation
pub fn implicitly_true(expression: &str) -> bool {
    matches!(expression, "" | "true" | "always")
}

/// Whether the expression fails without evaluation
pub fn implicitly_false(expression: &str) -> bool {
    matches!(expression, "false" | "never")
}

/// Rewrite C-style logical operators outside string literals
pub fn normalize(expression: &str) -> String {
    let mut out = String::with_capacity(expression.len() + 8);
    let mut chars = expression.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push(c);
            }
            '&' if chars.peek() == Some(&'&') => {
                chars.next();
                out.push_str(" and ");
            }
            '|' if chars.peek() == Some(&'|') => {
                chars.next();
                out.push_str(" or ");
            }
            '!' if chars.peek() != Some(&'=') => out.push_str(" not "),
            _ => out.push(c),
        }
    }

    out
}

/// A compiled `when` expression
pub struct CompiledPredicate<'g> {
    source: &'g str,
    expression: Expression<'g, 'g>,
}

impl CompiledPredicate<'_> {
    /// Evaluate against an environment; non-boolean results are false
    pub fn evaluate(&self, env: &WhenEnvironment<'_>) -> Result<bool> {
        let value = self
            .expression
            .eval(env)
            .map_err(|e| QuarryError::WhenEvaluate {
                expression: self.source.to_string(),
                message: e.to_string(),
            })?;

        Ok(value.kind() == ValueKind::Bool && value.is_true())
    }
}

/// Compiles and evaluates `when` expressions
pub struct WhenGate {
    env: Environment<'static>,
}

impl Default for WhenGate {
    fn default() -> Self {
        Self::new()
    }
}

impl WhenGate {
    pub fn new() -> Self {
        let mut env = Environment::new();
        // Skipped questions leave no answer; chained lookups on them stay undefined
        env.set_undefined_behavior(UndefinedBehavior::Chainable);
        Self { env }
    }

    /// Compile an already normalized expression
    pub fn compile<'g>(&'g self, source: &'g str) -> Result<CompiledPredicate<'g>> {
        let expression =
            self.env
                .compile_expression(source)
                .map_err(|e| QuarryError::WhenCompile {
                    expression: source.to_string(),
                    message: e.to_string(),
                })?;

        Ok(CompiledPredicate { source, expression })
    }

    /// Decide whether a rule fires
    pub fn evaluate(&self, expression: &str, env: &WhenEnvironment<'_>) -> Result<bool> {
        if implicitly_true(expression) {
            return Ok(true);
        }
        if implicitly_false(expression) {
            return Ok(false);
        }

        let source = normalize(expression);
        self.compile(&source)?.evaluate(env)
    }
}

/// Gate plus the process environment snapshot shared by one pipeline run
pub struct Conditions {
    gate: WhenGate,
    env: ProcessEnv,
}

impl Default for Conditions {
    fn default() -> Self {
        Self::new()
    }
}

impl Conditions {
    /// Use the current process environment
    pub fn new() -> Self {
        Self::with_env(process_env())
    }

    pub fn with_env(env: ProcessEnv) -> Self {
        Self {
            gate: WhenGate::new(),
            env,
        }
    }

    pub fn gate(&self) -> &WhenGate {
        &self.gate
    }

    pub fn process_env(&self) -> &ProcessEnv {
        &self.env
    }

    /// Environment for questions and copy rules
    pub fn environment<'a>(
        &'a self,
        answers: &'a AnswerMap,
        template: &'a TemplateMeta,
    ) -> WhenEnvironment<'a> {
        WhenEnvironment::without_vars(answers, template, &self.env)
    }

    /// Evaluate a gate, skipping environment construction on the fast paths
    pub fn passes(
        &self,
        expression: &str,
        answers: &AnswerMap,
        template: &TemplateMeta,
    ) -> Result<bool> {
        if implicitly_true(expression) {
            return Ok(true);
        }
        self.gate
            .evaluate(expression, &self.environment(answers, template))
    }
}
