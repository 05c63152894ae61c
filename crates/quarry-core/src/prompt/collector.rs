//! Walks a prompt's questions in order, gating each one on its `when`

use super::answers::{Answer, AnswerStore};
use super::question::Question;
use super::{AnswerMap, Prompt};
use crate::error::Result;
use crate::when::{Conditions, TemplateMeta};
use tracing::debug;

/// Asks one question and returns the operator's answer
///
/// Implementations return [`QuarryError::Cancelled`](crate::error::QuarryError::Cancelled)
/// when the operator aborts.
pub trait Prompter {
    /// Called once before the first question of a prompt
    fn begin(&mut self, _prompt: &Prompt) -> Result<()> {
        Ok(())
    }

    fn ask(&mut self, question: &Question) -> Result<Answer>;

    /// Show a validation failure before the question is asked again
    fn invalid(&mut self, question: &Question, message: &str) -> Result<()>;
}

/// Collects answers for a template's prompt
pub struct AnswerCollector<'c> {
    conditions: &'c Conditions,
}

impl<'c> AnswerCollector<'c> {
    pub fn new(conditions: &'c Conditions) -> Self {
        Self { conditions }
    }

    /// Ask every question whose gate passes, accumulating into the store
    ///
    /// Answers land in the store only when the whole prompt completes, so a
    /// cancelled prompt leaves the store untouched.
    pub fn ask<P: Prompter + ?Sized>(
        &self,
        prompt: &Prompt,
        template: &TemplateMeta,
        store: &mut AnswerStore,
        prompter: &mut P,
    ) -> Result<AnswerMap> {
        let mut answers = store.answers(&prompt.name).clone();

        if !prompt.questions.is_empty() {
            prompter.begin(prompt)?;
        }

        for question in &prompt.questions {
            if !self
                .conditions
                .passes(&question.when, &answers, template)?
            {
                debug!(question = %question.name, when = %question.when, "skipping question");
                continue;
            }

            let raw = ask_until_valid(question, prompter)?;
            let transformed = question.transform.apply(&raw);
            answers.record(&question.name, raw, transformed);
        }

        store.commit(&prompt.name, answers.clone());
        Ok(answers)
    }
}

fn ask_until_valid<P: Prompter + ?Sized>(question: &Question, prompter: &mut P) -> Result<Answer> {
    loop {
        let answer = prompter.ask(question)?;
        match question.check_valid(&answer) {
            Ok(()) => return Ok(answer),
            Err(message) => prompter.invalid(question, &message)?,
        }
    }
}
