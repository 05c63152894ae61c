//! Renders manifest questions with cliclack

use crate::error::{QuarryError, Result};
use crate::prompt::{Answer, Prompt, PromptKind, Prompter, Question, QuestionOptions};
use std::io;

/// Interactive prompter backed by cliclack, with dialoguer for editor questions
#[derive(Debug, Default)]
pub struct CliclackPrompter;

impl CliclackPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for CliclackPrompter {
    fn begin(&mut self, _prompt: &Prompt) -> Result<()> {
        cliclack::log::step("questions:").map_err(prompt_error)
    }

    fn ask(&mut self, question: &Question) -> Result<Answer> {
        let options = &question.options;
        if !options.help.is_empty() {
            cliclack::log::remark(&options.help).map_err(prompt_error)?;
        }

        match question.kind {
            PromptKind::Input => text(question, false),
            PromptKind::Multiline => text(question, true),
            PromptKind::Password => cliclack::password(question.message())
                .interact()
                .map(Answer::Text)
                .map_err(prompt_error),
            PromptKind::Confirm => cliclack::confirm(question.message())
                .initial_value(options.default_bool())
                .interact()
                .map(Answer::Bool)
                .map_err(prompt_error),
            PromptKind::Select => select(question),
            PromptKind::MultiSelect => multiselect(question),
            PromptKind::Editor => editor(options),
        }
    }

    fn invalid(&mut self, _question: &Question, message: &str) -> Result<()> {
        cliclack::log::error(message).map_err(prompt_error)
    }
}

/// cliclack reports Esc and Ctrl+C as an interrupted read
fn prompt_error(e: io::Error) -> QuarryError {
    if e.kind() == io::ErrorKind::Interrupted {
        let _ = console::Term::stderr().show_cursor();
        QuarryError::Cancelled
    } else {
        QuarryError::Prompt(e)
    }
}

fn text(question: &Question, multiline: bool) -> Result<Answer> {
    let options = &question.options;
    let mut input = cliclack::input(question.message()).required(false);
    if !options.default.is_empty() && !options.hide_default {
        input = input.placeholder(&options.default);
    }
    if multiline {
        input = input.multiline();
    }

    let value: String = input.interact().map_err(prompt_error)?;
    if value.is_empty() {
        return Ok(Answer::Text(options.default.clone()));
    }
    Ok(Answer::Text(value))
}

fn select(question: &Question) -> Result<Answer> {
    let options = &question.options;
    let mut select = cliclack::select(question.message());
    for option in &options.options {
        select = select.item(option.clone(), option, "");
    }
    if options.options.contains(&options.default) {
        select = select.initial_value(options.default.clone());
    }
    if options.page_size > 0 {
        select = select.max_rows(options.page_size);
    }

    select
        .interact()
        .map(Answer::Text)
        .map_err(prompt_error)
}

fn multiselect(question: &Question) -> Result<Answer> {
    let options = &question.options;
    let mut multi = cliclack::multiselect(question.message()).required(false);
    for option in &options.options {
        multi = multi.item(option.clone(), option, "");
    }

    let defaults = default_list(options);
    if !defaults.is_empty() {
        multi = multi.initial_values(defaults);
    }
    if options.page_size > 0 {
        multi = multi.max_rows(options.page_size);
    }

    multi
        .interact()
        .map(Answer::List)
        .map_err(prompt_error)
}

/// Comma separated defaults that name one of the options
fn default_list(options: &QuestionOptions) -> Vec<String> {
    options
        .default
        .split(',')
        .map(str::trim)
        .filter(|item| options.options.iter().any(|o| o == item))
        .map(str::to_string)
        .collect()
}

fn editor(options: &QuestionOptions) -> Result<Answer> {
    cliclack::log::info("Opening editor...").map_err(prompt_error)?;

    let mut editor = dialoguer::Editor::new();
    if !options.editor.is_empty() {
        editor.executable(&options.editor);
    }
    if let Some(extension) = std::path::Path::new(&options.file_name).extension() {
        editor.extension(&format!(".{}", extension.to_string_lossy()));
    }

    let edited = editor
        .edit(editor_initial_text(options))
        .map_err(|e| QuarryError::Prompt(io::Error::other(e.to_string())))?;

    match edited {
        Some(text) if !text.is_empty() => Ok(Answer::Text(text)),
        _ => Ok(Answer::Text(options.default.clone())),
    }
}

/// Text the editor opens with; a hidden default is never shown
fn editor_initial_text(options: &QuestionOptions) -> &str {
    if options.append_default && !options.hide_default {
        &options.default
    } else {
        ""
    }
}
