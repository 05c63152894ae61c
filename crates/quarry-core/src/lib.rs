//! Quarry Core - template manifest expansion engine
//!
//! Creates a project directory from a template: the template is located
//! (locally, or as a git repository checked out into a cache), its
//! `template.yml` manifest is decoded, the operator answers the manifest's
//! questions, and the copy and fill rules whose `when` gates pass are applied.
//!
//! # Architecture
//!
//! - **Engine** - `templates` (resolve, fetch, parse, copy, fill), `when`
//!   (gating expressions) and `prompt` (questions, answers, collector)
//! - **Product wiring** - the `ProductConfig` trait and `TemplatePaths`
//! - **CLI/TUI** - cliclack-backed prompter and the `run` pipeline (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompter and `run`
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use quarry_core::{templates::Template, when::Conditions, prompt::AnswerMap};
//!
//! let template = Template::load("web", checkout_dir, project_dir, "template.yml")?;
//! let conditions = Conditions::new();
//! let answers = AnswerMap::new();
//! quarry_core::copy_template(&template, &answers, &conditions).await?;
//! quarry_core::fill_template(&template, &answers, &conditions).await?;
//! ```

pub mod config;
pub mod error;
pub mod product;
pub mod project;
pub mod prompt;
pub mod templates;
pub mod when;

mod yaml;

#[cfg(feature = "tui")]
pub mod tui;

pub use config::TemplatePaths;
pub use error::{QuarryError, Result};
pub use product::ProductConfig;
pub use project::ProjectDir;
pub use prompt::{AnswerCollector, AnswerMap, AnswerStore, Prompter};
pub use templates::{
    copy_template, fill_template, CheckoutCache, CopyReport, Manifest, Resolver, Template,
    TemplateSource,
};
pub use when::Conditions;

#[cfg(feature = "tui")]
pub use tui::{run, NewProjectArgs};

/// Template used when none is named
pub const DEFAULT_TEMPLATE: &str = "empty";
