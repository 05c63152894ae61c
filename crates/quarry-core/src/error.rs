//! Error types for template expansion
//!
//! Each variant maps to one step of the scaffolding pipeline so the operator
//! always sees which step failed.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the template expansion engine
#[derive(Debug, Error)]
pub enum QuarryError {
    /// A git operation against a checkout failed
    #[error("Failed to {step} template checkout {url}: {source}")]
    Fetch {
        step: &'static str,
        url: String,
        #[source]
        source: git2::Error,
    },

    /// The template directory has no manifest
    #[error("Template manifest not found at {}", path.display())]
    ManifestNotFound { path: PathBuf },

    /// The manifest exists but could not be read
    #[error("Failed to read template manifest {}: {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest could not be decoded or is structurally invalid
    #[error("Invalid template manifest {}: {message}", path.display())]
    ManifestParse { path: PathBuf, message: String },

    /// A `when` expression failed to compile
    #[error("Failed compiling `when`:\n {expression}\n{message}")]
    WhenCompile { expression: String, message: String },

    /// A `when` expression failed during evaluation
    #[error("Failed executing `when`:\n {expression}\n{message}")]
    WhenEvaluate { expression: String, message: String },

    /// A fill file could not be rendered
    #[error("Failed to render template, {file}: {message}")]
    Fill { file: String, message: String },

    /// A fill file could not be read or written
    #[error("Failed to fill {file}: {source}")]
    FillIo {
        file: String,
        #[source]
        source: std::io::Error,
    },

    /// A copy rule failed to transplant its files
    #[error("Failed to copy /{from} to /{into}: {source}")]
    Copy {
        from: String,
        into: String,
        #[source]
        source: std::io::Error,
    },

    /// The prompt backend failed
    #[error("Prompt failed: {0}")]
    Prompt(std::io::Error),

    /// The operator cancelled a prompt
    #[error("Setup cancelled.")]
    Cancelled,

    /// The target already lives inside a project
    #[error("You cannot create a new project within a project root ({}).", path.display())]
    ProjectExists { path: PathBuf },

    /// Settings could not be resolved
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, QuarryError>;
