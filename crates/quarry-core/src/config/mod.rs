//! Template path settings

pub mod paths;

pub use paths::TemplatePaths;
