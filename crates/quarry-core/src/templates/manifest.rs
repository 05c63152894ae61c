//! Template manifest types and parsing

use crate::error::{QuarryError, Result};
use crate::prompt::Prompt;
use crate::when::{TemplateMeta, Vars};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Copies a file or directory from the template's `template/` tree into the project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopyRule {
    /// Source path relative to `template/`
    #[serde(default, deserialize_with = "crate::yaml::string")]
    pub from: String,

    /// Destination path relative to the project; empty means same as `from`
    #[serde(default, deserialize_with = "crate::yaml::string")]
    pub into: String,

    #[serde(default, deserialize_with = "crate::yaml::string")]
    pub when: String,
}

impl CopyRule {
    /// Destination path relative to the project directory
    pub fn destination(&self) -> &str {
        if self.into.is_empty() {
            &self.from
        } else {
            &self.into
        }
    }
}

/// Re-renders an already copied project file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FillRule {
    /// Project-relative file to render in place
    #[serde(default, deserialize_with = "crate::yaml::string")]
    pub file: String,

    #[serde(default, deserialize_with = "crate::yaml::string")]
    pub when: String,

    /// Fill rules expected to run first; advisory only
    #[serde(default, deserialize_with = "crate::yaml::strings")]
    pub needs: Vec<String>,

    /// Values exposed as `Vars` while rendering this file
    #[serde(default)]
    pub vars: Vars,
}

/// Per-template manifest (`template.yml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, deserialize_with = "crate::yaml::string")]
    pub name: String,

    #[serde(default, deserialize_with = "crate::yaml::string")]
    pub author: String,

    #[serde(default, deserialize_with = "crate::yaml::string")]
    pub description: String,

    /// Questions asked before copying
    #[serde(default)]
    pub prompt: Prompt,

    #[serde(default)]
    pub copy: Vec<CopyRule>,

    #[serde(default)]
    pub fill: Vec<FillRule>,
}

impl Manifest {
    /// Load the manifest from a template directory
    pub fn load(template_dir: &Path, file_name: &str) -> Result<Self> {
        let path = template_dir.join(file_name);
        if !path.is_file() {
            return Err(QuarryError::ManifestNotFound { path });
        }

        let content = std::fs::read_to_string(&path).map_err(|source| {
            QuarryError::ManifestRead {
                path: path.clone(),
                source,
            }
        })?;

        Self::parse(&content).map_err(|message| QuarryError::ManifestParse { path, message })
    }

    /// Decode and validate manifest text
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        let mut manifest: Manifest = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
        manifest.validate()?;
        manifest.prompt.name = manifest.name.clone();
        Ok(manifest)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let mut seen = HashSet::new();
        for question in &self.prompt.questions {
            if question.name.is_empty() {
                return Err("prompt question is missing a name".to_string());
            }
            if !seen.insert(question.name.as_str()) {
                return Err(format!("duplicate prompt question `{}`", question.name));
            }
        }

        if let Some(rule) = self.fill.iter().find(|f| f.file.is_empty()) {
            return Err(format!(
                "fill rule is missing a file (when: `{}`)",
                rule.when
            ));
        }

        Ok(())
    }

    /// Metadata exposed to expressions as `Template`
    pub fn meta(&self) -> TemplateMeta {
        TemplateMeta {
            name: self.name.clone(),
            author: self.author.clone(),
            description: self.description.clone(),
        }
    }
}
