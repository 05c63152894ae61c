//! Template source resolution
//!
//! A source identifier is classified by how many `/` it contains:
//! - none: a core template owned by the product's organization
//! - exactly one: an `owner/repo` shorthand on the hosting provider
//! - more: used verbatim as a git URL or local path

use crate::config::TemplatePaths;
use crate::error::{QuarryError, Result};
use crate::product::ProductConfig;
use std::path::PathBuf;
use url::Url;

/// How a source identifier was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Core,
    Shorthand,
    Explicit,
}

impl SourceKind {
    /// Classify an identifier by counting path separators
    pub fn classify(identifier: &str) -> Self {
        match identifier.matches('/').count() {
            0 => Self::Core,
            1 => Self::Shorthand,
            _ => Self::Explicit,
        }
    }
}

/// Turns short template names into canonical remote URLs
#[derive(Debug, Clone)]
pub struct Resolver {
    host: String,
    org: String,
    repo_prefix: String,
}

impl Resolver {
    /// Create a resolver for a hosting provider and core organization
    pub fn new(host: &str, org: &str, repo_prefix: &str) -> Result<Self> {
        let base = format!("https://{}/", host);
        Url::parse(&base).map_err(|e| QuarryError::Config {
            message: format!("invalid template host '{}': {}", host, e),
        })?;

        Ok(Self {
            host: host.to_string(),
            org: org.to_string(),
            repo_prefix: repo_prefix.to_string(),
        })
    }

    /// Create a resolver from a product config, honoring the host override env var
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let host = std::env::var(config.template_host_env())
            .ok()
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| config.template_host().to_string());
        Self::new(&host, config.template_org(), config.template_repo_prefix())
    }

    /// Resolve an identifier into its canonical URL
    pub fn resolve(&self, identifier: &str) -> String {
        match SourceKind::classify(identifier) {
            SourceKind::Core => format!(
                "https://{}/{}/{}{}.git",
                self.host, self.org, self.repo_prefix, identifier
            ),
            SourceKind::Shorthand => format!("https://{}/{}.git", self.host, identifier),
            SourceKind::Explicit => identifier.to_string(),
        }
    }
}

/// Template source - either a local template directory or a remote repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Local(PathBuf),
    Remote(String),
}

impl TemplateSource {
    /// Prefer a local template of the same name, otherwise resolve remotely
    pub fn locate(
        identifier: &str,
        paths: &TemplatePaths,
        resolver: &Resolver,
        manifest_file_name: &str,
    ) -> Self {
        let local = paths.local_template_dir(identifier);
        if local.join(manifest_file_name).is_file() {
            return Self::Local(local);
        }
        Self::Remote(resolver.resolve(identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn resolver() -> Resolver {
        Resolver::new("github.com", "quarryhq", "cli-project-template-").unwrap()
    }

    #[test]
    fn test_classify_by_separator_count() {
        assert_eq!(SourceKind::classify("empty"), SourceKind::Core);
        assert_eq!(SourceKind::classify(""), SourceKind::Core);
        assert_eq!(SourceKind::classify("acme/starter"), SourceKind::Shorthand);
        assert_eq!(
            SourceKind::classify("https://git.example.com/a/b.git"),
            SourceKind::Explicit
        );
        assert_eq!(SourceKind::classify("/srv/templates/x"), SourceKind::Explicit);
    }

    #[test]
    fn test_core_alias_url() {
        assert_eq!(
            resolver().resolve("empty"),
            "https://github.com/quarryhq/cli-project-template-empty.git"
        );
    }

    #[test]
    fn test_shorthand_url() {
        assert_eq!(
            resolver().resolve("acme/starter"),
            "https://github.com/acme/starter.git"
        );
    }

    #[test]
    fn test_explicit_left_unchanged() {
        let explicit = "git@example.com:team/templates/web.git";
        assert_eq!(resolver().resolve(explicit), explicit);
        let path = "./a/b";
        assert_eq!(resolver().resolve(path), path);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let r = resolver();
        for id in ["empty", "acme/starter", "https://x.dev/a/b.git"] {
            assert_eq!(r.resolve(id), r.resolve(id));
        }
    }

    #[test]
    fn test_invalid_host_rejected() {
        assert!(Resolver::new("bad host", "org", "p-").is_err());
    }

    #[test]
    fn test_locate_prefers_local_template() {
        let temp = TempDir::new().unwrap();
        let paths = TemplatePaths::new(temp.path().join("local"), temp.path().join("cache"));
        let local = paths.local_template_dir("web");
        std::fs::create_dir_all(&local).unwrap();
        std::fs::write(local.join("template.yml"), "name: web\n").unwrap();

        let r = resolver();
        assert_eq!(
            TemplateSource::locate("web", &paths, &r, "template.yml"),
            TemplateSource::Local(local)
        );
        assert_eq!(
            TemplateSource::locate("api", &paths, &r, "template.yml"),
            TemplateSource::Remote(
                "https://github.com/quarryhq/cli-project-template-api.git".to_string()
            )
        );
    }
}
