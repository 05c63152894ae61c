//! Local template and checkout cache locations

use crate::error::{QuarryError, Result};
use crate::product::ProductConfig;
use std::path::{Path, PathBuf};

/// Where local templates and cached remote checkouts live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePaths {
    /// Root of operator-maintained local templates
    pub local_root: PathBuf,
    /// Root of cached remote checkouts
    pub cache_root: PathBuf,
}

impl TemplatePaths {
    /// Resolve paths from env overrides, falling back to the product's home directory
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let prefix = config.name().to_uppercase();
        Self::resolve(
            env_override(&format!("{}_TEMPLATES_LOCAL", prefix)),
            env_override(&format!("{}_TEMPLATES_CACHE", prefix)),
            &config.home_dir_name(),
            home,
        )
    }

    /// The home directory is only looked up for paths without an override
    fn resolve(
        local: Option<String>,
        cache: Option<String>,
        home_dir_name: &str,
        home: impl Fn() -> Result<PathBuf>,
    ) -> Result<Self> {
        let local_root = match local {
            Some(value) => expand_home(&value)?,
            None => home()?.join(home_dir_name).join("templates"),
        };
        let cache_root = match cache {
            Some(value) => expand_home(&value)?,
            None => home()?.join(home_dir_name).join(".cache").join("templates"),
        };

        Ok(Self {
            local_root,
            cache_root,
        })
    }

    /// Build paths from explicit roots
    pub fn new(local_root: impl Into<PathBuf>, cache_root: impl Into<PathBuf>) -> Self {
        Self {
            local_root: local_root.into(),
            cache_root: cache_root.into(),
        }
    }

    /// Directory a local template with this name would live in
    pub fn local_template_dir(&self, name: &str) -> PathBuf {
        self.local_root.join(name)
    }
}

fn env_override(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn home() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| QuarryError::Config {
        message: "could not determine the home directory".to_string(),
    })
}

/// Expand a leading `~` to the user's home directory
pub fn expand_home(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return home();
    }
    match raw.strip_prefix("~/") {
        Some(rest) => Ok(home()?.join(rest)),
        None => Ok(Path::new(raw).to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home_leaves_absolute_paths() {
        let path = expand_home("/srv/templates").unwrap();
        assert_eq!(path, PathBuf::from("/srv/templates"));
    }

    #[test]
    fn test_expand_home_replaces_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/t").unwrap(), home.join("t"));
            assert_eq!(expand_home("~").unwrap(), home);
        }
    }

    #[test]
    fn test_local_template_dir() {
        let paths = TemplatePaths::new("/local", "/cache");
        assert_eq!(paths.local_template_dir("empty"), PathBuf::from("/local/empty"));
    }

    fn no_home() -> Result<PathBuf> {
        Err(QuarryError::Config {
            message: "could not determine the home directory".to_string(),
        })
    }

    #[test]
    fn test_overrides_do_not_need_a_home_directory() {
        let paths = TemplatePaths::resolve(
            Some("/srv/templates".into()),
            Some("/var/cache/quarry".into()),
            ".quarry",
            no_home,
        )
        .unwrap();

        assert_eq!(paths.local_root, PathBuf::from("/srv/templates"));
        assert_eq!(paths.cache_root, PathBuf::from("/var/cache/quarry"));
    }

    #[test]
    fn test_missing_override_without_home_is_a_config_error() {
        let err = TemplatePaths::resolve(Some("/srv/templates".into()), None, ".quarry", no_home)
            .unwrap_err();
        assert!(matches!(err, QuarryError::Config { .. }));
    }

    #[test]
    fn test_defaults_live_under_home_dir_name() {
        let paths =
            TemplatePaths::resolve(None, None, ".quarry", || Ok(PathBuf::from("/home/dev"))).unwrap();

        assert_eq!(paths.local_root, PathBuf::from("/home/dev/.quarry/templates"));
        assert_eq!(
            paths.cache_root,
            PathBuf::from("/home/dev/.quarry/.cache/templates")
        );
    }
}
