//! Template resolution, checkout, parsing, copying and filling
//!
//! - `source`: turns a template identifier into a local directory or remote URL
//! - `fetcher`: keeps remote templates checked out in a local cache
//! - `manifest`: decodes `template.yml`
//! - `copier` and `filler`: materialize the project from a loaded template

pub mod copier;
pub mod fetcher;
pub mod filler;
pub mod manifest;
pub mod source;

use crate::error::Result;
use std::path::{Component, Path, PathBuf};

pub use copier::{copy_template, CopyReport};
pub use fetcher::{Checkout, CheckoutCache};
pub use filler::fill_template;
pub use manifest::{CopyRule, FillRule, Manifest};
pub use source::{Resolver, SourceKind, TemplateSource};

/// Directory inside a template that holds the files to copy
pub const FILES_DIR: &str = "template";

/// Join a manifest-relative path onto `root`, refusing anything that leaves it
///
/// Only plain names and `.` are accepted; absolute paths, prefixes and `..`
/// yield `None`. An empty path is `root` itself.
pub fn contained_join(root: &Path, relative: &str) -> Option<PathBuf> {
    let mut joined = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => joined.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(joined)
}

/// A template ready to be applied to a project directory
#[derive(Debug, Clone)]
pub struct Template {
    /// Identifier the operator asked for
    pub from: String,
    /// Checkout or local directory holding the manifest
    pub template_dir: PathBuf,
    /// Destination project directory
    pub project_dir: PathBuf,
    pub manifest: Manifest,
}

impl Template {
    /// Read the manifest from `template_dir`
    pub fn load(
        from: impl Into<String>,
        template_dir: impl Into<PathBuf>,
        project_dir: impl Into<PathBuf>,
        manifest_file_name: &str,
    ) -> Result<Self> {
        let template_dir = template_dir.into();
        let manifest = Manifest::load(&template_dir, manifest_file_name)?;

        Ok(Self {
            from: from.into(),
            template_dir,
            project_dir: project_dir.into(),
            manifest,
        })
    }

    /// Root that copy rule sources are relative to
    pub fn files_dir(&self) -> PathBuf {
        self.template_dir.join(FILES_DIR)
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuarryError;
    use tempfile::TempDir;

    #[test]
    fn test_load_reads_manifest() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("template.yml"),
            "name: web\ncopy:\n  - from: README.md\n",
        )
        .unwrap();

        let template = Template::load("web", temp.path(), "/tmp/app", "template.yml").unwrap();

        assert_eq!(template.manifest.name, "web");
        assert_eq!(template.files_dir(), temp.path().join("template"));
        assert_eq!(template.project_dir(), Path::new("/tmp/app"));
    }

    #[test]
    fn test_contained_join_accepts_relative_paths() {
        let root = Path::new("/work/app");
        assert_eq!(
            contained_join(root, "docker/compose.yml"),
            Some(PathBuf::from("/work/app/docker/compose.yml"))
        );
        assert_eq!(
            contained_join(root, "./README.md"),
            Some(PathBuf::from("/work/app/README.md"))
        );
        assert_eq!(contained_join(root, ""), Some(PathBuf::from("/work/app")));
    }

    #[test]
    fn test_contained_join_rejects_escapes() {
        let root = Path::new("/work/app");
        assert_eq!(contained_join(root, "/etc/passwd"), None);
        assert_eq!(contained_join(root, "../secrets"), None);
        assert_eq!(contained_join(root, "docker/../../secrets"), None);
    }

    #[test]
    fn test_load_without_manifest_fails() {
        let temp = TempDir::new().unwrap();
        let err = Template::load("web", temp.path(), "/tmp/app", "template.yml").unwrap_err();
        assert!(matches!(err, QuarryError::ManifestNotFound { .. }));
    }
}
