//! Project and template directory detection

use crate::error::{QuarryError, Result};
use crate::product::ProductConfig;
use std::path::{Path, PathBuf};

/// A directory a project is (or will be) created in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDir {
    path: PathBuf,
    project_file: &'static str,
    manifest_file: &'static str,
}

impl ProjectDir {
    /// Resolve `path` against the current directory
    pub fn new<C: ProductConfig>(config: &C, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        Ok(Self {
            path: normalize(&path),
            project_file: config.project_file_name(),
            manifest_file: config.manifest_file_name(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Whether this directory holds a project descriptor
    pub fn is_project(&self) -> bool {
        self.path.join(self.project_file).is_file()
    }

    /// Whether this directory holds a template descriptor
    pub fn is_template(&self) -> bool {
        self.path.join(self.manifest_file).is_file()
    }

    /// Nearest directory, this one or an ancestor, holding a project descriptor
    pub fn find_enclosing_project(&self) -> Option<PathBuf> {
        self.path
            .ancestors()
            .find(|dir| dir.join(self.project_file).is_file())
            .map(Path::to_path_buf)
    }

    /// Refuse to create a project inside another one
    pub fn ensure_outside_project(&self) -> Result<()> {
        match self.find_enclosing_project() {
            Some(path) => Err(QuarryError::ProjectExists { path }),
            None => Ok(()),
        }
    }
}

/// Drop `.` components and resolve `..` lexically
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::test_support::TestConfig;
    use tempfile::TempDir;

    #[test]
    fn test_relative_path_is_made_absolute() {
        let dir = ProjectDir::new(&TestConfig, "./app/../app").unwrap();
        assert!(dir.path().is_absolute());
        assert!(dir.path().ends_with("app"));
        assert!(!dir.path().to_string_lossy().contains(".."));
    }

    #[test]
    fn test_detects_project_and_template_descriptors() {
        let temp = TempDir::new().unwrap();
        let dir = ProjectDir::new(&TestConfig, temp.path()).unwrap();
        assert!(dir.exists());
        assert!(!dir.is_project());
        assert!(!dir.is_template());

        std::fs::write(temp.path().join("project.yml"), "name: app\n").unwrap();
        std::fs::write(temp.path().join("template.yml"), "name: web\n").unwrap();
        assert!(dir.is_project());
        assert!(dir.is_template());
    }

    #[test]
    fn test_enclosing_project_found_in_ancestor() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("project.yml"), "name: app\n").unwrap();
        let nested = temp.path().join("services").join("api");

        let dir = ProjectDir::new(&TestConfig, &nested).unwrap();

        assert!(!dir.exists());
        assert_eq!(dir.find_enclosing_project(), Some(temp.path().to_path_buf()));
        assert!(matches!(
            dir.ensure_outside_project(),
            Err(QuarryError::ProjectExists { .. })
        ));
    }

    #[test]
    fn test_no_enclosing_project() {
        let temp = TempDir::new().unwrap();
        let dir = ProjectDir::new(&TestConfig, temp.path().join("fresh")).unwrap();
        assert!(dir.ensure_outside_project().is_ok());
    }
}
