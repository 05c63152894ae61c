//! Copy rules: transplant files from a template into the project

use super::manifest::CopyRule;
use super::{contained_join, Template};
use crate::error::{QuarryError, Result};
use crate::prompt::AnswerMap;
use crate::when::Conditions;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// What happened to each copy rule
#[derive(Debug, Default)]
pub struct CopyReport {
    pub applied: Vec<CopyRule>,
    pub skipped: Vec<CopyRule>,
    pub failed: Vec<(CopyRule, QuarryError)>,
}

impl CopyReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run every copy rule whose gate passes, in manifest order
///
/// A rule that fails to copy is recorded and the remaining rules still run.
/// Only a broken `when` expression stops the pass.
pub async fn copy_template(
    template: &Template,
    answers: &AnswerMap,
    conditions: &Conditions,
) -> Result<CopyReport> {
    let meta = template.manifest.meta();
    let mut report = CopyReport::default();

    fs::create_dir_all(&template.project_dir).await?;

    for rule in &template.manifest.copy {
        if !conditions.passes(&rule.when, answers, &meta)? {
            debug!(from = %rule.from, when = %rule.when, "skipping copy rule");
            report.skipped.push(rule.clone());
            continue;
        }

        let copied = match rule_paths(template, rule) {
            Ok((source, target)) => copy_path(&source, &target).await,
            Err(e) => Err(e),
        };

        match copied {
            Ok(()) => report.applied.push(rule.clone()),
            Err(source) => {
                warn!(from = %rule.from, into = %rule.into, error = %source, "copy rule failed");
                report.failed.push((
                    rule.clone(),
                    QuarryError::Copy {
                        from: rule.from.clone(),
                        into: rule.into.clone(),
                        source,
                    },
                ));
            }
        }
    }

    Ok(report)
}

/// Source and target of a rule, both kept inside their roots
fn rule_paths(template: &Template, rule: &CopyRule) -> io::Result<(PathBuf, PathBuf)> {
    let source = contained_join(&template.files_dir(), &rule.from).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("`{}` is outside the template", rule.from),
        )
    })?;
    let target = contained_join(&template.project_dir, rule.destination()).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("`{}` is outside the project", rule.destination()),
        )
    })?;
    Ok((source, target))
}

/// Copy a file, or a directory recursively, overwriting what is already there
async fn copy_path(source: &Path, target: &Path) -> io::Result<()> {
    let metadata = fs::metadata(source).await?;

    if !metadata.is_dir() {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::copy(source, target).await?;
        return Ok(());
    }

    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let destination = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination).await?;
        } else {
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::copy(entry.path(), &destination).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::manifest::Manifest;
    use crate::when::ProcessEnv;
    use crate::prompt::Answer;
    use tempfile::TempDir;

    fn template_with(copy: Vec<CopyRule>, checkout: &TempDir, project: &TempDir) -> Template {
        let files = checkout.path().join("template");
        std::fs::create_dir_all(files.join("docker").join("compose")).unwrap();
        std::fs::write(files.join("README.md"), "# {{ Vars.Title }}\n").unwrap();
        std::fs::write(files.join("docker").join("Dockerfile"), "FROM scratch\n").unwrap();
        std::fs::write(
            files.join("docker").join("compose").join("dev.yml"),
            "services: {}\n",
        )
        .unwrap();

        Template {
            from: "web".into(),
            template_dir: checkout.path().to_path_buf(),
            project_dir: project.path().join("app"),
            manifest: Manifest {
                name: "web".into(),
                copy,
                ..Default::default()
            },
        }
    }

    fn rule(from: &str, into: &str, when: &str) -> CopyRule {
        CopyRule {
            from: from.into(),
            into: into.into(),
            when: when.into(),
        }
    }

    #[tokio::test]
    async fn test_copies_file_to_same_relative_path() {
        let checkout = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let template = template_with(vec![rule("README.md", "", "")], &checkout, &project);
        let conditions = Conditions::with_env(ProcessEnv::new());

        let report = copy_template(&template, &AnswerMap::new(), &conditions)
            .await
            .unwrap();

        assert!(report.is_clean());
        assert_eq!(report.applied.len(), 1);
        let copied = std::fs::read_to_string(template.project_dir.join("README.md")).unwrap();
        assert_eq!(copied, "# {{ Vars.Title }}\n");
    }

    #[tokio::test]
    async fn test_copies_directory_recursively_into_remapped_path() {
        let checkout = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let template = template_with(vec![rule("docker", "ops", "")], &checkout, &project);
        let conditions = Conditions::with_env(ProcessEnv::new());

        copy_template(&template, &AnswerMap::new(), &conditions)
            .await
            .unwrap();

        let ops = template.project_dir.join("ops");
        assert!(ops.join("Dockerfile").is_file());
        assert!(ops.join("compose").join("dev.yml").is_file());
    }

    #[tokio::test]
    async fn test_overwrites_existing_files() {
        let checkout = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let template = template_with(vec![rule("README.md", "", "")], &checkout, &project);
        std::fs::create_dir_all(&template.project_dir).unwrap();
        std::fs::write(template.project_dir.join("README.md"), "old").unwrap();
        let conditions = Conditions::with_env(ProcessEnv::new());

        copy_template(&template, &AnswerMap::new(), &conditions)
            .await
            .unwrap();

        let copied = std::fs::read_to_string(template.project_dir.join("README.md")).unwrap();
        assert_eq!(copied, "# {{ Vars.Title }}\n");
    }

    #[tokio::test]
    async fn test_gated_rules_follow_answers() {
        let checkout = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let template = template_with(
            vec![
                rule("docker", "", "Answers.Docker"),
                rule("README.md", "", "never"),
            ],
            &checkout,
            &project,
        );
        let conditions = Conditions::with_env(ProcessEnv::new());

        let mut answers = AnswerMap::new();
        answers.record("Docker", Answer::Bool(false), Answer::Bool(false));
        let report = copy_template(&template, &answers, &conditions)
            .await
            .unwrap();

        assert!(report.applied.is_empty());
        assert_eq!(report.skipped.len(), 2);
        assert!(!template.project_dir.join("docker").exists());
    }

    #[tokio::test]
    async fn test_failed_rule_does_not_stop_later_rules() {
        let checkout = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let template = template_with(
            vec![rule("missing.txt", "", ""), rule("README.md", "", "")],
            &checkout,
            &project,
        );
        let conditions = Conditions::with_env(ProcessEnv::new());

        let report = copy_template(&template, &AnswerMap::new(), &conditions)
            .await
            .unwrap();

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0.from, "missing.txt");
        assert!(matches!(report.failed[0].1, QuarryError::Copy { .. }));
        assert_eq!(report.applied.len(), 1);
        assert!(template.project_dir.join("README.md").is_file());
    }

    #[tokio::test]
    async fn test_absolute_into_is_refused() {
        let checkout = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let outside = elsewhere.path().join("written_outside.txt");
        let template = template_with(
            vec![
                rule("README.md", &outside.to_string_lossy(), ""),
                rule("docker", "", ""),
            ],
            &checkout,
            &project,
        );
        let conditions = Conditions::with_env(ProcessEnv::new());

        let report = copy_template(&template, &AnswerMap::new(), &conditions)
            .await
            .unwrap();

        assert!(!outside.exists());
        assert_eq!(report.failed.len(), 1);
        assert!(matches!(report.failed[0].1, QuarryError::Copy { .. }));
        assert!(template.project_dir.join("docker").join("Dockerfile").is_file());
    }

    #[tokio::test]
    async fn test_parent_dir_in_from_is_refused() {
        let checkout = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        std::fs::write(checkout.path().join("secret.txt"), "hidden").unwrap();
        let template = template_with(vec![rule("../secret.txt", "leak.txt", "")], &checkout, &project);
        let conditions = Conditions::with_env(ProcessEnv::new());

        let report = copy_template(&template, &AnswerMap::new(), &conditions)
            .await
            .unwrap();

        assert_eq!(report.failed.len(), 1);
        assert!(report.applied.is_empty());
        assert!(!template.project_dir.join("leak.txt").exists());
    }

    #[tokio::test]
    async fn test_broken_when_is_fatal() {
        let checkout = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let template = template_with(vec![rule("README.md", "", "Answers.(")], &checkout, &project);
        let conditions = Conditions::with_env(ProcessEnv::new());

        let err = copy_template(&template, &AnswerMap::new(), &conditions)
            .await
            .unwrap_err();
        assert!(matches!(err, QuarryError::WhenCompile { .. }));
    }
}
