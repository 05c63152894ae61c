//! Fill rules: render copied project files in place

use super::manifest::FillRule;
use super::{contained_join, Template};
use crate::error::{QuarryError, Result};
use crate::prompt::AnswerMap;
use crate::when::Conditions;
use minijinja::{AutoEscape, Environment};
use std::collections::HashSet;
use tokio::fs;
use tracing::{debug, warn};

fn renderer() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    // Project files are plain text whatever their extension
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env
}

/// Render every fill rule whose gate passes, in manifest order
///
/// Each rule sees `Answers`, `Template`, its own `Vars` and `Env`. The first
/// failure aborts the pass. Returns the files that were rendered.
pub async fn fill_template(
    template: &Template,
    answers: &AnswerMap,
    conditions: &Conditions,
) -> Result<Vec<FillRule>> {
    let meta = template.manifest.meta();
    let env = renderer();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut filled = Vec::new();

    for rule in &template.manifest.fill {
        for need in &rule.needs {
            if !seen.contains(need.as_str()) {
                warn!(file = %rule.file, need = %need, "fill rule needs a file that is not filled before it");
            }
        }
        seen.insert(rule.file.as_str());

        let context = conditions
            .environment(answers, &meta)
            .with_vars(&rule.vars);

        if !conditions.gate().evaluate(&rule.when, &context)? {
            debug!(file = %rule.file, when = %rule.when, "skipping fill rule");
            continue;
        }

        let path = contained_join(&template.project_dir, &rule.file).ok_or_else(|| {
            QuarryError::Fill {
                file: rule.file.clone(),
                message: "the file is outside the project".to_string(),
            }
        })?;
        let source = fs::read_to_string(&path)
            .await
            .map_err(|source| QuarryError::FillIo {
                file: rule.file.clone(),
                source,
            })?;

        let rendered = env
            .render_named_str(&rule.file, &source, context)
            .map_err(|e| QuarryError::Fill {
                file: rule.file.clone(),
                message: e.to_string(),
            })?;

        fs::write(&path, rendered)
            .await
            .map_err(|source| QuarryError::FillIo {
                file: rule.file.clone(),
                source,
            })?;

        filled.push(rule.clone());
    }

    Ok(filled)
}
