//! The `new project` pipeline with cliclack output

use super::prompter::CliclackPrompter;
use crate::config::TemplatePaths;
use crate::error::QuarryError;
use crate::product::ProductConfig;
use crate::project::ProjectDir;
use crate::prompt::{AnswerCollector, AnswerMap, AnswerStore};
use crate::templates::{self, CheckoutCache, Resolver, Template, TemplateSource};
use crate::when::Conditions;
use crate::DEFAULT_TEMPLATE;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// Arguments for creating a new project
#[derive(Debug, Clone)]
pub struct NewProjectArgs {
    /// Project directory to create
    pub directory: PathBuf,

    /// Template identifier: core alias, `owner/repo`, or a full URL
    pub template: String,
}

impl Default for NewProjectArgs {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

/// Run the pipeline with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: NewProjectArgs) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Refuse to nest projects
    let project = ProjectDir::new(config, &args.directory)?;
    project.ensure_outside_project()?;

    // Step 2: Find the template, fetching it when remote
    let template_dir = locate_template(config, &args.template).await?;

    // Step 3: Load its manifest
    let template = Template::load(
        &args.template,
        template_dir,
        project.path(),
        config.manifest_file_name(),
    )
    .with_context(|| format!("Failed to load template '{}'", args.template))?;

    cliclack::log::info(format!(
        "Template: {} - {}",
        template.manifest.name, template.manifest.description
    ))?;

    // Step 4: Ask the manifest's questions
    let conditions = Conditions::new();
    let answers = ask_questions(&template, &conditions);
    if matches!(answers, Err(QuarryError::Cancelled)) {
        cliclack::outro_cancel("Setup cancelled.")?;
    }
    let answers = abort_on_cancel(answers)?;

    // Step 5: Copy files, then fill them
    copy_files(&template, &answers, &conditions).await?;
    fill_files(&template, &answers, &conditions).await?;

    cliclack::outro(format!(
        "success. Project created in {}",
        project.path().display()
    ))?;

    Ok(())
}

async fn locate_template<C: ProductConfig>(config: &C, identifier: &str) -> Result<PathBuf> {
    let paths = TemplatePaths::from_config(config)?;
    let resolver = Resolver::from_config(config)?;

    match TemplateSource::locate(identifier, &paths, &resolver, config.manifest_file_name()) {
        TemplateSource::Local(dir) => {
            cliclack::log::info(format!("Using local template from {}", dir.display()))?;
            Ok(dir)
        }
        TemplateSource::Remote(url) => fetch_remote(&paths, url).await,
    }
}

async fn fetch_remote(paths: &TemplatePaths, url: String) -> Result<PathBuf> {
    let cache = CheckoutCache::new(&paths.cache_root);
    let spinner = cliclack::spinner();
    spinner.start(format!("Fetching {}...", url));

    let remote = url.clone();
    let available = tokio::task::spawn_blocking(move || CheckoutCache::is_available(&remote))
        .await
        .context("Template availability check panicked")?;

    if !available {
        if !cache.is_cached(&url) {
            spinner.stop("Template unavailable");
            anyhow::bail!("The remote template provided is not available.");
        }
        spinner.stop("Template unreachable");
        cliclack::log::warning("The remote template could not be reached, using the cached copy.")?;
        return Ok(cache.checkout_path(&url));
    }

    let checkout = {
        let cache = cache.clone();
        let url = url.clone();
        tokio::task::spawn_blocking(move || cache.ensure_fetched(&url))
            .await
            .context("Template fetch panicked")??
    };

    if checkout.fetched {
        spinner.stop(format!("Fetched {}", url));
    } else {
        spinner.stop("Template update failed");
        cliclack::log::warning("Could not update the template, using the cached copy.")?;
    }

    Ok(checkout.path)
}

fn ask_questions(template: &Template, conditions: &Conditions) -> crate::Result<AnswerMap> {
    let mut store = AnswerStore::new();
    let mut prompter = CliclackPrompter::new();

    AnswerCollector::new(conditions).ask(
        &template.manifest.prompt,
        &template.manifest.meta(),
        &mut store,
        &mut prompter,
    )
}

/// A cancelled prompt fails the run so the process exits non-zero
fn abort_on_cancel(answers: crate::Result<AnswerMap>) -> Result<AnswerMap> {
    match answers {
        Err(QuarryError::Cancelled) => anyhow::bail!("Setup cancelled."),
        other => Ok(other?),
    }
}

async fn copy_files(template: &Template, answers: &AnswerMap, conditions: &Conditions) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Copying files...");

    let report = templates::copy_template(template, answers, conditions)
        .await
        .context("Failed to copy template files")?;

    spinner.stop(format!(
        "Copied {} of {} rules into {}",
        report.applied.len(),
        template.manifest.copy.len(),
        template.project_dir.display()
    ));

    for rule in &report.applied {
        cliclack::log::remark(format!(
            " {} From /{} to /{}",
            "+".green(),
            rule.from,
            rule.destination()
        ))?;
    }
    for (_, error) in &report.failed {
        cliclack::log::error(error.to_string())?;
    }

    Ok(())
}

async fn fill_files(template: &Template, answers: &AnswerMap, conditions: &Conditions) -> Result<()> {
    if template.manifest.fill.is_empty() {
        return Ok(());
    }

    let spinner = cliclack::spinner();
    spinner.start("Filling files...");

    let filled = match templates::fill_template(template, answers, conditions).await {
        Ok(filled) => filled,
        Err(e) => {
            spinner.stop("Fill failed");
            return Err(e).context("Failed to fill template files");
        }
    };

    spinner.stop(format!("Filled {} files", filled.len()));

    for rule in &filled {
        cliclack::log::remark(format!(" {} Filling /{}", "+".green(), rule.file))?;
    }

    Ok(())
}
