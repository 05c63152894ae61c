//! Quarry CLI - project scaffolding from templates

use anyhow::Result;
use clap::{Parser, Subcommand};
use quarry_core::{NewProjectArgs, ProductConfig, DEFAULT_TEMPLATE};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Quarry product configuration
#[derive(Clone)]
pub struct QuarryConfig;

impl ProductConfig for QuarryConfig {
    fn name(&self) -> &'static str {
        "quarry"
    }

    fn display_name(&self) -> &'static str {
        "Quarry"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for scaffolding projects from templates"
    }

    fn template_org(&self) -> &'static str {
        "quarryhq"
    }
}

#[derive(Parser, Debug)]
#[command(name = "quarry")]
#[command(about = "CLI for scaffolding projects from templates")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create something new
    #[command(subcommand)]
    New(NewCommand),
}

#[derive(Subcommand, Debug)]
pub enum NewCommand {
    /// Create a new project from a template
    Project(CliProjectArgs),
}

#[derive(Parser, Debug)]
pub struct CliProjectArgs {
    /// Project directory to create
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Template to use: core name, owner/repo, or a full repository URL
    #[arg(short, long, default_value = DEFAULT_TEMPLATE)]
    pub template: String,
}

impl From<CliProjectArgs> for NewProjectArgs {
    fn from(args: CliProjectArgs) -> Self {
        NewProjectArgs {
            directory: args.directory,
            template: args.template,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    init_tracing();

    let args = Args::parse();
    let config = QuarryConfig;

    match args.command {
        Command::New(NewCommand::Project(project_args)) => {
            let result = quarry_core::run(&config, project_args.into()).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_project_defaults() {
        let args = Args::try_parse_from(["quarry", "new", "project"]).unwrap();
        let Command::New(NewCommand::Project(project)) = args.command;
        assert_eq!(project.directory, PathBuf::from("."));
        assert_eq!(project.template, "empty");
    }

    #[test]
    fn test_new_project_with_template() {
        let args =
            Args::try_parse_from(["quarry", "new", "project", "app", "-t", "acme/starter"]).unwrap();
        let Command::New(NewCommand::Project(project)) = args.command;
        assert_eq!(project.directory, PathBuf::from("app"));
        assert_eq!(project.template, "acme/starter");
    }

    #[test]
    fn test_config_defaults() {
        let config = QuarryConfig;
        assert_eq!(config.home_dir_name(), ".quarry");
        assert_eq!(config.template_host_env(), "QUARRY_TEMPLATE_HOST");
    }
}
