//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface that each binary must implement to
//! configure where templates come from and how projects are recognized.

/// Configuration trait for different CLI products
///
/// Each product implements this trait to define:
/// - Product identity (name, display name)
/// - Where core and shorthand template sources resolve to
/// - Where local templates and cached checkouts live
/// - Descriptor file names for templates and projects
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for env vars and the home directory)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Hosting provider for core and shorthand template sources
    fn template_host(&self) -> &'static str {
        "github.com"
    }

    /// Environment variable name for overriding the template host
    fn template_host_env(&self) -> String {
        format!("{}_TEMPLATE_HOST", self.name().to_uppercase())
    }

    /// Organization owning the core templates
    fn template_org(&self) -> &'static str;

    /// Repository name prefix of core templates
    fn template_repo_prefix(&self) -> &'static str {
        "cli-project-template-"
    }

    /// Directory under the user's home holding templates and caches
    fn home_dir_name(&self) -> String {
        format!(".{}", self.name())
    }

    /// Template descriptor (manifest) file name
    fn manifest_file_name(&self) -> &'static str {
        "template.yml"
    }

    /// Project descriptor file name
    fn project_file_name(&self) -> &'static str {
        "project.yml"
    }
}
