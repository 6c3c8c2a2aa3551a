pub mod fields;
pub mod plan;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use issueplan::{Config, GitHubClient};

use crate::output::OutputManager;

/// Usage examples shown under one heading in a command's long help.
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

/// Example groups for the subcommand called `name`.
pub fn examples_for(name: &str) -> &'static [ExampleGroup] {
    match name {
        "plan" => plan::EXAMPLES,
        "validate" => validate::EXAMPLES,
        "fields" => fields::EXAMPLES,
        _ => &[],
    }
}

/// Load the issue configuration, reporting what was read.
pub fn load_config(path: &Path, output: &OutputManager) -> Result<Config> {
    output.verbose(&format!("Loading config from {}", path.display()));
    let config = Config::load(path).with_context(|| {
        format!(
            "failed to load config (use --config to point at a different file): {}",
            path.display()
        )
    })?;
    output.verbose(&format!("Loaded {} issue definition(s)", config.issues.len()));
    Ok(config)
}

/// GitHub client configured from the environment.
pub fn github_client() -> Result<GitHubClient> {
    GitHubClient::from_env().context("failed to create GitHub client")
}
