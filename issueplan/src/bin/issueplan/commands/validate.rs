use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::Cell;
use serde::Serialize;

use issueplan::{SchemaCache, validate_config};

use crate::commands::{ExampleGroup, github_client, load_config};
use crate::output::{GlobalOptions, OutputManager, TableDisplay, themed_table};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Validate Configuration",
    commands: &[
        "issueplan validate --config issues.yml             # Check every issue against its project",
        "issueplan -q validate --config issues.yml          # Exit status only",
    ],
}];

#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the issue configuration file (YAML, or TOML with a .toml extension)
    #[arg(short, long, env = "ISSUEPLAN_CONFIG")]
    pub config: PathBuf,
}

#[derive(Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub issues: usize,
    pub projects: Vec<String>,
}

impl TableDisplay for ValidationReport {
    fn to_table(&self, options: &GlobalOptions) -> comfy_table::Table {
        let mut table = themed_table(options, &["Valid", "Issues", "Projects"]);
        table.add_row(vec![
            Cell::new(self.valid),
            Cell::new(self.issues),
            Cell::new(self.projects.join("\n")),
        ]);
        table
    }

    fn to_compact(&self) -> String {
        format!("valid={} issues={} projects={}", self.valid, self.issues, self.projects.len())
    }
}

pub async fn handle_validate(args: ValidateArgs, output: &OutputManager) -> Result<()> {
    let config = load_config(&args.config, output)?;
    let client = github_client()?;
    let cache = SchemaCache::new(&client);

    output.progress("Validating configuration against project fields");
    let validation = validate_config(&config, &cache).await;
    output.clear_line();
    validation.context("config validation failed")?;

    output.success("Configuration is valid");
    for issue in &config.issues {
        output.bullet(&format!("{} (months {:?})", issue.name, issue.creation_months));
    }

    let projects: BTreeSet<String> = config
        .issues
        .iter()
        .map(|issue| issue.effective_project_id(&config.defaults).to_string())
        .collect();

    output.display(&ValidationReport {
        valid: true,
        issues: config.issues.len(),
        projects: projects.into_iter().collect(),
    })
}
