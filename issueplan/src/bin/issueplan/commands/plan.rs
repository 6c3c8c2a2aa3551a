use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::Cell;
use serde::Serialize;

use issueplan::{
    IssuePayload, ResolvedValue, SchemaCache, SystemClock, build_payloads, current_month, issues_for_month,
    parse_month, validate_config,
};

use crate::commands::{ExampleGroup, github_client, load_config};
use crate::output::{GlobalOptions, OutputManager, TableDisplay, themed_table};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Plan Issues",
        commands: &[
            "issueplan plan --config issues.yml                 # Issues due this month",
            "issueplan plan --config issues.yml --month 4       # Issues due in April",
        ],
    },
    ExampleGroup {
        title: "Inspect",
        commands: &[
            "issueplan --output table plan --config issues.yml  # Human-readable summary",
            "issueplan --debug plan --config issues.yml         # Log GraphQL traffic",
        ],
    },
];

#[derive(Args)]
pub struct PlanArgs {
    /// Path to the issue configuration file (YAML, or TOML with a .toml extension)
    #[arg(short, long, env = "ISSUEPLAN_CONFIG")]
    pub config: PathBuf,

    /// Month (1-12) to plan for; defaults to the current month
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=12))]
    pub month: Option<u8>,
}

/// Payloads for one run, serialized as a bare JSON array.
#[derive(Serialize)]
#[serde(transparent)]
pub struct PlanReport {
    pub payloads: Vec<IssuePayload>,
}

impl TableDisplay for PlanReport {
    fn to_table(&self, options: &GlobalOptions) -> comfy_table::Table {
        let mut table = themed_table(options, &["Title", "Repository", "Project", "Template", "Field updates"]);
        for payload in &self.payloads {
            let updates: Vec<String> = payload
                .field_updates
                .iter()
                .map(|update| match &update.value {
                    ResolvedValue::Text(value) | ResolvedValue::Number(value) => {
                        format!("{} = {value}", update.field_id)
                    }
                    ResolvedValue::SingleSelect { option_id } => format!("{} -> {option_id}", update.field_id),
                })
                .collect();
            table.add_row(vec![
                Cell::new(&payload.title),
                Cell::new(&payload.target_repo),
                Cell::new(&payload.project_id),
                Cell::new(payload.template_file.as_deref().unwrap_or("-")),
                Cell::new(updates.join("\n")),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        let titles: Vec<&str> = self.payloads.iter().map(|payload| payload.title.as_str()).collect();
        format!("{} issue(s): {}", self.payloads.len(), titles.join(" | "))
    }
}

pub async fn handle_plan(args: PlanArgs, output: &OutputManager) -> Result<()> {
    let month = match args.month {
        Some(number) => parse_month(i64::from(number))?,
        None => current_month(),
    };

    let config = load_config(&args.config, output)?;
    let client = github_client()?;
    let cache = SchemaCache::new(&client);

    output.progress("Validating configuration against project fields");
    let validation = validate_config(&config, &cache).await;
    output.clear_line();
    validation.context("config validation failed")?;
    output.success(&format!("Configuration is valid ({} issue definition(s))", config.issues.len()));

    let selected = issues_for_month(&config, month);
    if selected.is_empty() {
        output.warning(&format!("No issues scheduled for {}", month.name()));
    } else {
        output.info(&format!("{} issue(s) scheduled for {}", selected.len(), month.name()));
    }

    let payloads = build_payloads(&selected, &config.defaults, &cache, &SystemClock).await?;
    output.verbose(&format!("Fetched schemas for {} project(s)", cache.cached_projects().await));

    output.display(&PlanReport { payloads })
}
