use anyhow::{Context, Result};
use clap::Args;
use comfy_table::Cell;
use serde::Serialize;

use issueplan::{FieldDefinition, ProjectSchemaProvider, SchemaIndex};

use crate::commands::{ExampleGroup, github_client};
use crate::output::{GlobalOptions, OutputManager, TableDisplay, themed_table};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Inspect Project Fields",
    commands: &[
        "issueplan --output table fields --project PVT_kwDOABC  # Field names, types and options",
        "issueplan fields --project PVT_kwDOABC --owner octo    # JSON for scripting",
    ],
}];

#[derive(Args)]
pub struct FieldsArgs {
    /// Project node id (PVT_...)
    #[arg(short, long)]
    pub project: String,

    /// Login of the project owner, used for diagnostics
    #[arg(long, default_value = "")]
    pub owner: String,
}

#[derive(Serialize)]
pub struct FieldsReport {
    pub project_id: String,
    pub title: Option<String>,
    pub fields: Vec<FieldDefinition>,
}

impl TableDisplay for FieldsReport {
    fn to_table(&self, options: &GlobalOptions) -> comfy_table::Table {
        let mut table = themed_table(options, &["Name", "Type", "ID", "Options"]);
        for field in &self.fields {
            table.add_row(vec![
                Cell::new(&field.name),
                Cell::new(field.data_type.as_str()),
                Cell::new(&field.id),
                Cell::new(field.option_names().join(", ")),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        let names: Vec<&str> = self.fields.iter().map(|field| field.name.as_str()).collect();
        format!("{}: {}", self.project_id, names.join(", "))
    }
}

pub async fn handle_fields(args: FieldsArgs, output: &OutputManager) -> Result<()> {
    let client = github_client()?;

    output.progress("Fetching project fields");
    let fields = client.project_fields(&args.project, &args.owner).await;
    output.clear_line();
    let fields = fields.with_context(|| format!("failed to get fields for project {}", args.project))?;

    let title = match client.project_name(&args.project).await {
        Ok(title) => Some(title),
        Err(err) => {
            output.warning(&format!("Could not read project title: {err}"));
            None
        }
    };

    let index = SchemaIndex::build(fields);
    output.info(&format!("{} field(s)", index.len()));

    output.display(&FieldsReport {
        project_id: args.project,
        title,
        fields: index.sorted().into_iter().cloned().collect(),
    })
}
