//! Creation payloads for the issues selected for a run.

use std::collections::HashSet;

use serde::Serialize;

use crate::cache::SchemaCache;
use crate::config::{Defaults, Issue};
use crate::errors::{IssueError, PayloadError};
use crate::github::ProjectSchemaProvider;
use crate::resolver::{LogSink, resolve_fields};
use crate::title::{Clock, render_title};
use crate::types::ResolvedFieldUpdate;

/// Everything a downstream job needs to create one issue and set its project fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuePayload {
    pub name: String,
    pub title: String,
    pub template_file: Option<String>,
    pub project_id: String,
    pub target_repo: String,
    pub field_updates: Vec<ResolvedFieldUpdate>,
}

/// Builds the payload for one issue. Any failure aborts the whole issue.
pub async fn build_payload<P, C>(
    issue: &Issue,
    defaults: &Defaults,
    cache: &SchemaCache<'_, P>,
    clock: &C,
) -> Result<IssuePayload, IssueError>
where
    P: ProjectSchemaProvider,
    C: Clock + ?Sized,
{
    let repo = issue.target_repo(defaults)?;
    let project_id = issue.effective_project_id(defaults);

    let index = cache.schema(project_id, &repo.owner).await?;
    let field_updates = resolve_fields(&issue.fields, &index, &LogSink)?;

    let title = render_title(
        issue.title_prefix.as_deref(),
        &issue.name,
        issue.title_suffix.as_deref(),
        clock.today(),
    )?;

    Ok(IssuePayload {
        name: issue.name.clone(),
        title,
        template_file: issue.template_file.clone(),
        project_id: project_id.to_string(),
        target_repo: repo.to_string(),
        field_updates,
    })
}

/// Builds payloads for `issues` in order, stopping at the first issue that fails.
///
/// The display name of each project is logged the first time it is used;
/// failing to fetch it is only a warning.
pub async fn build_payloads<P, C>(
    issues: &[&Issue],
    defaults: &Defaults,
    cache: &SchemaCache<'_, P>,
    clock: &C,
) -> Result<Vec<IssuePayload>, PayloadError>
where
    P: ProjectSchemaProvider,
    C: Clock + ?Sized,
{
    let mut payloads = Vec::with_capacity(issues.len());
    let mut announced: HashSet<&str> = HashSet::new();

    for issue in issues {
        let project_id = issue.effective_project_id(defaults);
        if announced.insert(project_id) {
            match cache.project_name(project_id).await {
                Ok(name) => log::info!("Project: {name}"),
                Err(err) => log::warn!("failed to get project name for {project_id}: {err}"),
            }
        }

        let payload = build_payload(issue, defaults, cache, clock)
            .await
            .map_err(|source| PayloadError {
                issue: issue.name.clone(),
                source,
            })?;
        payloads.push(payload);
    }

    Ok(payloads)
}
