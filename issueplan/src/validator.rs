//! Pre-flight validation of a configuration against live project schemas.

use crate::cache::SchemaCache;
use crate::config::{Config, Defaults, Issue};
use crate::errors::{ConfigError, IssueError};
use crate::github::ProjectSchemaProvider;
use crate::resolver::{LogSink, validate_fields};

/// Structural checks that need no project schema.
pub fn validate_issue(issue: &Issue) -> Result<(), IssueError> {
    if issue.name.is_empty() {
        return Err(IssueError::MissingName);
    }
    if issue.creation_months.is_empty() {
        return Err(IssueError::MissingCreationMonths);
    }
    if issue.template_file.is_none() {
        return Err(IssueError::MissingTemplate);
    }
    if let Some((position, &value)) = issue
        .creation_months
        .iter()
        .enumerate()
        .find(|(_, month)| !(1..=12).contains(*month))
    {
        return Err(IssueError::InvalidMonth { position, value });
    }
    Ok(())
}

/// Structural checks, target repository format, then field validation
/// against the schema of the issue's effective project.
pub async fn validate_issue_with_project<P>(
    issue: &Issue,
    defaults: &Defaults,
    cache: &SchemaCache<'_, P>,
) -> Result<(), IssueError>
where
    P: ProjectSchemaProvider,
{
    validate_issue(issue)?;

    let repo = issue.target_repo(defaults)?;
    let project_id = issue.effective_project_id(defaults);
    let index = cache.schema(project_id, &repo.owner).await?;

    validate_fields(&issue.fields, &index, Some(project_id), &LogSink)?;
    Ok(())
}

/// Validates defaults and every issue, stopping at the first failing issue.
pub async fn validate_config<P>(config: &Config, cache: &SchemaCache<'_, P>) -> Result<(), ConfigError>
where
    P: ProjectSchemaProvider,
{
    if config.defaults.project_id.is_empty() {
        return Err(ConfigError::MissingDefault("project_id"));
    }
    if config.defaults.target_repo.is_empty() {
        return Err(ConfigError::MissingDefault("target_repo"));
    }
    if config.issues.is_empty() {
        return Err(ConfigError::NoIssues);
    }

    for (index, issue) in config.issues.iter().enumerate() {
        validate_issue_with_project(issue, &config.defaults, cache)
            .await
            .map_err(|source| ConfigError::Issue {
                index,
                name: issue.name.clone(),
                source,
            })?;
        log::debug!("issues[{index}] ({}) is valid", issue.name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_issue() -> Issue {
        Issue {
            name: "Monthly report".to_string(),
            creation_months: vec![1, 6],
            template_file: Some("report.md".to_string()),
            ..Issue::default()
        }
    }

    #[test]
    fn accepts_complete_issue() {
        assert!(validate_issue(&valid_issue()).is_ok());
    }

    #[test]
    fn requires_name() {
        let issue = Issue {
            name: String::new(),
            ..valid_issue()
        };
        assert!(matches!(validate_issue(&issue), Err(IssueError::MissingName)));
    }

    #[test]
    fn requires_months() {
        let issue = Issue {
            creation_months: Vec::new(),
            ..valid_issue()
        };
        assert!(matches!(validate_issue(&issue), Err(IssueError::MissingCreationMonths)));
    }

    #[test]
    fn requires_template() {
        let issue = Issue {
            template_file: None,
            ..valid_issue()
        };
        assert!(matches!(validate_issue(&issue), Err(IssueError::MissingTemplate)));
    }

    #[test]
    fn reports_first_out_of_range_month() {
        let issue = Issue {
            creation_months: vec![3, 0, 13],
            ..valid_issue()
        };
        assert!(matches!(
            validate_issue(&issue),
            Err(IssueError::InvalidMonth { position: 1, value: 0 })
        ));

        let issue = Issue {
            creation_months: vec![12, 13],
            ..valid_issue()
        };
        let err = validate_issue(&issue).unwrap_err();
        assert_eq!(err.to_string(), "creation_months[1]: invalid month value 13 (must be 1-12)");
    }
}
