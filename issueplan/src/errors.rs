use std::path::PathBuf;

use thiserror::Error;

/// Failure to reconcile one requested field against a project's field schema.
///
/// Resolution stops at the first of these; callers never see more than one per
/// request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The field name is not part of the project schema.
    #[error(
        "field '{field}' does not exist in {} (available fields: {})",
        describe_project(.project.as_deref()),
        describe_names(.available)
    )]
    FieldNotFound {
        field: String,
        project: Option<String>,
        available: Vec<String>,
    },

    /// A single-select value does not name one of the field's options.
    #[error(
        "field '{field}': option '{value}' does not exist (valid options: {})",
        describe_names(.valid_options)
    )]
    OptionNotFound {
        field: String,
        value: String,
        valid_options: Vec<String>,
    },

    /// The field exists but its data type has no mapping to an update value.
    #[error("unsupported field type '{data_type}' for field '{field}'")]
    UnsupportedFieldType { field: String, data_type: String },
}

impl ResolutionError {
    /// Name of the requested field this failure concerns.
    pub fn field(&self) -> &str {
        match self {
            Self::FieldNotFound { field, .. }
            | Self::OptionNotFound { field, .. }
            | Self::UnsupportedFieldType { field, .. } => field,
        }
    }
}

fn describe_project(project: Option<&str>) -> String {
    match project {
        Some(name) => format!("project '{name}'"),
        None => "project".to_string(),
    }
}

fn describe_names(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

/// Errors raised while talking to the project schema provider.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("GITHUB_TOKEN environment variable is required")]
    MissingToken,

    #[error("invalid GitHub API url '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("failed to execute GraphQL query: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GraphQL request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error(
        "project not found (ID: {project_id}). This may indicate: 1) the project ID is incorrect, \
         2) the token doesn't have access to this project, or 3) the project belongs to a \
         different organization/user. GraphQL error: {message}"
    )]
    ProjectNotFound { project_id: String, message: String },

    #[error("project name is empty for project ID {0}")]
    EmptyProjectName(String),
}

/// `owner/repo` strings that cannot be split into both halves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoParseError {
    #[error("invalid repository format: {0} (expected 'owner/repo')")]
    Format(String),

    #[error("invalid repository format: {0} (owner and repo must not be empty)")]
    EmptyPart(String),
}

/// Title prefix/suffix templates that cannot be expanded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TitleError {
    #[error("failed to expand {part}: unknown template token '{token}' (supported: Date, Year, Month, YearMonth)")]
    UnknownToken { part: &'static str, token: String },

    #[error("failed to expand {part}: unterminated template token")]
    Unterminated { part: &'static str },
}

/// Everything that can make a single issue definition unusable.
#[derive(Debug, Error)]
pub enum IssueError {
    #[error("name is required")]
    MissingName,

    #[error("creation_months is required and must not be empty")]
    MissingCreationMonths,

    #[error("creation_months[{position}]: invalid month value {value} (must be 1-12)")]
    InvalidMonth { position: usize, value: i64 },

    #[error("template_file is required")]
    MissingTemplate,

    #[error("invalid target_repo: {0}")]
    InvalidRepo(#[from] RepoParseError),

    #[error(transparent)]
    Field(#[from] ResolutionError),

    #[error("failed to get project fields: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Title(#[from] TitleError),
}

/// Top-level error for loading and validating a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {format} format in config file: {message}\n\nExpected schema:\n{example}")]
    Parse {
        format: &'static str,
        message: String,
        example: String,
    },

    #[error("defaults.{0} is required")]
    MissingDefault(&'static str),

    #[error("at least one issue is required")]
    NoIssues,

    #[error("issues[{index}] ({name}): {source}")]
    Issue {
        index: usize,
        name: String,
        #[source]
        source: IssueError,
    },
}

/// Payload construction failure, attributed to the issue that caused it.
#[derive(Debug, Error)]
#[error("failed to build payload for issue '{issue}': {source}")]
pub struct PayloadError {
    pub issue: String,
    #[source]
    pub source: IssueError,
}

/// Month numbers outside the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("month must be between 1 and 12 (got {0})")]
pub struct MonthError(pub i64);
