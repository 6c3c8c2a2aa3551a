//! Issue configuration: defaults plus the list of scheduled issue definitions.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::Month;
use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, RepoParseError};
use crate::types::FieldValueRequest;

/// Configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// Project and repository used by issues that do not override them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub project_id: String,
    /// `owner/repo`
    #[serde(default)]
    pub target_repo: String,
}

/// One scheduled issue definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub name: String,
    /// Raw month numbers; range checking happens during validation.
    #[serde(default)]
    pub creation_months: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_suffix: Option<String>,
    #[serde(default)]
    pub fields: FieldValueRequest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// `owner/repo`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_repo: Option<String>,
}

impl Issue {
    pub fn is_creation_month(&self, month: Month) -> bool {
        let number = i64::from(month.number_from_month());
        self.creation_months.contains(&number)
    }

    /// Issue-level project id if present, otherwise the default.
    pub fn effective_project_id<'a>(&'a self, defaults: &'a Defaults) -> &'a str {
        self.project_id.as_deref().unwrap_or(&defaults.project_id)
    }

    /// Issue-level repository string if present, otherwise the default.
    pub fn effective_target_repo<'a>(&'a self, defaults: &'a Defaults) -> &'a str {
        self.target_repo.as_deref().unwrap_or(&defaults.target_repo)
    }

    pub fn target_repo(&self, defaults: &Defaults) -> Result<Repo, RepoParseError> {
        self.effective_target_repo(defaults).parse()
    }
}

/// A GitHub repository reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repo {
    pub owner: String,
    pub name: String,
}

impl FromStr for Repo {
    type Err = RepoParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = value.split('/').collect();
        let [owner, name] = parts.as_slice() else {
            return Err(RepoParseError::Format(value.to_string()));
        };
        if owner.is_empty() || name.is_empty() {
            return Err(RepoParseError::EmptyPart(value.to_string()));
        }
        Ok(Self {
            owner: (*owner).to_string(),
            name: (*name).to_string(),
        })
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

impl Config {
    /// Load a configuration file. Files ending in `.toml` are read as TOML, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("loading config file: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let config = match ConfigFormat::for_path(path) {
            ConfigFormat::Yaml => Self::from_yaml_str(&content)?,
            ConfigFormat::Toml => Self::from_toml_str(&content)?,
        };

        log::debug!("loaded config file with {} issue(s)", config.issues.len());
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|err| ConfigError::Parse {
            format: "YAML",
            message: err.to_string(),
            example: Self::example_yaml(),
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse {
            format: "TOML",
            message: err.to_string(),
            example: Self::example_toml(),
        })
    }

    /// A small, valid configuration used to show the expected layout.
    pub fn example() -> Self {
        Self {
            defaults: Defaults {
                project_id: "PVT_xxx".to_string(),
                target_repo: "owner/repo".to_string(),
            },
            issues: vec![Issue {
                name: "Example Issue".to_string(),
                creation_months: vec![1, 2],
                template_file: Some(".github/ISSUE_TEMPLATE/example.md".to_string()),
                title_prefix: Some("[{{YearMonth}}]".to_string()),
                fields: FieldValueRequest::new().with("SP", "5").with("Status", "Ready"),
                ..Issue::default()
            }],
        }
    }

    fn example_yaml() -> String {
        serde_yaml::to_string(&Self::example()).unwrap_or_default()
    }

    fn example_toml() -> String {
        toml::to_string(&Self::example()).unwrap_or_default()
    }
}
