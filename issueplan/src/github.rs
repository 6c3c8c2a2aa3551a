//! GitHub GraphQL access to ProjectV2 field schemas.

use std::future::Future;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

use crate::errors::TransportError;
use crate::types::{FieldDataType, FieldDefinition, FieldOption};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const FIELDS_PAGE_SIZE: u32 = 100;

const PROJECT_FIELDS_QUERY: &str = r#"
query($projectId: ID!, $first: Int!, $cursor: String) {
  node(id: $projectId) {
    ... on ProjectV2 {
      fields(first: $first, after: $cursor) {
        pageInfo {
          hasNextPage
          endCursor
        }
        nodes {
          ... on ProjectV2Field {
            id
            name
            dataType
          }
          ... on ProjectV2IterationField {
            id
            name
            dataType
          }
          ... on ProjectV2SingleSelectField {
            id
            name
            dataType
            options {
              id
              name
            }
          }
        }
      }
    }
  }
}
"#;

const PROJECT_TITLE_QUERY: &str = r#"
query($projectId: ID!) {
  node(id: $projectId) {
    ... on ProjectV2 {
      title
    }
  }
}
"#;

/// Supplies the field schema of a project.
pub trait ProjectSchemaProvider {
    /// All fields of `project_id`. `owner` is the login owning the target repository.
    fn project_fields(
        &self,
        project_id: &str,
        owner: &str,
    ) -> impl Future<Output = Result<Vec<FieldDefinition>, TransportError>> + Send;

    /// Display title of `project_id`.
    fn project_name(&self, project_id: &str) -> impl Future<Output = Result<String, TransportError>> + Send;
}

/// GraphQL client for the GitHub API.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    graphql_url: Url,
    token: String,
}

impl GitHubClient {
    /// Builds a client from `GITHUB_TOKEN` (required) and `GITHUB_API_URL` (optional).
    pub fn from_env() -> Result<Self, TransportError> {
        let token = std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|token| !token.is_empty())
            .ok_or(TransportError::MissingToken)?;
        let api_url = std::env::var("GITHUB_API_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(token, &api_url)
    }

    /// Builds a client against `api_url`; GraphQL requests go to `{api_url}/graphql`.
    pub fn new(token: impl Into<String>, api_url: &str) -> Result<Self, TransportError> {
        let invalid = |message: String| TransportError::InvalidBaseUrl {
            url: api_url.to_string(),
            message,
        };
        let mut base = Url::parse(api_url).map_err(|err| invalid(err.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let graphql_url = base.join("graphql").map_err(|err| invalid(err.to_string()))?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("issueplan/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            graphql_url,
            token: token.into(),
        })
    }

    pub fn graphql_url(&self) -> &Url {
        &self.graphql_url
    }

    async fn execute<T>(&self, query: &str, variables: Value, project_id: &str) -> Result<T, TransportError>
    where
        T: DeserializeOwned + Default,
    {
        let response = self
            .http
            .post(self.graphql_url.clone())
            .bearer_auth(&self.token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        log::debug!("GraphQL response status: {}", status.as_u16());
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GraphQlResponse<T> = response.json().await?;
        if !envelope.errors.is_empty() {
            for error in &envelope.errors {
                log::debug!("GraphQL error: {} - {}", error.kind.as_deref().unwrap_or("UNKNOWN"), error.message);
            }
            if let Some(not_found) = envelope
                .errors
                .iter()
                .find(|error| error.kind.as_deref() == Some("NOT_FOUND"))
            {
                return Err(TransportError::ProjectNotFound {
                    project_id: project_id.to_string(),
                    message: not_found.message.clone(),
                });
            }
            return Err(TransportError::GraphQl(
                envelope.errors.iter().map(GraphQlError::describe).collect(),
            ));
        }

        Ok(envelope.data.unwrap_or_default())
    }
}

impl ProjectSchemaProvider for GitHubClient {
    async fn project_fields(&self, project_id: &str, owner: &str) -> Result<Vec<FieldDefinition>, TransportError> {
        let mut fields = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let variables = json!({
                "projectId": project_id,
                "first": FIELDS_PAGE_SIZE,
                "cursor": cursor,
            });
            let data: FieldsData = self.execute(PROJECT_FIELDS_QUERY, variables, project_id).await?;
            let connection = data.node.and_then(|node| node.fields).unwrap_or_default();

            log::debug!(
                "GraphQL response - hasNextPage: {}, endCursor: {}, nodes count: {}",
                connection.page_info.has_next_page,
                connection.page_info.end_cursor.as_deref().unwrap_or(""),
                connection.nodes.len()
            );
            if connection.nodes.is_empty() && cursor.is_none() {
                log::debug!(
                    "no fields found in first page for project {project_id} (owner {owner}); \
                     this may indicate a permissions issue or a project without custom fields"
                );
            }

            fields.extend(connection.nodes.into_iter().flatten().filter_map(FieldNode::into_definition));

            match (connection.page_info.has_next_page, connection.page_info.end_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        Ok(fields)
    }

    async fn project_name(&self, project_id: &str) -> Result<String, TransportError> {
        let data: TitleData = self
            .execute(PROJECT_TITLE_QUERY, json!({ "projectId": project_id }), project_id)
            .await?;
        data.node
            .and_then(|node| node.title)
            .filter(|title| !title.is_empty())
            .ok_or_else(|| TransportError::EmptyProjectName(project_id.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl GraphQlError {
    fn describe(&self) -> String {
        match &self.kind {
            Some(kind) => format!("{kind}: {}", self.message),
            None => self.message.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FieldsData {
    node: Option<FieldsNode>,
}

#[derive(Debug, Default, Deserialize)]
struct FieldsNode {
    fields: Option<FieldConnection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldConnection {
    #[serde(default)]
    page_info: PageInfo,
    #[serde(default)]
    nodes: Vec<Option<FieldNode>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    #[serde(default)]
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldNode {
    id: Option<String>,
    name: Option<String>,
    data_type: Option<String>,
    #[serde(default)]
    options: Vec<FieldOption>,
}

impl FieldNode {
    /// Nodes of field kinds not selected by the query come back empty and are skipped.
    fn into_definition(self) -> Option<FieldDefinition> {
        let (Some(id), Some(name), Some(data_type)) = (self.id, self.name, self.data_type) else {
            return None;
        };
        Some(FieldDefinition {
            id,
            name,
            data_type: FieldDataType::from_github(&data_type),
            options: self.options,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct TitleData {
    node: Option<TitleNode>,
}

#[derive(Debug, Deserialize)]
struct TitleNode {
    title: Option<String>,
}
