//! Tool declarations for LLM tool-calling frameworks.
//!
//! Each service operation has a parameter struct whose JSON Schema is
//! generated by `schemars`. [`tool_definitions`] lists them and
//! [`execute_tool`] decodes a tool call and runs the matching operation.

use schemars::{schema_for, JsonSchema};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::api::{IssueApi, SearchRequest};
use crate::operation::OperationError;
use crate::service::JiraService;

/// Page size used when a search does not specify one.
pub const DEFAULT_MAX_RESULTS: u32 = 10;

fn default_max_results() -> u32 {
    DEFAULT_MAX_RESULTS
}

/// Parameters for `search_issues`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchIssuesParams {
    #[schemars(description = "JQL query string, e.g. 'project = PROJ AND status = \"In Progress\"'.")]
    pub jql: String,
    #[schemars(description = "Index of the first issue to return (0-based).")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<u32>,
    #[schemars(description = "Entities to expand in each issue, e.g. 'renderedFields', 'changelog'.")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand: Option<Vec<String>>,
    #[schemars(description = "Maximum number of issues to return.")]
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

impl SearchIssuesParams {
    /// A search for `jql` with default paging.
    pub fn new(jql: impl Into<String>) -> Self {
        Self {
            jql: jql.into(),
            start_at: None,
            expand: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// The request body forwarded to the client.
    pub fn into_request(self) -> SearchRequest {
        SearchRequest {
            jql: self.jql,
            start_at: self.start_at,
            max_results: self.max_results,
            expand: self.expand,
        }
    }
}

/// Parameters for `get_issue`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GetIssueParams {
    #[schemars(description = "Issue key or ID, e.g. 'PROJ-123'.")]
    pub issue_key: String,
    #[schemars(description = "Comma-separated entities to expand, e.g. 'renderedFields,names'.")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand: Option<String>,
}

/// Parameters for `get_issue_comments`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GetIssueCommentsParams {
    #[schemars(description = "Issue key or ID, e.g. 'PROJ-123'.")]
    pub issue_key: String,
    #[schemars(description = "Entities to expand in each comment, e.g. 'renderedBody'.")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand: Option<String>,
}

/// Parameters for `post_issue_comment`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostIssueCommentParams {
    #[schemars(description = "Issue key or ID, e.g. 'PROJ-123'.")]
    pub issue_key: String,
    #[schemars(
        description = "Comment text. Use JIRA wiki markup (e.g. 'h1. Title', '*bold*', '{code}...{code}'), not Markdown."
    )]
    pub comment: String,
}

/// Parameters for `create_issue`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueParams {
    #[schemars(description = "Key of the project to create the issue in, e.g. 'PROJ'.")]
    pub project_key: String,
    #[schemars(description = "One-line issue summary.")]
    pub summary: String,
    #[schemars(description = "Issue description in JIRA wiki markup.")]
    pub description: String,
    #[schemars(description = "ID of the issue type, e.g. '10001'.")]
    pub issue_type_id: String,
    #[schemars(
        description = "Extra fields keyed by field ID, e.g. {\"customfield_10016\": 3}. These replace standard fields of the same name."
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Map<String, Value>>,
}

/// A tool the framework can offer to a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Machine-readable tool name.
    pub name: String,
    /// What the tool does.
    pub description: String,
    /// JSON Schema of the tool's arguments.
    pub parameters: Value,
}

impl ToolDefinition {
    fn of<T: JsonSchema>(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters: schema_for!(T).to_value(),
        }
    }
}

/// Names of the tools in [`tool_definitions`].
pub const TOOL_NAMES: [&str; 5] = [
    "search_issues",
    "get_issue",
    "get_issue_comments",
    "post_issue_comment",
    "create_issue",
];

/// Declarations for every service operation.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::of::<SearchIssuesParams>(
            TOOL_NAMES[0],
            "Search JIRA issues with a JQL query.",
        ),
        ToolDefinition::of::<GetIssueParams>(TOOL_NAMES[1], "Fetch a single JIRA issue by key."),
        ToolDefinition::of::<GetIssueCommentsParams>(
            TOOL_NAMES[2],
            "Fetch the comments on a JIRA issue.",
        ),
        ToolDefinition::of::<PostIssueCommentParams>(
            TOOL_NAMES[3],
            "Add a comment to a JIRA issue.",
        ),
        ToolDefinition::of::<CreateIssueParams>(TOOL_NAMES[4], "Create a new JIRA issue."),
    ]
}

/// Errors from [`execute_tool`].
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool with this name is declared.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The arguments do not match the tool's schema.
    #[error("Invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    /// The operation itself failed.
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// The operation succeeded but its result could not be encoded.
    #[error("Failed to encode result: {0}")]
    Encode(#[source] serde_json::Error),
}

fn decode<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|source| ToolError::InvalidArguments {
        tool: tool.to_string(),
        source,
    })
}

fn encode<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(ToolError::Encode)
}

/// Run the tool `name` with JSON `arguments` against `service`.
#[instrument(skip(service, arguments))]
pub async fn execute_tool<C: IssueApi>(
    service: &JiraService<C>,
    name: &str,
    arguments: Value,
) -> Result<Value, ToolError> {
    debug!("Executing tool");

    match name {
        "search_issues" => {
            let params: SearchIssuesParams = decode(name, arguments)?;
            encode(&service.search_issues(params).await?)
        }
        "get_issue" => {
            let params: GetIssueParams = decode(name, arguments)?;
            encode(
                &service
                    .get_issue(&params.issue_key, params.expand.as_deref())
                    .await?,
            )
        }
        "get_issue_comments" => {
            let params: GetIssueCommentsParams = decode(name, arguments)?;
            encode(
                &service
                    .get_issue_comments(&params.issue_key, params.expand.as_deref())
                    .await?,
            )
        }
        "post_issue_comment" => {
            let params: PostIssueCommentParams = decode(name, arguments)?;
            encode(
                &service
                    .post_issue_comment(&params.issue_key, &params.comment)
                    .await?,
            )
        }
        "create_issue" => {
            let params: CreateIssueParams = decode(name, arguments)?;
            encode(&service.create_issue(params).await?)
        }
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}
