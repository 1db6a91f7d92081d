//! JIRA API request and response types.
//!
//! These types model the JIRA REST API payloads for issues, search results and
//! comments. Issue fields are kept as a JSON map because `expand` and custom
//! fields make their shape open-ended.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Request body for `POST /rest/api/{v}/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// The JQL query string.
    pub jql: String,
    /// The index of the first issue to return (0-based).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<u32>,
    /// Maximum number of issues to return.
    pub max_results: u32,
    /// Entities to expand in each returned issue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand: Option<Vec<String>>,
}

/// Search result from a JQL query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// The index of the first result.
    #[serde(default)]
    pub start_at: u32,
    /// Maximum results requested.
    #[serde(default)]
    pub max_results: u32,
    /// Total number of matching issues.
    #[serde(default)]
    pub total: u32,
    /// The list of issues.
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// A JIRA issue.
///
/// Returned by `GET /rest/api/{v}/issue/{issueKey}` or as part of search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// The issue ID.
    pub id: String,
    /// The issue key (e.g., "PROJ-123").
    pub key: String,
    /// REST URL of the issue.
    #[serde(rename = "self", default)]
    pub self_url: String,
    /// The issue fields, keyed by field ID.
    #[serde(default)]
    pub fields: Map<String, Value>,
    /// Expanded rendered fields, changelog, etc. when requested.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Issue {
    /// Look up a raw field value.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get the issue summary, or an empty string if absent.
    pub fn summary(&self) -> &str {
        self.field("summary").and_then(Value::as_str).unwrap_or("")
    }

    /// Get the issue status name, if present.
    pub fn status(&self) -> Option<&str> {
        self.named_field("status")
    }

    /// Get the issue type name, if present.
    pub fn issue_type(&self) -> Option<&str> {
        self.named_field("issuetype")
    }

    /// Get the project key, if present.
    pub fn project_key(&self) -> Option<&str> {
        self.field("project")
            .and_then(|p| p.get("key"))
            .and_then(Value::as_str)
    }

    fn named_field(&self, name: &str) -> Option<&str> {
        self.field(name)
            .and_then(|v| v.get("name"))
            .and_then(Value::as_str)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.summary())
    }
}

/// A JIRA user, as embedded in comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user's account ID (Cloud).
    #[serde(default)]
    pub account_id: Option<String>,
    /// The user's name (Server / Data Center).
    #[serde(default)]
    pub name: Option<String>,
    /// The user's display name.
    #[serde(default)]
    pub display_name: String,
    /// The user's email address (may be hidden).
    #[serde(default)]
    pub email_address: Option<String>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name)
    }
}

/// A comment on a JIRA issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// The comment ID.
    pub id: String,
    /// The comment body: a string in API v2, an ADF document in v3.
    #[serde(default)]
    pub body: Value,
    /// The user who authored the comment.
    #[serde(default)]
    pub author: Option<User>,
    /// When the comment was created.
    #[serde(default)]
    pub created: Option<String>,
    /// When the comment was last updated.
    #[serde(default)]
    pub updated: Option<String>,
    /// REST URL of the comment.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
}

impl Comment {
    /// The body as text when the server returned a plain string.
    pub fn body_text(&self) -> Option<&str> {
        self.body.as_str()
    }
}

/// A page of comments.
///
/// Returned by `GET /rest/api/{v}/issue/{issueKey}/comment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageOfComments {
    /// The index of the first result.
    #[serde(default)]
    pub start_at: u32,
    /// Maximum results requested.
    #[serde(default)]
    pub max_results: u32,
    /// Total number of comments.
    #[serde(default)]
    pub total: u32,
    /// The list of comments.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Request body for adding a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentBody {
    /// The comment text, in whatever markup the target API version expects.
    pub body: String,
}

/// Request body for `POST /rest/api/{v}/issue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueUpdateDetails {
    /// Field values keyed by field ID.
    pub fields: Map<String, Value>,
}

/// Response from issue creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    /// The new issue's ID.
    pub id: String,
    /// The new issue's key.
    pub key: String,
    /// REST URL of the new issue.
    #[serde(rename = "self", default)]
    pub self_url: String,
}
