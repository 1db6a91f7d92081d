//! jira-service - JIRA issue operations for tool-calling frameworks
//!
//! [`JiraService`] exposes five operations (search, fetch issue, fetch
//! comments, post comment, create issue) over the JIRA REST API. Every
//! failure is reported as an [`OperationError`] that names the operation and
//! keeps the client's original error as its source. [`tools`] describes the
//! operations as JSON-Schema tool declarations and dispatches tool calls.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use jira_service::{JiraService, SearchIssuesParams};
//!
//! let service = JiraService::new("company.atlassian.net", "token", None)?;
//! let results = service
//!     .search_issues(SearchIssuesParams::new("project = PROJ"))
//!     .await?;
//! println!("{} issues", results.total);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod operation;
pub mod service;
pub mod tools;

#[cfg(test)]
mod testing;

pub use config::{validate_config, Settings};
pub use error::AppError;
pub use operation::{handle_api_operation, OperationError};
pub use service::{build_issue_fields, JiraService};
pub use tools::{
    execute_tool, tool_definitions, CreateIssueParams, GetIssueCommentsParams, GetIssueParams,
    PostIssueCommentParams, SearchIssuesParams, ToolDefinition, ToolError,
};
