//! The operations the service layer needs from a JIRA client.

use async_trait::async_trait;

use super::error::Result;
use super::types::{
    Comment, CommentBody, CreatedIssue, Issue, IssueUpdateDetails, PageOfComments, SearchRequest,
    SearchResults,
};

/// Issue and search endpoints of the JIRA REST API.
///
/// [`JiraClient`](super::JiraClient) is the HTTP implementation; tests and
/// embedders can supply their own.
#[async_trait]
pub trait IssueApi: Send + Sync {
    /// `POST /api/{v}/search`
    async fn search_for_issues_using_jql_post(
        &self,
        request: &SearchRequest,
    ) -> Result<SearchResults>;

    /// `GET /api/{v}/issue/{issueKey}`
    async fn get_issue(&self, issue_key: &str, expand: Option<&str>) -> Result<Issue>;

    /// `GET /api/{v}/issue/{issueKey}/comment`
    async fn get_comments(&self, issue_key: &str, expand: Option<&str>) -> Result<PageOfComments>;

    /// `POST /api/{v}/issue/{issueKey}/comment`
    async fn add_comment(&self, issue_key: &str, comment: &CommentBody) -> Result<Comment>;

    /// `POST /api/{v}/issue`
    ///
    /// `update_history` is sent as the `updateHistory` query flag, which adds
    /// the project to the user's recently viewed list.
    async fn create_issue(
        &self,
        details: &IssueUpdateDetails,
        update_history: bool,
    ) -> Result<CreatedIssue>;
}
