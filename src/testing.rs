//! In-memory [`IssueApi`] used by unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map};

use crate::api::error::Result;
use crate::api::{
    ApiError, Comment, CommentBody, CreatedIssue, Issue, IssueApi, IssueUpdateDetails,
    PageOfComments, SearchRequest, SearchResults,
};

/// A call received by [`RecordingClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Search(SearchRequest),
    GetIssue(String, Option<String>),
    GetComments(String, Option<String>),
    AddComment(String, CommentBody),
    Create(IssueUpdateDetails, bool),
}

/// Records every call and answers with canned data, or fails every call
/// with [`ApiError::Unauthorized`].
#[derive(Debug, Default)]
pub struct RecordingClient {
    calls: Mutex<Vec<Call>>,
    fail: bool,
}

impl RecordingClient {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::default(),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            Err(ApiError::Unauthorized)
        } else {
            Ok(())
        }
    }
}

fn issue(key: &str) -> Issue {
    let mut fields = Map::new();
    fields.insert("summary".to_string(), json!("Canned issue"));
    Issue {
        id: "10001".to_string(),
        key: key.to_string(),
        self_url: format!("https://example.com/rest/api/2/issue/{}", key),
        fields,
        extra: Map::new(),
    }
}

#[async_trait]
impl IssueApi for RecordingClient {
    async fn search_for_issues_using_jql_post(
        &self,
        request: &SearchRequest,
    ) -> Result<SearchResults> {
        self.record(Call::Search(request.clone()))?;
        Ok(SearchResults {
            start_at: request.start_at.unwrap_or(0),
            max_results: request.max_results,
            total: 1,
            issues: vec![issue("PROJ-1")],
        })
    }

    async fn get_issue(&self, issue_key: &str, expand: Option<&str>) -> Result<Issue> {
        self.record(Call::GetIssue(
            issue_key.to_string(),
            expand.map(str::to_string),
        ))?;
        Ok(issue(issue_key))
    }

    async fn get_comments(&self, issue_key: &str, expand: Option<&str>) -> Result<PageOfComments> {
        self.record(Call::GetComments(
            issue_key.to_string(),
            expand.map(str::to_string),
        ))?;
        Ok(PageOfComments {
            start_at: 0,
            max_results: 50,
            total: 0,
            comments: vec![],
        })
    }

    async fn add_comment(&self, issue_key: &str, comment: &CommentBody) -> Result<Comment> {
        self.record(Call::AddComment(issue_key.to_string(), comment.clone()))?;
        Ok(Comment {
            id: "500".to_string(),
            body: json!(comment.body),
            author: None,
            created: None,
            updated: None,
            self_url: None,
        })
    }

    async fn create_issue(
        &self,
        details: &IssueUpdateDetails,
        update_history: bool,
    ) -> Result<CreatedIssue> {
        self.record(Call::Create(details.clone(), update_history))?;
        Ok(CreatedIssue {
            id: "10100".to_string(),
            key: "PROJ-100".to_string(),
            self_url: "https://example.com/rest/api/2/issue/10100".to_string(),
        })
    }
}
