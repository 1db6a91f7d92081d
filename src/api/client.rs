//! JIRA API client implementation.
//!
//! This module provides the HTTP client for the issue and search endpoints of
//! the JIRA REST API. It handles bearer authentication, request/response
//! processing and mapping of error responses. It does not retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::config::Configuration;
use super::error::{ApiError, Result};
use super::issue_api::IssueApi;
use super::types::{
    Comment, CommentBody, CreatedIssue, Issue, IssueUpdateDetails, PageOfComments, SearchRequest,
    SearchResults,
};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The JIRA API client.
///
/// Owns its [`Configuration`]; nothing about it is shared process-wide.
#[derive(Debug, Clone)]
pub struct JiraClient {
    /// The HTTP client.
    client: Client,
    /// Connection settings.
    config: Configuration,
}

impl JiraClient {
    /// Create a new client for the given configuration.
    ///
    /// Does not contact the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Configuration) -> Result<Self> {
        let client = Self::build_http_client()?;
        Ok(Self { client, config })
    }

    /// Build the HTTP client with appropriate settings.
    fn build_http_client() -> Result<Client> {
        Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(ApiError::Network)
    }

    /// The configuration this client was built with.
    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// URL of a single issue resource, with the key percent-encoded.
    fn issue_url(&self, issue_key: &str, suffix: &str) -> String {
        self.config.api_url(&format!(
            "issue/{}{}",
            urlencoding::encode(issue_key),
            suffix
        ))
    }

    /// Attach authentication and content negotiation headers.
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(header::AUTHORIZATION, self.config.bearer())
            .header(header::ACCEPT, "application/json")
    }

    /// Perform a GET request with an optional `expand` query parameter.
    #[instrument(skip(self), fields(url = %url))]
    async fn get<T: DeserializeOwned>(&self, url: &str, expand: Option<&str>) -> Result<T> {
        let mut request = self.client.get(url);
        if let Some(expand) = expand {
            request = request.query(&[("expand", expand)]);
        }

        let response = self.authorized(request).send().await?;
        Self::handle_response(response).await
    }

    /// Perform a POST request with a JSON body.
    #[instrument(skip(self, body), fields(url = %url))]
    async fn post<B, T>(&self, url: &str, query: &[(&str, &str)], body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self.client.post(url).query(query).json(body);
        let response = self.authorized(request).send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response, checking for errors and parsing JSON.
    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let url = response.url().to_string();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
        } else {
            let error_body = response.text().await.unwrap_or_default();
            debug!("Error response body: {}", error_body);

            Err(ApiError::from_response(status, &url, &error_body))
        }
    }
}

#[async_trait]
impl IssueApi for JiraClient {
    #[instrument(skip(self, request), fields(jql = %request.jql))]
    async fn search_for_issues_using_jql_post(
        &self,
        request: &SearchRequest,
    ) -> Result<SearchResults> {
        debug!(
            "Searching issues: startAt={:?}, maxResults={}",
            request.start_at, request.max_results
        );

        let url = self.config.api_url("search");
        let result: SearchResults = self.post(&url, &[], request).await?;
        debug!("Found {} issues (total: {})", result.issues.len(), result.total);
        Ok(result)
    }

    #[instrument(skip(self), fields(issue_key = %issue_key))]
    async fn get_issue(&self, issue_key: &str, expand: Option<&str>) -> Result<Issue> {
        let url = self.issue_url(issue_key, "");
        let issue: Issue = self.get(&url, expand).await.map_err(|e| {
            if matches!(e, ApiError::NotFound(_)) {
                ApiError::NotFound(format!("Issue '{}' not found", issue_key))
            } else {
                e
            }
        })?;

        debug!("Fetched issue: {}", issue.key);
        Ok(issue)
    }

    #[instrument(skip(self), fields(issue_key = %issue_key))]
    async fn get_comments(&self, issue_key: &str, expand: Option<&str>) -> Result<PageOfComments> {
        let url = self.issue_url(issue_key, "/comment");
        let page: PageOfComments = self.get(&url, expand).await?;
        debug!("Fetched {} comments (total: {})", page.comments.len(), page.total);
        Ok(page)
    }

    #[instrument(skip(self, comment), fields(issue_key = %issue_key))]
    async fn add_comment(&self, issue_key: &str, comment: &CommentBody) -> Result<Comment> {
        let url = self.issue_url(issue_key, "/comment");
        let created: Comment = self.post(&url, &[], comment).await?;
        debug!("Added comment {}", created.id);
        Ok(created)
    }

    #[instrument(skip(self, details))]
    async fn create_issue(
        &self,
        details: &IssueUpdateDetails,
        update_history: bool,
    ) -> Result<CreatedIssue> {
        let url = self.config.api_url("issue");
        let update_history = if update_history { "true" } else { "false" };
        let created: CreatedIssue = self
            .post(&url, &[("updateHistory", update_history)], details)
            .await?;
        debug!("Created issue {}", created.key);
        Ok(created)
    }
}
