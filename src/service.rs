//! The JIRA service facade.
//!
//! [`JiraService`] owns a connection [`Configuration`] and an [`IssueApi`]
//! client. Each operation maps its parameters onto the client's request shape
//! and runs the call through [`handle_api_operation`], so every failure comes
//! back as an [`OperationError`] carrying an operation-specific context.

use serde_json::{json, Map, Value};
use tracing::{debug, info, instrument};

use crate::api::{
    self, Comment, CommentBody, Configuration, CreatedIssue, Issue, IssueApi, IssueUpdateDetails,
    JiraClient, PageOfComments, SearchResults,
};
use crate::config::Settings;
use crate::operation::{handle_api_operation, Result};
use crate::tools::{CreateIssueParams, SearchIssuesParams};

const SEARCH_ISSUES_CONTEXT: &str = "Error searching issues";
const GET_ISSUE_CONTEXT: &str = "Error fetching issue";
const GET_COMMENTS_CONTEXT: &str = "Error fetching issue comments";
const POST_COMMENT_CONTEXT: &str = "Error posting comment";
const CREATE_ISSUE_CONTEXT: &str = "Error creating issue";

/// Facade over the JIRA issue and search endpoints.
///
/// The configuration is fixed at construction and only ever read, so a
/// service can be shared across concurrent tasks.
#[derive(Debug)]
pub struct JiraService<C = JiraClient> {
    config: Configuration,
    client: C,
}

impl JiraService<JiraClient> {
    /// Create a service talking HTTP to `host`.
    ///
    /// The base path is `full_base_url` when given, otherwise
    /// `https://{host}/rest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(host: &str, token: &str, full_base_url: Option<&str>) -> api::error::Result<Self> {
        let config = Configuration::for_host(host, token, full_base_url);
        Self::from_configuration(config)
    }

    /// Create a service from loaded [`Settings`].
    ///
    /// # Errors
    ///
    /// Returns an error if required settings are missing or the HTTP client
    /// cannot be built.
    pub fn from_settings(settings: &Settings) -> crate::error::Result<Self> {
        let config = settings.connection()?;
        Ok(Self::from_configuration(config)?)
    }

    fn from_configuration(config: Configuration) -> api::error::Result<Self> {
        info!(base_path = %config.base_path, api_version = %config.api_version, "Creating JIRA service");
        let client = JiraClient::new(config.clone())?;
        Ok(Self { config, client })
    }
}

impl<C: IssueApi> JiraService<C> {
    /// Create a service around an existing client.
    pub fn with_client(config: Configuration, client: C) -> Self {
        Self { config, client }
    }

    /// The connection configuration.
    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// The underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Search issues with JQL.
    ///
    /// The query is passed through unvalidated.
    #[instrument(skip(self, params), fields(jql = %params.jql))]
    pub async fn search_issues(&self, params: SearchIssuesParams) -> Result<SearchResults> {
        let request = params.into_request();
        debug!(max_results = request.max_results, "Searching issues");

        let client = &self.client;
        handle_api_operation(
            || client.search_for_issues_using_jql_post(&request),
            SEARCH_ISSUES_CONTEXT,
        )
        .await
    }

    /// Fetch one issue.
    #[instrument(skip(self))]
    pub async fn get_issue(&self, issue_key: &str, expand: Option<&str>) -> Result<Issue> {
        let client = &self.client;
        handle_api_operation(|| client.get_issue(issue_key, expand), GET_ISSUE_CONTEXT).await
    }

    /// Fetch the comments on an issue.
    #[instrument(skip(self))]
    pub async fn get_issue_comments(
        &self,
        issue_key: &str,
        expand: Option<&str>,
    ) -> Result<PageOfComments> {
        let client = &self.client;
        handle_api_operation(
            || client.get_comments(issue_key, expand),
            GET_COMMENTS_CONTEXT,
        )
        .await
    }

    /// Add a comment to an issue.
    ///
    /// The text is sent as-is; it must already be in the markup the server
    /// expects.
    #[instrument(skip(self, comment))]
    pub async fn post_issue_comment(&self, issue_key: &str, comment: &str) -> Result<Comment> {
        let body = CommentBody {
            body: comment.to_string(),
        };

        let client = &self.client;
        handle_api_operation(|| client.add_comment(issue_key, &body), POST_COMMENT_CONTEXT).await
    }

    /// Create an issue.
    ///
    /// See [`build_issue_fields`] for how custom fields combine with the
    /// standard ones.
    #[instrument(skip(self, params), fields(project = %params.project_key))]
    pub async fn create_issue(&self, params: CreateIssueParams) -> Result<CreatedIssue> {
        let details = IssueUpdateDetails {
            fields: build_issue_fields(&params),
        };
        debug!(fields = details.fields.len(), "Creating issue");

        let client = &self.client;
        handle_api_operation(
            || client.create_issue(&details, true),
            CREATE_ISSUE_CONTEXT,
        )
        .await
    }
}

/// Build the `fields` object for issue creation.
///
/// Standard fields go in first: `project.key`, `summary`, `description` and
/// `issuetype.id`. Custom fields are then inserted in order and replace any
/// standard field with the same name, `project` and `issuetype` included.
pub fn build_issue_fields(params: &CreateIssueParams) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("project".to_string(), json!({ "key": params.project_key }));
    fields.insert("summary".to_string(), json!(params.summary));
    fields.insert("description".to_string(), json!(params.description));
    fields.insert("issuetype".to_string(), json!({ "id": params.issue_type_id }));

    if let Some(custom_fields) = &params.custom_fields {
        for (name, value) in custom_fields {
            fields.insert(name.clone(), value.clone());
        }
    }

    fields
}
