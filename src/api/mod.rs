//! JIRA API client and types.
//!
//! This module provides the interface for communicating with the JIRA REST API.
//! The service layer only depends on the [`IssueApi`] trait.

mod client;
mod config;
pub mod error;
mod issue_api;
pub mod types;

pub use client::JiraClient;
pub use config::{Configuration, DEFAULT_API_VERSION};
pub use error::ApiError;
pub use issue_api::IssueApi;
pub use types::{
    Comment, CommentBody, CreatedIssue, Issue, IssueUpdateDetails, PageOfComments, SearchRequest,
    SearchResults, User,
};
