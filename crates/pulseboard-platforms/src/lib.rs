//! Pulseboard platform connectors
//!
//! REST clients that fetch raw issues from GitHub, Azure DevOps and Jira.
//! Each client owns its configuration and credentials; none of them share
//! state, so the daemon can drive them concurrently.

pub mod auth;
pub mod azure;
pub mod connector;
pub mod error;
pub mod github;
pub mod jira;
pub mod source;

mod http;

pub use azure::AzureDevOpsClient;
pub use connector::Connector;
pub use error::{Error, Result};
pub use github::GitHubClient;
pub use jira::JiraClient;
pub use source::{IssueSource, StateFilter};
