//! Platform-native issue payloads
//!
//! These mirror the JSON each tracker's REST API returns, keeping only the
//! fields normalization reads. Every field is defaulted so a sparse payload
//! still deserializes; normalization decides what a missing value means.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Platform;

/// A raw issue tagged with the platform it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "platform", content = "payload", rename_all = "lowercase")]
pub enum RawIssue {
    GitHub(GitHubIssue),
    AzureDevOps(AzureWorkItem),
    Jira(JiraIssue),
}

impl RawIssue {
    pub fn platform(&self) -> Platform {
        match self {
            RawIssue::GitHub(_) => Platform::GitHub,
            RawIssue::AzureDevOps(_) => Platform::AzureDevOps,
            RawIssue::Jira(_) => Platform::Jira,
        }
    }
}

// GitHub

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GitHubIssue {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
    pub labels: Vec<GitHubLabel>,
    pub assignee: Option<GitHubUser>,
    pub milestone: Option<GitHubMilestone>,
    pub created_at: Option<String>,
    pub closed_at: Option<String>,
    pub html_url: String,
    pub repository_url: String,
    /// Present only when the "issue" is really a pull request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<Value>,
}

/// GitHub returns label objects, but plain names are accepted too.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum GitHubLabel {
    Object { name: String },
    Name(String),
}

impl GitHubLabel {
    pub fn name(&self) -> &str {
        match self {
            GitHubLabel::Object { name } => name,
            GitHubLabel::Name(name) => name,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GitHubUser {
    pub login: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GitHubMilestone {
    pub title: String,
}

impl GitHubIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

// Azure DevOps

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AzureWorkItem {
    pub id: u64,
    pub url: String,
    pub fields: AzureFields,
    #[serde(rename = "_links", skip_serializing_if = "Option::is_none")]
    pub links: Option<AzureLinks>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AzureFields {
    #[serde(rename = "System.Title")]
    pub title: String,
    #[serde(rename = "System.Description")]
    pub description: Option<String>,
    #[serde(rename = "System.State")]
    pub state: String,
    #[serde(rename = "System.WorkItemType")]
    pub work_item_type: String,
    #[serde(rename = "Microsoft.VSTS.Common.Priority")]
    pub priority: Option<f64>,
    #[serde(rename = "Microsoft.VSTS.Scheduling.StoryPoints")]
    pub story_points: Option<f64>,
    #[serde(rename = "System.Tags")]
    pub tags: Option<String>,
    #[serde(rename = "System.AssignedTo")]
    pub assigned_to: Option<AzureIdentity>,
    #[serde(rename = "System.CreatedDate")]
    pub created_date: Option<String>,
    #[serde(rename = "Microsoft.VSTS.Common.ClosedDate")]
    pub closed_date: Option<String>,
    #[serde(rename = "Microsoft.VSTS.Common.ResolvedDate")]
    pub resolved_date: Option<String>,
    #[serde(rename = "System.TeamProject")]
    pub team_project: String,
    #[serde(rename = "System.IterationPath")]
    pub iteration_path: String,
}

/// Identity fields are objects on current API versions and strings on older ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AzureIdentity {
    Object {
        #[serde(rename = "displayName", default)]
        display_name: String,
    },
    Name(String),
}

impl AzureIdentity {
    pub fn display_name(&self) -> &str {
        match self {
            AzureIdentity::Object { display_name } => display_name,
            AzureIdentity::Name(name) => name,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AzureLinks {
    pub html: Option<AzureHref>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AzureHref {
    pub href: String,
}

// Jira

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JiraIssue {
    pub id: String,
    pub key: String,
    #[serde(rename = "self")]
    pub self_url: String,
    pub fields: JiraFields,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JiraFields {
    pub summary: String,
    /// Plain text on API v2, an Atlassian Document Format tree on v3
    pub description: Option<Value>,
    pub status: Option<JiraStatus>,
    pub issuetype: Option<JiraNamed>,
    pub priority: Option<JiraNamed>,
    pub labels: Vec<String>,
    pub assignee: Option<JiraUser>,
    pub created: Option<String>,
    pub resolutiondate: Option<String>,
    pub project: Option<JiraProject>,
    /// Custom fields (story points, sprints) keyed by their instance-specific ids
    #[serde(flatten)]
    pub custom: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JiraStatus {
    pub name: String,
    #[serde(rename = "statusCategory")]
    pub status_category: Option<JiraStatusCategory>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JiraStatusCategory {
    pub key: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JiraNamed {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JiraUser {
    #[serde(rename = "displayName")]
    pub display_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JiraProject {
    pub key: String,
}
