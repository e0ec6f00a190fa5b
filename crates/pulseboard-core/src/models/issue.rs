//! Unified issue data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One unit of work, regardless of which tracker it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnifiedIssue {
    pub id: String,
    pub external_id: String,
    pub platform: Platform,
    pub title: String,
    pub description: String,
    pub state: IssueState,
    pub issue_type: IssueType,
    pub priority: Priority,
    pub story_points: Option<f64>,
    pub labels: Vec<String>,
    pub assignee: String,
    pub created_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub cycle_time_days: Option<i64>,
    pub url: String,
    pub project_key: String,
    pub sprint_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    GitHub,
    AzureDevOps,
    Jira,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueState {
    Open,
    InProgress,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Feature,
    Bug,
    Task,
    Chore,
    Epic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl UnifiedIssue {
    /// Check if the issue is closed
    pub fn is_closed(&self) -> bool {
        self.state == IssueState::Closed
    }

    /// Check if the issue carries a label, ignoring case
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.eq_ignore_ascii_case(label))
    }

    /// Title, description and labels joined and lower-cased.
    pub fn searchable_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.description,
            self.labels.join(" ")
        )
        .to_lowercase()
    }
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::GitHub, Platform::AzureDevOps, Platform::Jira];

    /// Stable key used in ids, environment variables and keyring entries
    pub fn key(&self) -> &'static str {
        match self {
            Platform::GitHub => "github",
            Platform::AzureDevOps => "azuredevops",
            Platform::Jira => "jira",
        }
    }

    /// Get a human-readable name for the platform
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::GitHub => "GitHub",
            Platform::AzureDevOps => "Azure DevOps",
            Platform::Jira => "Jira",
        }
    }

    pub(crate) fn id_prefix(&self) -> &'static str {
        match self {
            Platform::GitHub => "gh",
            Platform::AzureDevOps => "ado",
            Platform::Jira => "jira",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Platform {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "github" | "gh" => Ok(Platform::GitHub),
            "azuredevops" | "azure-devops" | "ado" => Ok(Platform::AzureDevOps),
            "jira" => Ok(Platform::Jira),
            other => Err(crate::Error::Validation(format!(
                "Unknown platform '{}'. Must be one of: github, azuredevops, jira",
                other
            ))),
        }
    }
}

impl IssueType {
    /// Collapse into the three buckets used for cycle-time statistics.
    pub fn bucket(&self) -> TypeBucket {
        match self {
            IssueType::Feature | IssueType::Epic => TypeBucket::Feature,
            IssueType::Bug => TypeBucket::Bug,
            IssueType::Task | IssueType::Chore => TypeBucket::Task,
        }
    }
}

/// Type buckets with their own average cycle time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeBucket {
    Feature,
    Bug,
    Task,
}

impl TypeBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeBucket::Feature => "feature",
            TypeBucket::Bug => "bug",
            TypeBucket::Task => "task",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_issue() -> UnifiedIssue {
        UnifiedIssue {
            id: "gh-acme/app#1".to_string(),
            external_id: "1".to_string(),
            platform: Platform::GitHub,
            title: "Add Export".to_string(),
            description: "Export to CSV".to_string(),
            state: IssueState::Open,
            issue_type: IssueType::Feature,
            priority: Priority::Medium,
            story_points: None,
            labels: vec!["Frontend".to_string()],
            assignee: String::new(),
            created_at: None,
            closed_at: None,
            cycle_time_days: None,
            url: String::new(),
            project_key: "acme/app".to_string(),
            sprint_name: String::new(),
        }
    }

    #[test]
    fn test_has_label_ignores_case() {
        let issue = sample_issue();
        assert!(issue.has_label("frontend"));
        assert!(!issue.has_label("backend"));
    }

    #[test]
    fn test_searchable_text() {
        let issue = sample_issue();
        assert_eq!(issue.searchable_text(), "add export export to csv frontend");
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("GitHub".parse::<Platform>().unwrap(), Platform::GitHub);
        assert_eq!("ado".parse::<Platform>().unwrap(), Platform::AzureDevOps);
        assert_eq!("jira".parse::<Platform>().unwrap(), Platform::Jira);
        assert!("gitlab".parse::<Platform>().is_err());
    }

    #[test]
    fn test_type_buckets() {
        assert_eq!(IssueType::Epic.bucket(), TypeBucket::Feature);
        assert_eq!(IssueType::Chore.bucket(), TypeBucket::Task);
        assert_eq!(IssueType::Bug.bucket(), TypeBucket::Bug);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&IssueState::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::to_string(&Platform::AzureDevOps).unwrap(),
            "\"azuredevops\""
        );
    }
}
