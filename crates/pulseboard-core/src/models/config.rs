//! Dashboard configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardConfig {
    pub version: String,
    pub log_level: String,
    pub refresh_interval_secs: u64,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub azure_devops: AzureDevOpsConfig,
    #[serde(default)]
    pub jira: JiraConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GitHubConfig {
    pub enabled: bool,
    pub owner: String,
    pub repo: String,
    pub api_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AzureDevOpsConfig {
    pub enabled: bool,
    pub organization: String,
    pub project: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JiraConfig {
    pub enabled: bool,
    pub base_url: String,
    pub username: String,
    pub project_key: String,
}

const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

// One day
const MAX_REFRESH_INTERVAL: u64 = 86_400;

impl DashboardConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(Error::Validation(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.log_level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        if self.refresh_interval_secs == 0 {
            return Err(Error::Validation(
                "Refresh interval must be greater than 0".to_string(),
            ));
        }

        if self.refresh_interval_secs > MAX_REFRESH_INTERVAL {
            return Err(Error::Validation(format!(
                "Refresh interval too long (max {} seconds)",
                MAX_REFRESH_INTERVAL
            )));
        }

        self.github.validate()?;
        self.azure_devops.validate()?;
        self.jira.validate()?;
        Ok(())
    }

    /// Whether at least one platform is switched on
    pub fn any_enabled(&self) -> bool {
        self.github.enabled || self.azure_devops.enabled || self.jira.enabled
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            log_level: "info".to_string(),
            refresh_interval_secs: 300,
            github: GitHubConfig::default(),
            azure_devops: AzureDevOpsConfig::default(),
            jira: JiraConfig::default(),
        }
    }
}

impl GitHubConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        require_non_empty("GitHub owner", &self.owner)?;
        require_non_empty("GitHub repo", &self.repo)?;
        require_http_url("GitHub API URL", &self.api_url)
    }

    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            owner: String::new(),
            repo: String::new(),
            api_url: "https://api.github.com".to_string(),
        }
    }
}

impl AzureDevOpsConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        require_non_empty("Azure DevOps organization", &self.organization)?;
        require_non_empty("Azure DevOps project", &self.project)?;
        require_http_url("Azure DevOps base URL", &self.base_url)
    }
}

impl Default for AzureDevOpsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            organization: String::new(),
            project: String::new(),
            base_url: "https://dev.azure.com".to_string(),
        }
    }
}

impl JiraConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        require_http_url("Jira base URL", &self.base_url)?;
        require_non_empty("Jira username", &self.username)?;
        require_non_empty("Jira project key", &self.project_key)
    }
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: String::new(),
            username: String::new(),
            project_key: String::new(),
        }
    }
}

fn require_non_empty(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} cannot be empty", name)));
    }
    Ok(())
}

fn require_http_url(name: &str, value: &str) -> Result<()> {
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(Error::Validation(format!(
            "{} must start with http:// or https://",
            name
        )));
    }
    Ok(())
}
