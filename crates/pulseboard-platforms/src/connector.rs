//! Dispatch over the concrete platform clients

use pulseboard_core::models::{DashboardConfig, Platform, RawIssue};

use crate::auth::resolve_token;
use crate::source::{IssueSource, StateFilter};
use crate::{AzureDevOpsClient, Error, GitHubClient, JiraClient, Result};

pub enum Connector {
    GitHub(GitHubClient),
    AzureDevOps(AzureDevOpsClient),
    Jira(JiraClient),
}

impl Connector {
    /// Build a connector for every enabled platform.
    ///
    /// A platform whose client cannot be built (missing token, incomplete
    /// config) is reported alongside the connectors that could be.
    pub fn from_config(config: &DashboardConfig) -> (Vec<Connector>, Vec<(Platform, Error)>) {
        let mut connectors = Vec::new();
        let mut failures = Vec::new();

        for platform in Platform::ALL {
            if !is_enabled(config, platform) {
                continue;
            }

            match Self::build(config, platform) {
                Ok(connector) => connectors.push(connector),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", platform, e);
                    failures.push((platform, e));
                }
            }
        }

        (connectors, failures)
    }

    fn build(config: &DashboardConfig, platform: Platform) -> Result<Connector> {
        let token = resolve_token(platform)?;
        Ok(match platform {
            Platform::GitHub => Connector::GitHub(GitHubClient::new(config.github.clone(), token)?),
            Platform::AzureDevOps => Connector::AzureDevOps(AzureDevOpsClient::new(
                config.azure_devops.clone(),
                token,
            )?),
            Platform::Jira => Connector::Jira(JiraClient::new(config.jira.clone(), token)?),
        })
    }
}

fn is_enabled(config: &DashboardConfig, platform: Platform) -> bool {
    match platform {
        Platform::GitHub => config.github.enabled,
        Platform::AzureDevOps => config.azure_devops.enabled,
        Platform::Jira => config.jira.enabled,
    }
}

impl IssueSource for Connector {
    fn platform(&self) -> Platform {
        match self {
            Connector::GitHub(client) => client.platform(),
            Connector::AzureDevOps(client) => client.platform(),
            Connector::Jira(client) => client.platform(),
        }
    }

    async fn fetch_issues(&self, filter: StateFilter) -> Result<Vec<RawIssue>> {
        match self {
            Connector::GitHub(client) => client.fetch_issues(filter).await,
            Connector::AzureDevOps(client) => client.fetch_issues(filter).await,
            Connector::Jira(client) => client.fetch_issues(filter).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_platforms_are_skipped() {
        let config = DashboardConfig::default();
        let (connectors, failures) = Connector::from_config(&config);
        assert!(connectors.is_empty());
        assert!(failures.is_empty());
    }
}
