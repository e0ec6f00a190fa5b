//! GitHub REST client

use pulseboard_core::models::raw::GitHubIssue;
use pulseboard_core::models::{GitHubConfig, Platform, RawIssue};

use crate::auth::Credentials;
use crate::http::{MAX_PAGES, USER_AGENT, check_status};
use crate::source::{IssueSource, StateFilter};
use crate::{Error, Result};

const PER_PAGE: usize = 100;

pub struct GitHubClient {
    http: reqwest::Client,
    config: GitHubConfig,
    credentials: Credentials,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig, token: impl Into<String>) -> Result<Self> {
        if config.owner.trim().is_empty() || config.repo.trim().is_empty() {
            return Err(Error::NotConfigured(
                "GitHub owner and repo must be set".to_string(),
            ));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            config,
            credentials: Credentials::bearer(token),
        })
    }

    fn issues_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/issues",
            self.config.api_url.trim_end_matches('/'),
            self.config.owner,
            self.config.repo
        )
    }

    async fn fetch_page(&self, filter: StateFilter, page: usize) -> Result<Vec<GitHubIssue>> {
        let response = self
            .http
            .get(self.issues_url())
            .header("Authorization", self.credentials.header_value())
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .query(&page_query(filter, page))
            .send()
            .await?;

        let response = check_status(Platform::GitHub, response).await?;
        Ok(response.json().await?)
    }
}

fn page_query(filter: StateFilter, page: usize) -> [(&'static str, String); 3] {
    [
        ("state", filter.as_str().to_string()),
        ("per_page", PER_PAGE.to_string()),
        ("page", page.to_string()),
    ]
}

impl IssueSource for GitHubClient {
    fn platform(&self) -> Platform {
        Platform::GitHub
    }

    async fn fetch_issues(&self, filter: StateFilter) -> Result<Vec<RawIssue>> {
        let mut issues = Vec::new();

        for page in 1..=MAX_PAGES {
            let batch = self.fetch_page(filter, page).await?;
            let count = batch.len();
            tracing::debug!(
                "GitHub {}: page {} returned {} items",
                self.config.full_name(),
                page,
                count
            );

            issues.extend(
                batch
                    .into_iter()
                    .filter(|issue| !issue.is_pull_request())
                    .map(RawIssue::GitHub),
            );

            if count < PER_PAGE {
                break;
            }
        }

        Ok(issues)
    }
}
