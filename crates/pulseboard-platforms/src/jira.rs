//! Jira Cloud REST client

use pulseboard_core::models::raw::JiraIssue;
use pulseboard_core::models::{JiraConfig, Platform, RawIssue};
use pulseboard_core::normalize::{SPRINT_FIELD, STORY_POINT_FIELDS};
use serde::Deserialize;

use crate::auth::Credentials;
use crate::http::{MAX_PAGES, USER_AGENT, check_status};
use crate::source::{IssueSource, StateFilter};
use crate::{Error, Result};

const PAGE_SIZE: usize = 100;

const BASE_FIELDS: [&str; 11] = [
    "summary",
    "description",
    "status",
    "issuetype",
    "priority",
    "labels",
    "assignee",
    "created",
    "resolutiondate",
    "project",
    SPRINT_FIELD,
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    total: usize,
    #[serde(default)]
    issues: Vec<JiraIssue>,
}

pub struct JiraClient {
    http: reqwest::Client,
    config: JiraConfig,
    credentials: Credentials,
}

impl JiraClient {
    pub fn new(config: JiraConfig, token: impl Into<String>) -> Result<Self> {
        if config.base_url.trim().is_empty() || config.project_key.trim().is_empty() {
            return Err(Error::NotConfigured(
                "Jira base URL and project key must be set".to_string(),
            ));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            credentials: Credentials::basic(config.username.clone(), token),
            config,
        })
    }

    fn search_url(&self) -> String {
        format!(
            "{}/rest/api/3/search",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn search_page(&self, jql: &str, start_at: usize) -> Result<SearchResponse> {
        let response = self
            .http
            .get(self.search_url())
            .header("Authorization", self.credentials.header_value())
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .query(&[
                ("jql", jql.to_string()),
                ("startAt", start_at.to_string()),
                ("maxResults", PAGE_SIZE.to_string()),
                ("fields", requested_fields()),
            ])
            .send()
            .await?;

        let response = check_status(Platform::Jira, response).await?;
        Ok(response.json().await?)
    }
}

fn jql(project_key: &str, filter: StateFilter) -> String {
    let status_clause = match filter {
        StateFilter::Open => " AND statusCategory != Done",
        StateFilter::Closed => " AND statusCategory = Done",
        StateFilter::All => "",
    };
    format!(
        "project = \"{}\"{} ORDER BY updated DESC",
        project_key, status_clause
    )
}

fn requested_fields() -> String {
    BASE_FIELDS
        .iter()
        .chain(STORY_POINT_FIELDS.iter())
        .copied()
        .collect::<Vec<_>>()
        .join(",")
}

impl IssueSource for JiraClient {
    fn platform(&self) -> Platform {
        Platform::Jira
    }

    async fn fetch_issues(&self, filter: StateFilter) -> Result<Vec<RawIssue>> {
        let jql = jql(&self.config.project_key, filter);
        let mut issues = Vec::new();

        for _ in 0..MAX_PAGES {
            let page = self.search_page(&jql, issues.len()).await?;
            let count = page.issues.len();
            tracing::debug!(
                "Jira {}: fetched {} of {} issues",
                self.config.project_key,
                issues.len() + count,
                page.total
            );

            issues.extend(page.issues.into_iter().map(RawIssue::Jira));

            if count == 0 || issues.len() >= page.total {
                break;
            }
        }

        Ok(issues)
    }
}
