//! Azure DevOps REST client
//!
//! Work items are fetched in two steps: a WIQL query returns matching ids,
//! then the ids are resolved in batches.

use pulseboard_core::models::raw::AzureWorkItem;
use pulseboard_core::models::{AzureDevOpsConfig, Platform, RawIssue};
use serde::Deserialize;

use crate::auth::Credentials;
use crate::http::{MAX_PAGES, USER_AGENT, check_status};
use crate::source::{IssueSource, StateFilter};
use crate::{Error, Result};

const API_VERSION: &str = "7.0";

/// The work items endpoint accepts at most 200 ids per call.
const BATCH_SIZE: usize = 200;

const CLOSED_STATES: &str = "'Closed', 'Done', 'Resolved', 'Completed'";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WiqlResponse {
    #[serde(default)]
    work_items: Vec<WorkItemRef>,
}

#[derive(Debug, Deserialize)]
struct WorkItemRef {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct WorkItemBatch {
    #[serde(default)]
    value: Vec<AzureWorkItem>,
}

pub struct AzureDevOpsClient {
    http: reqwest::Client,
    config: AzureDevOpsConfig,
    credentials: Credentials,
}

impl AzureDevOpsClient {
    pub fn new(config: AzureDevOpsConfig, token: impl Into<String>) -> Result<Self> {
        if config.organization.trim().is_empty() || config.project.trim().is_empty() {
            return Err(Error::NotConfigured(
                "Azure DevOps organization and project must be set".to_string(),
            ));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            config,
            // PATs go in the password slot with an empty user
            credentials: Credentials::basic("", token),
        })
    }

    fn api_base(&self) -> String {
        format!(
            "{}/{}/{}/_apis/wit",
            self.config.base_url.trim_end_matches('/'),
            self.config.organization,
            self.config.project
        )
    }

    async fn query_ids(&self, filter: StateFilter) -> Result<Vec<u64>> {
        let response = self
            .http
            .post(format!("{}/wiql", self.api_base()))
            .header("Authorization", self.credentials.header_value())
            .header("User-Agent", USER_AGENT)
            .query(&[("api-version", API_VERSION)])
            .json(&serde_json::json!({ "query": wiql_query(filter) }))
            .send()
            .await?;

        let response = check_status(Platform::AzureDevOps, response).await?;
        let wiql: WiqlResponse = response.json().await?;
        Ok(wiql.work_items.into_iter().map(|item| item.id).collect())
    }

    async fn fetch_batch(&self, ids: &[u64]) -> Result<Vec<AzureWorkItem>> {
        let response = self
            .http
            .get(format!("{}/workitems", self.api_base()))
            .header("Authorization", self.credentials.header_value())
            .header("User-Agent", USER_AGENT)
            .query(&[
                ("ids", join_ids(ids)),
                ("$expand", "links".to_string()),
                ("api-version", API_VERSION.to_string()),
            ])
            .send()
            .await?;

        let response = check_status(Platform::AzureDevOps, response).await?;
        let batch: WorkItemBatch = response.json().await?;
        Ok(batch.value)
    }
}

fn wiql_query(filter: StateFilter) -> String {
    let state_clause = match filter {
        StateFilter::Open => format!(" AND [System.State] NOT IN ({}, 'Removed')", CLOSED_STATES),
        StateFilter::Closed => format!(" AND [System.State] IN ({})", CLOSED_STATES),
        StateFilter::All => String::new(),
    };

    format!(
        "SELECT [System.Id] FROM WorkItems WHERE [System.TeamProject] = @project{} \
         ORDER BY [System.ChangedDate] DESC",
        state_clause
    )
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl IssueSource for AzureDevOpsClient {
    fn platform(&self) -> Platform {
        Platform::AzureDevOps
    }

    async fn fetch_issues(&self, filter: StateFilter) -> Result<Vec<RawIssue>> {
        let ids = self.query_ids(filter).await?;
        tracing::debug!(
            "Azure DevOps {}/{}: WIQL matched {} work items",
            self.config.organization,
            self.config.project,
            ids.len()
        );

        let mut items = Vec::new();
        for chunk in ids.chunks(BATCH_SIZE).take(MAX_PAGES) {
            let batch = self.fetch_batch(chunk).await?;
            items.extend(batch.into_iter().map(RawIssue::AzureDevOps));
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AzureDevOpsConfig {
        AzureDevOpsConfig {
            enabled: true,
            organization: "acme".to_string(),
            project: "Portal".to_string(),
            base_url: "https://dev.azure.com".to_string(),
        }
    }

    #[test]
    fn test_api_base() {
        let client = AzureDevOpsClient::new(config(), "pat").unwrap();
        assert_eq!(client.api_base(), "https://dev.azure.com/acme/Portal/_apis/wit");
    }

    #[test]
    fn test_wiql_per_filter() {
        let open = wiql_query(StateFilter::Open);
        assert!(open.contains("NOT IN ('Closed', 'Done', 'Resolved', 'Completed', 'Removed')"));

        let closed = wiql_query(StateFilter::Closed);
        assert!(closed.contains("[System.State] IN ('Closed'"));
        assert!(!closed.contains("NOT IN"));

        let all = wiql_query(StateFilter::All);
        assert!(!all.contains("[System.State]"));
        assert!(all.contains("@project"));
    }

    #[test]
    fn test_join_ids() {
        assert_eq!(join_ids(&[1, 22, 333]), "1,22,333");
        assert_eq!(join_ids(&[]), "");
    }

    #[test]
    fn test_wiql_response_shape() {
        let json = r#"{"queryType":"flat","workItems":[{"id":7,"url":"x"},{"id":9,"url":"y"}]}"#;
        let response: WiqlResponse = serde_json::from_str(json).unwrap();
        let ids: Vec<u64> = response.work_items.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![7, 9]);
    }

    #[test]
    fn test_requires_project() {
        let mut config = config();
        config.project = " ".to_string();
        assert!(AzureDevOpsClient::new(config, "pat").is_err());
    }
}
