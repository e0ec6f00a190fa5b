//! Aggregation manager - fans fetches out to every configured platform

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use pulseboard_core::models::{DashboardConfig, Platform, RawIssue, UnifiedIssue};
use pulseboard_core::normalize::normalize_all;
use pulseboard_platforms::{Connector, IssueSource, StateFilter};

/// A platform that could not contribute to a fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformError {
    pub platform: Platform,
    pub error: String,
}

impl PlatformError {
    pub fn new(platform: Platform, error: impl ToString) -> Self {
        Self {
            platform,
            error: error.to_string(),
        }
    }
}

/// Normalized issues from every platform that answered, plus the failures
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregatedIssues {
    pub issues: Vec<UnifiedIssue>,
    pub errors: Vec<PlatformError>,
}

impl AggregatedIssues {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Issues fetches against all sources concurrently.
///
/// A failing source never aborts the others; its error is reported next to
/// whatever the remaining sources returned.
pub struct AggregationManager<S = Connector> {
    sources: Vec<S>,
    /// Platforms that were enabled but could not be set up
    setup_errors: Vec<PlatformError>,
}

impl AggregationManager<Connector> {
    pub fn from_config(config: &DashboardConfig) -> Self {
        let (connectors, failures) = Connector::from_config(config);
        let setup_errors = failures
            .into_iter()
            .map(|(platform, e)| PlatformError::new(platform, e))
            .collect();

        Self {
            sources: connectors,
            setup_errors,
        }
    }
}

impl<S: IssueSource> AggregationManager<S> {
    pub fn new(sources: Vec<S>) -> Self {
        Self {
            sources,
            setup_errors: Vec::new(),
        }
    }

    pub fn platforms(&self) -> Vec<Platform> {
        self.sources.iter().map(|source| source.platform()).collect()
    }

    pub fn setup_errors(&self) -> &[PlatformError] {
        &self.setup_errors
    }

    pub async fn fetch_all(&self, filter: StateFilter) -> AggregatedIssues {
        let fetches = self.sources.iter().map(|source| async move {
            (source.platform(), source.fetch_issues(filter).await)
        });
        self.merge(join_all(fetches).await)
    }

    /// Closed issues from every source, the input to model building
    pub async fn fetch_closed(&self) -> AggregatedIssues {
        let fetches = self.sources.iter().map(|source| async move {
            (source.platform(), source.fetch_closed_issues().await)
        });
        self.merge(join_all(fetches).await)
    }

    fn merge(
        &self,
        results: Vec<(Platform, pulseboard_platforms::Result<Vec<RawIssue>>)>,
    ) -> AggregatedIssues {
        let mut aggregated = AggregatedIssues {
            issues: Vec::new(),
            errors: self.setup_errors.clone(),
        };

        for (platform, result) in results {
            match result {
                Ok(raw) => {
                    tracing::debug!("{} returned {} issues", platform, raw.len());
                    aggregated.issues.extend(normalize_all(raw));
                }
                Err(e) => {
                    tracing::warn!("Fetching from {} failed: {}", platform, e);
                    aggregated.errors.push(PlatformError::new(platform, e));
                }
            }
        }

        aggregated
    }
}
