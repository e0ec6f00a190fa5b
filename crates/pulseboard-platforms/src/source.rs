//! The seam between connectors and the aggregation layer

use std::future::Future;

use pulseboard_core::models::{Platform, RawIssue};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Which issues a fetch should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateFilter {
    Open,
    Closed,
    All,
}

impl StateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateFilter::Open => "open",
            StateFilter::Closed => "closed",
            StateFilter::All => "all",
        }
    }
}

/// Anything that can hand back raw issues for one platform.
pub trait IssueSource: Send + Sync {
    fn platform(&self) -> Platform;

    /// Issues matching `filter`, as many as the platform returns within the page cap.
    fn fetch_issues(
        &self,
        filter: StateFilter,
    ) -> impl Future<Output = Result<Vec<RawIssue>>> + Send;

    /// Closed issues carrying the timestamps cycle times are computed from.
    fn fetch_closed_issues(&self) -> impl Future<Output = Result<Vec<RawIssue>>> + Send {
        self.fetch_issues(StateFilter::Closed)
    }
}
