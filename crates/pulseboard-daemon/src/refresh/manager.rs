//! Refresh manager - fetch, normalize and rebuild the estimation model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

use pulseboard_core::gaps::analyze_all;
use pulseboard_core::models::{
    EstimationModel, EstimationResult, Platform, StoryGapReport, UnifiedIssue,
};
use pulseboard_core::{build_model, build_platform_model, estimate, estimate_with_model};
use pulseboard_platforms::{Connector, IssueSource, StateFilter};

use crate::aggregate::{AggregationManager, PlatformError};
use crate::event_manager::EventManager;
use crate::events::RefreshEvent;

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("A refresh is already in progress")]
    InFlight,

    #[error("No data loaded yet; run a refresh first")]
    NotLoaded,
}

pub type Result<T> = std::result::Result<T, RefreshError>;

/// Everything one refresh produced. Replaced wholesale, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub open_issues: Vec<UnifiedIssue>,
    pub closed_issues: Vec<UnifiedIssue>,
    pub model: EstimationModel,
    pub errors: Vec<PlatformError>,
    pub refreshed_at: DateTime<Utc>,
}

/// Clears the in-flight flag however the refresh ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct RefreshManager<S = Connector> {
    aggregator: AggregationManager<S>,
    event_manager: Arc<EventManager>,
    snapshot: RwLock<Option<Arc<DashboardSnapshot>>>,
    in_flight: AtomicBool,
}

impl<S: IssueSource> RefreshManager<S> {
    pub fn new(aggregator: AggregationManager<S>, event_manager: Arc<EventManager>) -> Self {
        Self {
            aggregator,
            event_manager,
            snapshot: RwLock::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Latest snapshot, if any refresh has completed
    pub async fn snapshot(&self) -> Option<Arc<DashboardSnapshot>> {
        self.snapshot.read().await.clone()
    }

    /// Fetch open and closed issues from every platform and rebuild the model.
    ///
    /// Returns `RefreshError::InFlight` without fetching when another refresh
    /// is still running.
    pub async fn refresh(&self) -> Result<Arc<DashboardSnapshot>> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::info!("Refresh already in progress, skipping");
            self.event_manager.emit(RefreshEvent::skipped());
            return Err(RefreshError::InFlight);
        };

        tracing::info!("Refreshing {} platform(s)", self.aggregator.platforms().len());
        self.event_manager.emit(RefreshEvent::started());

        let (open, closed) = tokio::join!(
            self.aggregator.fetch_all(StateFilter::Open),
            self.aggregator.fetch_closed()
        );

        let mut errors = open.errors;
        for error in closed.errors {
            if !errors.contains(&error) {
                errors.push(error);
            }
        }

        let model = build_model(&closed.issues);
        let snapshot = Arc::new(DashboardSnapshot {
            open_issues: open.issues,
            closed_issues: closed.issues,
            model,
            errors,
            refreshed_at: Utc::now(),
        });

        let issue_count = snapshot.open_issues.len() + snapshot.closed_issues.len();
        tracing::info!(
            "Refresh complete: {} issues, {} errors, model from {}",
            issue_count,
            snapshot.errors.len(),
            snapshot.model.platform_summary()
        );
        // Subscribers reacting to Completed must see the new snapshot
        *self.snapshot.write().await = Some(snapshot.clone());
        self.event_manager
            .emit(RefreshEvent::completed(issue_count, snapshot.errors.len()));

        Ok(snapshot)
    }

    async fn require_snapshot(&self) -> Result<Arc<DashboardSnapshot>> {
        self.snapshot().await.ok_or(RefreshError::NotLoaded)
    }

    /// Estimate against the cross-org model
    pub async fn estimate(
        &self,
        title: &str,
        description: &str,
        labels: &[String],
    ) -> Result<EstimationResult> {
        let snapshot = self.require_snapshot().await?;
        Ok(estimate_with_model(title, description, labels, &snapshot.model))
    }

    /// Estimate against a model built from one platform's history only
    pub async fn estimate_for_platform(
        &self,
        platform: Platform,
        title: &str,
        description: &str,
        labels: &[String],
    ) -> Result<EstimationResult> {
        let snapshot = self.require_snapshot().await?;
        let model = build_platform_model(platform, &snapshot.closed_issues);
        Ok(estimate_with_model(title, description, labels, &model))
    }

    /// Estimate from the most similar closed issues
    pub async fn estimate_by_similarity(
        &self,
        title: &str,
        description: &str,
        labels: &[String],
    ) -> Result<EstimationResult> {
        let snapshot = self.require_snapshot().await?;
        Ok(estimate(title, description, labels, &snapshot.closed_issues))
    }

    pub async fn gap_reports(&self) -> Result<Vec<StoryGapReport>> {
        let snapshot = self.require_snapshot().await?;
        Ok(analyze_all(&snapshot.open_issues))
    }

    /// Refresh now and then every `interval`, forever.
    pub async fn run_loop(&self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            match self.refresh().await {
                Ok(snapshot) if !snapshot.errors.is_empty() => {
                    for error in &snapshot.errors {
                        tracing::warn!("{}: {}", error.platform, error.error);
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::debug!("Auto-refresh: {}", e),
            }
        }
    }
}
