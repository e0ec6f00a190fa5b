//! Issue normalization
//!
//! Maps each platform's payload onto [`UnifiedIssue`]. Normalization is total:
//! a missing or unparseable optional field becomes an empty string or `None`,
//! never an error.

mod azure;
mod github;
mod jira;

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{IssueState, IssueType, RawIssue, UnifiedIssue};

pub use github::parse_story_points_label;
pub use jira::{SPRINT_FIELD, STORY_POINT_FIELDS};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Normalize one raw issue, dispatching on its platform tag.
pub fn normalize(raw: RawIssue) -> UnifiedIssue {
    match raw {
        RawIssue::GitHub(issue) => github::normalize_github(issue),
        RawIssue::AzureDevOps(item) => azure::normalize_azure(item),
        RawIssue::Jira(issue) => jira::normalize_jira(issue),
    }
}

/// Normalize a batch, preserving order.
pub fn normalize_all<I>(raw: I) -> Vec<UnifiedIssue>
where
    I: IntoIterator<Item = RawIssue>,
{
    raw.into_iter().map(normalize).collect()
}

/// Whole calendar days between creation and closure, partial days rounded up.
///
/// A close time before the creation time counts as zero days.
pub fn cycle_time_days(created_at: DateTime<Utc>, closed_at: DateTime<Utc>) -> i64 {
    let millis = (closed_at - created_at).num_milliseconds().max(0);
    (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

/// Parse the timestamp shapes the three APIs emit.
///
/// Accepts RFC 3339 (GitHub, Azure DevOps), Jira's `2024-01-01T10:00:00.000+0000`
/// and bare dates. Anything else yields `None`.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }

    if let Ok(ts) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(crate) fn parse_optional_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value.and_then(parse_timestamp)
}

/// Infer an issue type from label vocabularies, then from the title.
///
/// Shared by GitHub normalization and by the trained estimator's
/// classification of new stories.
pub fn infer_issue_type(labels: &[String], title: &str) -> IssueType {
    let labels: Vec<String> = labels.iter().map(|l| l.trim().to_lowercase()).collect();
    let has_any = |vocab: &[&str]| labels.iter().any(|l| vocab.contains(&l.as_str()));

    if has_any(&["bug", "fix", "type/bug"]) {
        return IssueType::Bug;
    }
    if has_any(&["feature", "enhancement", "type/feature"]) {
        return IssueType::Feature;
    }
    if has_any(&["chore", "maintenance"]) {
        return IssueType::Chore;
    }

    let title = title.to_lowercase();
    if title.contains("bug") || title.contains("fix") {
        IssueType::Bug
    } else if title.contains("feature") || title.contains("new") {
        IssueType::Feature
    } else {
        IssueType::Task
    }
}

/// Enforce the close-time invariants and derive the cycle time.
///
/// A close timestamp on an issue that is not closed (reopened work) is
/// dropped, so `closed_at` and `cycle_time_days` only exist for closed issues.
fn finalize(mut issue: UnifiedIssue) -> UnifiedIssue {
    if issue.state != IssueState::Closed {
        issue.closed_at = None;
    }
    issue.cycle_time_days = match (issue.created_at, issue.closed_at) {
        (Some(created), Some(closed)) => Some(cycle_time_days(created, closed)),
        _ => None,
    };
    issue
}

fn text_or_empty(value: Option<String>) -> String {
    value.unwrap_or_default()
}
