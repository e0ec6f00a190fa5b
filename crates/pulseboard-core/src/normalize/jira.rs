use serde_json::Value;

use super::{finalize, parse_optional_timestamp};
use crate::models::raw::{JiraFields, JiraIssue, JiraStatus};
use crate::models::{IssueState, IssueType, Platform, Priority, UnifiedIssue};

/// Story point custom fields, most common first. Instances differ in which
/// one they use, so the first numeric value wins.
pub const STORY_POINT_FIELDS: [&str; 5] = [
    "customfield_10016",
    "customfield_10026",
    "customfield_10028",
    "customfield_10004",
    "customfield_10002",
];

pub const SPRINT_FIELD: &str = "customfield_10020";

fn state(status: Option<&JiraStatus>) -> IssueState {
    let Some(status) = status else {
        return IssueState::Open;
    };

    let category = status
        .status_category
        .as_ref()
        .map(|c| c.key.to_lowercase())
        .unwrap_or_default();

    match status.name.trim().to_lowercase().as_str() {
        "done" | "closed" | "resolved" => IssueState::Closed,
        "in progress" | "in review" | "testing" => IssueState::InProgress,
        _ if category == "done" => IssueState::Closed,
        _ => IssueState::Open,
    }
}

fn issue_type(name: &str) -> IssueType {
    match name.trim().to_lowercase().as_str() {
        "bug" => IssueType::Bug,
        "story" | "user story" | "feature" => IssueType::Feature,
        "epic" => IssueType::Epic,
        _ => IssueType::Task,
    }
}

fn priority(name: &str) -> Priority {
    match name.trim().to_lowercase().as_str() {
        "highest" | "high" | "critical" | "blocker" => Priority::High,
        "lowest" | "low" | "minor" | "trivial" => Priority::Low,
        _ => Priority::Medium,
    }
}

fn story_points(fields: &JiraFields) -> Option<f64> {
    STORY_POINT_FIELDS
        .iter()
        .filter_map(|key| fields.custom.get(*key))
        .find_map(|value| match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
}

/// Name of the most recent sprint the issue was in.
fn sprint_name(fields: &JiraFields) -> String {
    let Some(Value::Array(sprints)) = fields.custom.get(SPRINT_FIELD) else {
        return String::new();
    };

    sprints
        .iter()
        .rev()
        .find_map(|sprint| match sprint {
            Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(str::to_string),
            // Legacy "com.atlassian.greenhopper...Sprint@1a2b[id=1,name=Sprint 4,...]"
            Value::String(s) => s
                .split_once("name=")
                .map(|(_, rest)| rest.split([',', ']']).next().unwrap_or_default().to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

/// Flatten a description that may be plain text or an ADF document.
fn description_text(value: Option<&Value>) -> String {
    fn collect<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
        match value {
            Value::String(s) => out.push(s),
            Value::Object(obj) => {
                if let Some(Value::String(text)) = obj.get("text") {
                    out.push(text);
                }
                if let Some(content) = obj.get("content") {
                    collect(content, out);
                }
            }
            Value::Array(items) => items.iter().for_each(|item| collect(item, out)),
            _ => {}
        }
    }

    let mut parts = Vec::new();
    if let Some(value) = value {
        collect(value, &mut parts);
    }
    parts.join(" ")
}

/// `https://acme.atlassian.net/rest/api/3/issue/10001` -> `https://acme.atlassian.net/browse/KEY`
fn browse_url(self_url: &str, key: &str) -> String {
    match self_url.find("/rest/") {
        Some(idx) if !key.is_empty() => format!("{}/browse/{}", &self_url[..idx], key),
        _ => String::new(),
    }
}

pub(super) fn normalize_jira(issue: JiraIssue) -> UnifiedIssue {
    let fields = issue.fields;

    finalize(UnifiedIssue {
        id: format!("{}-{}", Platform::Jira.id_prefix(), issue.key),
        url: browse_url(&issue.self_url, &issue.key),
        platform: Platform::Jira,
        description: description_text(fields.description.as_ref()),
        state: state(fields.status.as_ref()),
        issue_type: issue_type(
            fields
                .issuetype
                .as_ref()
                .map(|t| t.name.as_str())
                .unwrap_or_default(),
        ),
        priority: priority(
            fields
                .priority
                .as_ref()
                .map(|p| p.name.as_str())
                .unwrap_or_default(),
        ),
        story_points: story_points(&fields),
        sprint_name: sprint_name(&fields),
        assignee: fields
            .assignee
            .as_ref()
            .map(|a| a.display_name.clone())
            .unwrap_or_default(),
        created_at: parse_optional_timestamp(fields.created.as_deref()),
        closed_at: parse_optional_timestamp(fields.resolutiondate.as_deref()),
        cycle_time_days: None,
        project_key: fields
            .project
            .as_ref()
            .map(|p| p.key.clone())
            .unwrap_or_default(),
        external_id: issue.key,
        title: fields.summary,
        labels: fields.labels,
    })
}
