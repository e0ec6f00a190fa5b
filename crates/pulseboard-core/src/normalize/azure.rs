use super::{finalize, parse_optional_timestamp, text_or_empty};
use crate::models::raw::AzureWorkItem;
use crate::models::{IssueState, IssueType, Platform, Priority, UnifiedIssue};

fn state(raw: &str) -> IssueState {
    match raw.trim().to_lowercase().as_str() {
        "done" | "closed" | "resolved" | "completed" => IssueState::Closed,
        "active" | "in progress" | "doing" => IssueState::InProgress,
        _ => IssueState::Open,
    }
}

fn issue_type(raw: &str) -> IssueType {
    match raw.trim().to_lowercase().as_str() {
        "bug" => IssueType::Bug,
        "user story" | "story" | "feature" => IssueType::Feature,
        _ => IssueType::Task,
    }
}

fn priority(raw: Option<f64>) -> Priority {
    match raw {
        Some(p) if p <= 1.0 => Priority::High,
        Some(p) if p >= 3.0 => Priority::Low,
        _ => Priority::Medium,
    }
}

fn tags(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// `Project\Release 3\Sprint 7` -> `Sprint 7`
fn sprint_name(iteration_path: &str) -> String {
    iteration_path
        .rsplit('\\')
        .next()
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

pub(super) fn normalize_azure(item: AzureWorkItem) -> UnifiedIssue {
    let fields = item.fields;
    let external_id = item.id.to_string();
    let url = item
        .links
        .and_then(|links| links.html)
        .map(|html| html.href)
        .unwrap_or(item.url);
    let closed_at = parse_optional_timestamp(fields.closed_date.as_deref())
        .or_else(|| parse_optional_timestamp(fields.resolved_date.as_deref()));

    finalize(UnifiedIssue {
        id: format!("{}-{}", Platform::AzureDevOps.id_prefix(), external_id),
        external_id,
        platform: Platform::AzureDevOps,
        title: fields.title,
        description: text_or_empty(fields.description),
        state: state(&fields.state),
        issue_type: issue_type(&fields.work_item_type),
        priority: priority(fields.priority),
        story_points: fields.story_points,
        labels: tags(fields.tags.as_deref()),
        assignee: fields
            .assigned_to
            .as_ref()
            .map(|a| a.display_name().to_string())
            .unwrap_or_default(),
        created_at: parse_optional_timestamp(fields.created_date.as_deref()),
        closed_at,
        cycle_time_days: None,
        url,
        project_key: fields.team_project,
        sprint_name: sprint_name(&fields.iteration_path),
    })
}
