use regex::Regex;
use std::sync::LazyLock;

use super::{finalize, infer_issue_type, parse_optional_timestamp, text_or_empty};
use crate::models::raw::GitHubIssue;
use crate::models::{IssueState, Platform, Priority, UnifiedIssue};

// "sp:5", "points-3", "story points 8"
static PREFIXED_POINTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"(?i)^(?:sp|points?|story.?points?)[:\s-]?\s*(\d+)$") {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    }
});

// "5", "5 points", "3sp"
static BARE_POINTS_RE: LazyLock<Regex> =
    LazyLock::new(|| match Regex::new(r"(?i)^(\d+)\s*(?:sp|points?)?$") {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    });

static HIGH_PRIORITY_RE: LazyLock<Regex> =
    LazyLock::new(
        || match Regex::new(r"(?i)priority.?(high|critical|urgent|p0|p1)") {
            Ok(re) => re,
            Err(_) => unreachable!("static regex pattern"),
        },
    );

static LOW_PRIORITY_RE: LazyLock<Regex> =
    LazyLock::new(|| match Regex::new(r"(?i)priority.?(low|minor|p3|p4)") {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    });

/// Read a story point value from a single label, if it encodes one.
pub fn parse_story_points_label(label: &str) -> Option<f64> {
    let label = label.trim();
    PREFIXED_POINTS_RE
        .captures(label)
        .or_else(|| BARE_POINTS_RE.captures(label))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn story_points(labels: &[String]) -> Option<f64> {
    labels.iter().find_map(|l| parse_story_points_label(l))
}

fn priority(labels: &[String]) -> Priority {
    if labels
        .iter()
        .any(|l| HIGH_PRIORITY_RE.is_match(l) || l.trim().eq_ignore_ascii_case("blocker"))
    {
        Priority::High
    } else if labels.iter().any(|l| LOW_PRIORITY_RE.is_match(l)) {
        Priority::Low
    } else {
        Priority::Medium
    }
}

/// `https://api.github.com/repos/acme/web` -> `acme/web`
fn project_key(repository_url: &str) -> String {
    let mut segments = repository_url.trim_end_matches('/').rsplit('/');
    match (segments.next(), segments.next()) {
        (Some(repo), Some(owner)) if !repo.is_empty() && !owner.is_empty() => {
            format!("{}/{}", owner, repo)
        }
        _ => String::new(),
    }
}

pub(super) fn normalize_github(issue: GitHubIssue) -> UnifiedIssue {
    let labels: Vec<String> = issue
        .labels
        .iter()
        .map(|l| l.name().to_string())
        .collect();

    let state = if issue.state.eq_ignore_ascii_case("closed") {
        IssueState::Closed
    } else {
        IssueState::Open
    };

    let project_key = project_key(&issue.repository_url);
    let external_id = issue.number.to_string();
    let id = if project_key.is_empty() {
        format!("{}-{}", Platform::GitHub.id_prefix(), external_id)
    } else {
        format!("{}-{}#{}", Platform::GitHub.id_prefix(), project_key, external_id)
    };

    finalize(UnifiedIssue {
        id,
        external_id,
        platform: Platform::GitHub,
        issue_type: infer_issue_type(&labels, &issue.title),
        priority: priority(&labels),
        story_points: story_points(&labels),
        title: issue.title,
        description: text_or_empty(issue.body),
        state,
        assignee: issue.assignee.map(|a| a.login).unwrap_or_default(),
        created_at: parse_optional_timestamp(issue.created_at.as_deref()),
        closed_at: parse_optional_timestamp(issue.closed_at.as_deref()),
        cycle_time_days: None,
        url: issue.html_url,
        project_key,
        sprint_name: issue.milestone.map(|m| m.title).unwrap_or_default(),
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IssueType;
    use crate::models::raw::{GitHubLabel, GitHubMilestone, GitHubUser};

    fn labels(names: &[&str]) -> Vec<GitHubLabel> {
        names
            .iter()
            .map(|n| GitHubLabel::Object {
                name: n.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_closed_bug_with_points_label() {
        let issue = GitHubIssue {
            number: 12,
            title: "Checkout total is wrong".to_string(),
            state: "closed".to_string(),
            labels: labels(&["bug", "5 points"]),
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
            closed_at: Some("2024-01-04T00:00:00Z".to_string()),
            repository_url: "https://api.github.com/repos/acme/shop".to_string(),
            html_url: "https://github.com/acme/shop/issues/12".to_string(),
            ..GitHubIssue::default()
        };

        let unified = normalize_github(issue);
        assert_eq!(unified.issue_type, IssueType::Bug);
        assert_eq!(unified.story_points, Some(5.0));
        assert_eq!(unified.cycle_time_days, Some(3));
        assert_eq!(unified.state, IssueState::Closed);
        assert_eq!(unified.id, "gh-acme/shop#12");
        assert_eq!(unified.project_key, "acme/shop");
    }

    #[test]
    fn test_open_issue_has_no_close_data() {
        let issue = GitHubIssue {
            number: 3,
            title: "Dark mode".to_string(),
            state: "open".to_string(),
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
            closed_at: Some("2024-01-02T00:00:00Z".to_string()),
            ..GitHubIssue::default()
        };

        let unified = normalize_github(issue);
        assert_eq!(unified.state, IssueState::Open);
        assert!(unified.closed_at.is_none());
        assert!(unified.cycle_time_days.is_none());
        assert_eq!(unified.id, "gh-3");
    }

    #[test]
    fn test_story_point_label_shapes() {
        assert_eq!(parse_story_points_label("sp:5"), Some(5.0));
        assert_eq!(parse_story_points_label("SP-3"), Some(3.0));
        assert_eq!(parse_story_points_label("points 8"), Some(8.0));
        assert_eq!(parse_story_points_label("story points: 13"), Some(13.0));
        assert_eq!(parse_story_points_label("story-point 2"), Some(2.0));
        assert_eq!(parse_story_points_label("8"), Some(8.0));
        assert_eq!(parse_story_points_label("1 point"), Some(1.0));
        assert_eq!(parse_story_points_label("3sp"), Some(3.0));
        assert_eq!(parse_story_points_label("v2"), None);
        assert_eq!(parse_story_points_label("bug"), None);
    }

    #[test]
    fn test_first_points_label_wins() {
        let names = vec!["sp:2".to_string(), "8 points".to_string()];
        assert_eq!(story_points(&names), Some(2.0));
    }

    #[test]
    fn test_priority_labels() {
        assert_eq!(priority(&["priority:high".to_string()]), Priority::High);
        assert_eq!(priority(&["Priority-P1".to_string()]), Priority::High);
        assert_eq!(priority(&["blocker".to_string()]), Priority::High);
        assert_eq!(priority(&["priority/minor".to_string()]), Priority::Low);
        assert_eq!(priority(&["frontend".to_string()]), Priority::Medium);
    }

    #[test]
    fn test_optional_fields_degrade() {
        let issue = GitHubIssue {
            number: 9,
            title: "Something".to_string(),
            state: "open".to_string(),
            created_at: Some("not a date".to_string()),
            ..GitHubIssue::default()
        };
        let unified = normalize_github(issue);
        assert!(unified.created_at.is_none());
        assert_eq!(unified.description, "");
        assert_eq!(unified.assignee, "");
        assert_eq!(unified.sprint_name, "");
    }

    #[test]
    fn test_assignee_and_milestone() {
        let issue = GitHubIssue {
            number: 4,
            title: "Docs".to_string(),
            state: "open".to_string(),
            assignee: Some(GitHubUser {
                login: "octocat".to_string(),
            }),
            milestone: Some(GitHubMilestone {
                title: "Sprint 14".to_string(),
            }),
            ..GitHubIssue::default()
        };
        let unified = normalize_github(issue);
        assert_eq!(unified.assignee, "octocat");
        assert_eq!(unified.sprint_name, "Sprint 14");
    }
}
