//! Story gap analysis
//!
//! Checks an issue's text and labels for things a well-formed story usually
//! covers. Each rule is independent and contributes at most one gap.

use std::collections::HashSet;

use crate::models::{GapCategory, GapSeverity, StoryGap, StoryGapReport, UnifiedIssue};

const ACCEPTANCE_TERMS: &[&str] = &[
    "acceptance criteria",
    "- [ ]",
    "- [x]",
    "should",
    "definition of done",
];
const EDGE_CASE_TERMS: &[&str] = &[
    "edge case",
    "corner case",
    "boundary",
    "what if",
    "empty",
    "invalid",
];
const ERROR_TERMS: &[&str] = &["error", "fail", "exception", "retry", "timeout", "fallback"];
const SECURITY_TERMS: &[&str] = &[
    "password",
    "token",
    "auth",
    "login",
    "permission",
    "credential",
    "payment",
    "personal data",
    "pii",
    "encrypt",
];
/// Matched as whole words, so "form" does not fire on "performance".
const UI_TERMS: &[&str] = &[
    "button", "form", "modal", "dialog", "screen", "page", "layout", "ui",
];
const DATA_VOLUME_TERMS: &[&str] = &[
    "bulk",
    "batch",
    "thousands",
    "large",
    "import",
    "export",
    "pagination",
];
const PERFORMANCE_TERMS: &[&str] = &[
    "performance",
    "latency",
    "load",
    "response time",
    "throughput",
];

const TEST_CASES_LABEL: &str = "has-test-cases";

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}

/// True when any term appears as a word of its own, singular or plural.
fn mentions_word(words: &HashSet<&str>, terms: &[&str]) -> bool {
    terms.iter().any(|term| {
        words.contains(term)
            || words
                .iter()
                .any(|word| word.strip_suffix('s') == Some(*term))
    })
}

fn label_contains_any(issue: &UnifiedIssue, needles: &[&str]) -> bool {
    issue.labels.iter().any(|label| {
        let label = label.to_lowercase();
        needles.iter().any(|needle| label.contains(needle))
    })
}

fn gap(category: GapCategory, severity: GapSeverity, message: &str, suggestion: &str) -> StoryGap {
    StoryGap {
        category,
        severity,
        message: message.to_string(),
        suggestion: suggestion.to_string(),
    }
}

/// Acceptance criteria also count as "given/when/then" when all three appear.
fn has_acceptance_language(text: &str) -> bool {
    let gherkin = text.contains("given") && text.contains("when") && text.contains("then");
    gherkin || contains_any(text, ACCEPTANCE_TERMS)
}

/// Quality score from gap severities, floored at zero.
pub fn gap_score(gaps: &[StoryGap]) -> u8 {
    let penalty: u32 = gaps.iter().map(|g| g.severity.penalty()).sum();
    100u32.saturating_sub(penalty) as u8
}

/// Run every rule against one issue.
pub fn analyze_gaps(issue: &UnifiedIssue) -> StoryGapReport {
    let text = format!("{} {}", issue.title, issue.description).to_lowercase();
    let words: HashSet<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();
    let mut gaps = Vec::new();

    if !has_acceptance_language(&text) {
        gaps.push(gap(
            GapCategory::AcceptanceCriteria,
            GapSeverity::High,
            "No acceptance criteria found",
            "Add testable acceptance criteria, e.g. Given/When/Then or a checklist",
        ));
    }

    if !contains_any(&text, EDGE_CASE_TERMS) {
        gaps.push(gap(
            GapCategory::EdgeCases,
            GapSeverity::Medium,
            "Edge cases are not described",
            "List boundary conditions such as empty, invalid or maximum-size input",
        ));
    }

    if !contains_any(&text, ERROR_TERMS) {
        gaps.push(gap(
            GapCategory::ErrorHandling,
            GapSeverity::Medium,
            "Error handling is not described",
            "Describe what the user sees and what the system does when something fails",
        ));
    }

    if contains_any(&text, SECURITY_TERMS) && !label_contains_any(issue, &["security"]) {
        gaps.push(gap(
            GapCategory::Security,
            GapSeverity::High,
            "Touches security-sensitive functionality without a security label",
            "Add a security label and request a security review",
        ));
    }

    if mentions_word(&words, UI_TERMS) && !label_contains_any(issue, &["accessibility", "a11y"]) {
        gaps.push(gap(
            GapCategory::Accessibility,
            GapSeverity::Medium,
            "UI change without accessibility requirements",
            "Add keyboard, screen reader and contrast requirements and an accessibility label",
        ));
    }

    if contains_any(&text, DATA_VOLUME_TERMS) && !contains_any(&text, PERFORMANCE_TERMS) {
        gaps.push(gap(
            GapCategory::Performance,
            GapSeverity::Medium,
            "Handles data volume without performance expectations",
            "State expected volumes and acceptable response times",
        ));
    }

    if !issue.has_label(TEST_CASES_LABEL) {
        gaps.push(gap(
            GapCategory::TestCases,
            GapSeverity::Low,
            "No test cases linked",
            "Write test cases and add the has-test-cases label",
        ));
    }

    StoryGapReport {
        issue_id: issue.id.clone(),
        score: gap_score(&gaps),
        gaps,
    }
}

/// Reports for a batch of issues, in input order.
pub fn analyze_all(issues: &[UnifiedIssue]) -> Vec<StoryGapReport> {
    issues.iter().map(analyze_gaps).collect()
}

/// How many reports carry each category, skipping categories nobody has.
pub fn category_counts(reports: &[StoryGapReport]) -> Vec<(GapCategory, usize)> {
    GapCategory::ALL
        .into_iter()
        .map(|category| {
            let count = reports.iter().filter(|r| r.has_gap(category)).count();
            (category, count)
        })
        .filter(|(_, count)| *count > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IssueState, IssueType, Platform, Priority};

    fn issue(title: &str, description: &str, labels: &[&str]) -> UnifiedIssue {
        UnifiedIssue {
            id: "jira-APP-1".to_string(),
            external_id: "APP-1".to_string(),
            platform: Platform::Jira,
            title: title.to_string(),
            description: description.to_string(),
            state: IssueState::Open,
            issue_type: IssueType::Feature,
            priority: Priority::Medium,
            story_points: None,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            assignee: String::new(),
            created_at: None,
            closed_at: None,
            cycle_time_days: None,
            url: String::new(),
            project_key: "APP".to_string(),
            sprint_name: String::new(),
        }
    }

    #[test]
    fn test_empty_story() {
        let report = analyze_gaps(&issue("Weekly digest", "", &[]));

        assert!(report.has_gap(GapCategory::AcceptanceCriteria));
        assert!(report.has_gap(GapCategory::EdgeCases));
        assert!(report.has_gap(GapCategory::ErrorHandling));
        assert!(report.has_gap(GapCategory::TestCases));
        assert_eq!(report.gaps.len(), 4);
        assert_eq!(report.count(GapSeverity::High), 1);
        assert_eq!(report.count(GapSeverity::Medium), 2);
        assert_eq!(report.count(GapSeverity::Low), 1);
        assert_eq!(report.score, 50);
        assert_eq!(report.issue_id, "jira-APP-1");
    }

    #[test]
    fn test_complete_story_scores_full() {
        let report = analyze_gaps(&issue(
            "Weekly digest",
            "Acceptance criteria: the digest lists new comments. \
             Edge case: an empty week sends nothing. \
             If delivery fails we retry once.",
            &["has-test-cases"],
        ));
        assert!(report.gaps.is_empty(), "{:?}", report.gaps);
        assert_eq!(report.score, 100);
    }

    #[test]
    fn test_gherkin_counts_as_acceptance_criteria() {
        let report = analyze_gaps(&issue(
            "Digest",
            "Given a subscriber, when the week ends, then a digest is sent",
            &[],
        ));
        assert!(!report.has_gap(GapCategory::AcceptanceCriteria));
    }

    #[test]
    fn test_security_keyword_needs_label() {
        let story = "Reset password by email";
        let report = analyze_gaps(&issue(story, "", &[]));
        assert!(report.has_gap(GapCategory::Security));

        let report = analyze_gaps(&issue(story, "", &["Security"]));
        assert!(!report.has_gap(GapCategory::Security));
    }

    #[test]
    fn test_ui_keyword_needs_accessibility_label() {
        let report = analyze_gaps(&issue("New settings page", "", &[]));
        assert!(report.has_gap(GapCategory::Accessibility));

        let report = analyze_gaps(&issue("New settings page", "", &["a11y"]));
        assert!(!report.has_gap(GapCategory::Accessibility));
    }

    #[test]
    fn test_ui_keyword_next_to_punctuation() {
        assert!(analyze_gaps(&issue("Polish the UI.", "", &[])).has_gap(GapCategory::Accessibility));
        assert!(analyze_gaps(&issue("Settings (UI) cleanup", "", &[])).has_gap(GapCategory::Accessibility));
        assert!(analyze_gaps(&issue("Add buttons to export", "", &[])).has_gap(GapCategory::Accessibility));
    }

    #[test]
    fn test_ui_keyword_inside_longer_word_is_ignored() {
        let report = analyze_gaps(&issue(
            "Improve performance of information retrieval",
            "Build the suite on the build server",
            &[],
        ));
        assert!(!report.has_gap(GapCategory::Accessibility));
    }

    #[test]
    fn test_given_alone_is_not_acceptance_criteria() {
        let report = analyze_gaps(&issue("Digest", "Given enough time we ship it", &[]));
        assert!(report.has_gap(GapCategory::AcceptanceCriteria));

        let report = analyze_gaps(&issue("Digest", "- [ ] digest lists new comments", &[]));
        assert!(!report.has_gap(GapCategory::AcceptanceCriteria));
    }

    #[test]
    fn test_data_volume_needs_performance_language() {
        let report = analyze_gaps(&issue("Bulk import contacts", "", &[]));
        assert!(report.has_gap(GapCategory::Performance));

        let report = analyze_gaps(&issue(
            "Bulk import contacts",
            "Performance: 10k rows under 30 seconds",
            &[],
        ));
        assert!(!report.has_gap(GapCategory::Performance));
    }

    #[test]
    fn test_score_floors_at_zero() {
        let gaps: Vec<StoryGap> = (0..5)
            .map(|_| gap(GapCategory::Security, GapSeverity::High, "", ""))
            .collect();
        assert_eq!(gap_score(&gaps), 0);
    }

    #[test]
    fn test_analyze_all_preserves_order() {
        let mut second = issue("Second", "", &[]);
        second.id = "jira-APP-2".to_string();
        let reports = analyze_all(&[issue("First", "", &[]), second]);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].issue_id, "jira-APP-2");
    }

    #[test]
    fn test_category_counts() {
        let reports = analyze_all(&[
            issue("Weekly digest", "", &[]),
            issue("Reset password", "", &["has-test-cases"]),
        ]);
        let counts = category_counts(&reports);

        assert_eq!(counts[0], (GapCategory::AcceptanceCriteria, 2));
        assert!(counts.contains(&(GapCategory::Security, 1)));
        assert!(counts.contains(&(GapCategory::TestCases, 1)));
        assert!(!counts.iter().any(|(category, _)| *category == GapCategory::Accessibility));
    }
}
