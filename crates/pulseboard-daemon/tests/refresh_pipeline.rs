use pulseboard_core::models::raw::{GitHubIssue, GitHubLabel, JiraFields, JiraIssue};
use pulseboard_core::models::{EstimationMethod, GapCategory, Platform, RawIssue};
use pulseboard_daemon::{
    AggregationManager, EventManager, RefreshError, RefreshEventType, RefreshManager,
};
use pulseboard_platforms::{Error, IssueSource, StateFilter};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// A source serving fixed open and closed issues, optionally failing or
/// holding every fetch until released.
struct FakeSource {
    platform: Platform,
    open: Vec<RawIssue>,
    closed: Vec<RawIssue>,
    fail: bool,
    gate: Option<Arc<Notify>>,
    calls: Arc<AtomicUsize>,
}

impl FakeSource {
    fn new(platform: Platform) -> Self {
        Self {
            platform,
            open: Vec::new(),
            closed: Vec::new(),
            fail: false,
            gate: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl IssueSource for FakeSource {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn fetch_issues(&self, filter: StateFilter) -> pulseboard_platforms::Result<Vec<RawIssue>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail {
            return Err(Error::Auth(format!("{} token expired", self.platform)));
        }
        Ok(match filter {
            StateFilter::Open => self.open.clone(),
            StateFilter::Closed => self.closed.clone(),
            StateFilter::All => self.open.iter().chain(&self.closed).cloned().collect(),
        })
    }
}

fn github_issue(number: u64, title: &str, labels: &[&str], closed_days: Option<u32>) -> RawIssue {
    RawIssue::GitHub(GitHubIssue {
        number,
        title: title.to_string(),
        state: if closed_days.is_some() { "closed" } else { "open" }.to_string(),
        labels: labels
            .iter()
            .map(|name| GitHubLabel::Name(name.to_string()))
            .collect(),
        created_at: Some("2024-03-01T09:00:00Z".to_string()),
        closed_at: closed_days.map(|days| format!("2024-03-{:02}T09:00:00Z", 1 + days)),
        repository_url: "https://api.github.com/repos/acme/web".to_string(),
        ..Default::default()
    })
}

fn jira_story(key: &str, summary: &str) -> RawIssue {
    RawIssue::Jira(JiraIssue {
        id: key.to_string(),
        key: key.to_string(),
        self_url: String::new(),
        fields: JiraFields {
            summary: summary.to_string(),
            ..Default::default()
        },
    })
}

fn manager(sources: Vec<FakeSource>) -> (RefreshManager<FakeSource>, Arc<EventManager>) {
    let events = Arc::new(EventManager::new());
    (
        RefreshManager::new(AggregationManager::new(sources), events.clone()),
        events,
    )
}

#[tokio::test]
async fn test_partial_failure_keeps_other_platforms() {
    let mut github = FakeSource::new(Platform::GitHub);
    github.open = vec![github_issue(1, "Weekly digest", &[], None)];
    github.closed = vec![github_issue(2, "Fix login", &["bug", "5 points"], Some(3))];

    let mut jira = FakeSource::new(Platform::Jira);
    jira.fail = true;

    let (manager, _) = manager(vec![github, jira]);
    let snapshot = manager.refresh().await.unwrap();

    assert_eq!(snapshot.open_issues.len(), 1);
    assert_eq!(snapshot.closed_issues.len(), 1);
    assert_eq!(snapshot.closed_issues[0].cycle_time_days, Some(3));
    assert_eq!(snapshot.closed_issues[0].story_points, Some(5.0));

    // Both fan-outs fail with the same error; it is reported once
    assert_eq!(snapshot.errors.len(), 1);
    assert_eq!(snapshot.errors[0].platform, Platform::Jira);
    assert!(snapshot.errors[0].error.contains("token expired"));
}

#[tokio::test]
async fn test_queries_before_refresh_fail() {
    let (manager, _) = manager(vec![FakeSource::new(Platform::GitHub)]);

    assert!(manager.snapshot().await.is_none());
    assert!(matches!(
        manager.estimate("Anything", "", &[]).await,
        Err(RefreshError::NotLoaded)
    ));
    assert!(matches!(
        manager.gap_reports().await,
        Err(RefreshError::NotLoaded)
    ));
}

#[tokio::test]
async fn test_overlapping_refresh_is_skipped() {
    let gate = Arc::new(Notify::new());
    let mut github = FakeSource::new(Platform::GitHub);
    github.open = vec![github_issue(1, "Export report", &[], None)];
    github.gate = Some(gate.clone());
    let calls = github.calls.clone();

    let (manager, events) = manager(vec![github]);
    let mut receiver = events.subscribe();

    let (first, second) = tokio::join!(manager.refresh(), async {
        // Wait until both fan-outs of the first refresh are parked on the gate
        while calls.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }
        assert!(manager.is_refreshing());
        let second = manager.refresh().await;
        gate.notify_waiters();
        second
    });

    assert!(matches!(second, Err(RefreshError::InFlight)));
    let snapshot = first.unwrap();
    assert_eq!(snapshot.open_issues.len(), 1);
    assert!(!manager.is_refreshing());
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let mut seen = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        seen.push(event.event_type);
    }
    assert_eq!(
        seen,
        vec![
            RefreshEventType::Started,
            RefreshEventType::Skipped,
            RefreshEventType::Completed {
                issue_count: 1,
                error_count: 0
            },
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_snapshot_visible_when_completed_arrives() {
    let mut github = FakeSource::new(Platform::GitHub);
    github.open = vec![github_issue(1, "Weekly digest", &[], None)];

    let (manager, events) = manager(vec![github]);
    let manager = Arc::new(manager);
    let mut receiver = events.subscribe();

    let watcher = {
        let manager = manager.clone();
        tokio::spawn(async move {
            loop {
                let event = receiver.recv().await.unwrap();
                if matches!(event.event_type, RefreshEventType::Completed { .. }) {
                    return manager.snapshot().await.map(|s| s.open_issues.len());
                }
            }
        })
    };

    manager.refresh().await.unwrap();
    assert_eq!(watcher.await.unwrap(), Some(1));
}

#[tokio::test]
async fn test_estimates_after_refresh() {
    let mut github = FakeSource::new(Platform::GitHub);
    github.closed = vec![
        github_issue(1, "Export invoices monthly report", &["5"], Some(4)),
        github_issue(2, "Export invoices weekly report", &["8"], Some(6)),
        github_issue(3, "Export invoices yearly report", &["8"], Some(5)),
        github_issue(4, "Fix broken avatar upload", &["bug", "2"], Some(1)),
        github_issue(5, "Fix typo in footer", &["bug", "1"], Some(1)),
    ];

    let mut jira = FakeSource::new(Platform::Jira);
    jira.open = vec![jira_story("APP-7", "Weekly digest")];

    let (manager, _) = manager(vec![github, jira]);
    let snapshot = manager.refresh().await.unwrap();
    assert!(snapshot.model.has_enough_data);
    assert_eq!(snapshot.model.sample_size, 5);

    let trained = manager
        .estimate("Export invoices quarterly report", "", &[])
        .await
        .unwrap();
    assert_eq!(trained.method, EstimationMethod::Trained);

    let similar = manager
        .estimate_by_similarity("Export invoices quarterly report", "", &[])
        .await
        .unwrap();
    // {export, invoices, report} shared out of five words: 0.6
    assert_eq!(similar.method, EstimationMethod::Historical);
    // (5 + 8 + 8) / 3 = 7 -> 8
    assert_eq!(similar.points, 8);
    assert_eq!(similar.similar_issues.len(), 3);

    // No Jira history at all, so the single-platform model falls back
    let jira_only = manager
        .estimate_for_platform(Platform::Jira, "Export invoices quarterly report", "", &[])
        .await
        .unwrap();
    assert_eq!(jira_only.method, EstimationMethod::Keyword);

    let reports = manager.gap_reports().await.unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].issue_id, "jira-APP-7");
    assert!(reports[0].has_gap(GapCategory::AcceptanceCriteria));
    assert_eq!(reports[0].score, 50);
}
