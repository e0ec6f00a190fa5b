pub mod config;
pub mod estimation;
pub mod gap;
pub mod issue;
pub mod raw;

pub use config::{AzureDevOpsConfig, DashboardConfig, GitHubConfig, JiraConfig};
pub use estimation::{
    ComplexityMultipliers, CycleTimeByType, EstimationMethod, EstimationModel, EstimationResult,
    ModelScope, PlatformCount, SimilarIssue,
};
pub use gap::{GapCategory, GapSeverity, StoryGap, StoryGapReport};
pub use issue::{IssueState, IssueType, Platform, Priority, TypeBucket, UnifiedIssue};
pub use raw::RawIssue;
