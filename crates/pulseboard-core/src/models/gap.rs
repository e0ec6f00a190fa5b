//! Story gap report types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoryGapReport {
    pub issue_id: String,
    pub gaps: Vec<StoryGap>,
    pub score: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoryGap {
    pub category: GapCategory,
    pub severity: GapSeverity,
    pub message: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapCategory {
    AcceptanceCriteria,
    EdgeCases,
    ErrorHandling,
    Security,
    Accessibility,
    Performance,
    TestCases,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapSeverity {
    High,
    Medium,
    Low,
}

impl GapCategory {
    pub const ALL: [GapCategory; 7] = [
        GapCategory::AcceptanceCriteria,
        GapCategory::EdgeCases,
        GapCategory::ErrorHandling,
        GapCategory::Security,
        GapCategory::Accessibility,
        GapCategory::Performance,
        GapCategory::TestCases,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GapCategory::AcceptanceCriteria => "Acceptance Criteria",
            GapCategory::EdgeCases => "Edge Cases",
            GapCategory::ErrorHandling => "Error Handling",
            GapCategory::Security => "Security",
            GapCategory::Accessibility => "Accessibility",
            GapCategory::Performance => "Performance",
            GapCategory::TestCases => "Test Cases",
        }
    }
}

impl GapSeverity {
    /// Points deducted from the quality score
    pub fn penalty(&self) -> u32 {
        match self {
            GapSeverity::High => 25,
            GapSeverity::Medium => 10,
            GapSeverity::Low => 5,
        }
    }
}

impl StoryGapReport {
    pub fn has_gap(&self, category: GapCategory) -> bool {
        self.gaps.iter().any(|g| g.category == category)
    }

    pub fn count(&self, severity: GapSeverity) -> usize {
        self.gaps.iter().filter(|g| g.severity == severity).count()
    }
}
