//! Estimation model and result types

use serde::{Deserialize, Serialize};

use super::{Platform, TypeBucket};

/// Average cycle time assumed for a type bucket with no history.
pub const DEFAULT_FEATURE_DAYS: f64 = 5.0;
pub const DEFAULT_BUG_DAYS: f64 = 2.0;
pub const DEFAULT_TASK_DAYS: f64 = 3.0;

/// Multipliers assumed when fewer than three matching issues exist.
pub const DEFAULT_API_MULTIPLIER: f64 = 1.3;
pub const DEFAULT_DB_MULTIPLIER: f64 = 1.4;
pub const DEFAULT_AUTH_MULTIPLIER: f64 = 1.5;

pub const DEFAULT_POINTS_TO_DAYS_RATIO: f64 = 1.0;

/// Immutable snapshot derived from a batch of closed issues.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstimationModel {
    pub has_enough_data: bool,
    pub sample_size: usize,
    pub scope: ModelScope,
    pub platforms: Vec<PlatformCount>,
    pub avg_cycle_time_by_type: CycleTimeByType,
    pub complexity_multipliers: ComplexityMultipliers,
    pub points_to_days_ratio: f64,
}

/// Which history a model was built from. Selects the confidence formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "platform", rename_all = "snake_case")]
pub enum ModelScope {
    CrossOrg,
    SinglePlatform(Platform),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlatformCount {
    pub platform: Platform,
    pub count: usize,
    pub display_name: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CycleTimeByType {
    pub feature: f64,
    pub bug: f64,
    pub task: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ComplexityMultipliers {
    pub api: f64,
    pub db: f64,
    pub auth: f64,
}

impl EstimationModel {
    /// A model with no history; every estimate falls back to keywords.
    pub fn empty(scope: ModelScope) -> Self {
        Self {
            has_enough_data: false,
            sample_size: 0,
            scope,
            platforms: Vec::new(),
            avg_cycle_time_by_type: CycleTimeByType::default(),
            complexity_multipliers: ComplexityMultipliers::default(),
            points_to_days_ratio: DEFAULT_POINTS_TO_DAYS_RATIO,
        }
    }

    /// Confidence for a trained estimate, capped at 95.
    ///
    /// Cross-org models grow one point per sample, single-platform models
    /// two points per sample.
    pub fn confidence(&self) -> u8 {
        let per_sample = match self.scope {
            ModelScope::CrossOrg => 1,
            ModelScope::SinglePlatform(_) => 2,
        };
        let raw = 50usize.saturating_add(self.sample_size.saturating_mul(per_sample));
        raw.min(95) as u8
    }

    /// "GitHub (12), Jira (4)"
    pub fn platform_summary(&self) -> String {
        self.platforms
            .iter()
            .map(|p| format!("{} ({})", p.display_name, p.count))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl CycleTimeByType {
    pub fn get(&self, bucket: TypeBucket) -> f64 {
        match bucket {
            TypeBucket::Feature => self.feature,
            TypeBucket::Bug => self.bug,
            TypeBucket::Task => self.task,
        }
    }
}

impl Default for CycleTimeByType {
    fn default() -> Self {
        Self {
            feature: DEFAULT_FEATURE_DAYS,
            bug: DEFAULT_BUG_DAYS,
            task: DEFAULT_TASK_DAYS,
        }
    }
}

impl Default for ComplexityMultipliers {
    fn default() -> Self {
        Self {
            api: DEFAULT_API_MULTIPLIER,
            db: DEFAULT_DB_MULTIPLIER,
            auth: DEFAULT_AUTH_MULTIPLIER,
        }
    }
}

/// Output of one estimate call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstimationResult {
    pub points: u32,
    pub estimated_days: u32,
    pub confidence: u8,
    pub method: EstimationMethod,
    pub based_on: String,
    pub breakdown: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub similar_issues: Vec<SimilarIssue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationMethod {
    /// Average of the closest historical matches
    Historical,
    /// Closest match blended with keyword analysis
    Blended,
    /// Keyword analysis alone
    Keyword,
    /// Cycle-time model built from closed issues
    Trained,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarIssue {
    pub id: String,
    pub title: String,
    pub points: f64,
    pub similarity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_model_uses_fallbacks() {
        let model = EstimationModel::empty(ModelScope::CrossOrg);
        assert!(!model.has_enough_data);
        assert_eq!(model.avg_cycle_time_by_type.get(TypeBucket::Feature), 5.0);
        assert_eq!(model.avg_cycle_time_by_type.get(TypeBucket::Bug), 2.0);
        assert_eq!(model.avg_cycle_time_by_type.get(TypeBucket::Task), 3.0);
        assert_eq!(model.complexity_multipliers.auth, 1.5);
        assert_eq!(model.points_to_days_ratio, 1.0);
    }

    #[test]
    fn test_confidence_formulas_differ_by_scope() {
        let mut cross = EstimationModel::empty(ModelScope::CrossOrg);
        cross.sample_size = 10;
        assert_eq!(cross.confidence(), 60);

        let mut single = EstimationModel::empty(ModelScope::SinglePlatform(Platform::Jira));
        single.sample_size = 10;
        assert_eq!(single.confidence(), 70);

        single.sample_size = 40;
        assert_eq!(single.confidence(), 95);
        cross.sample_size = 500;
        assert_eq!(cross.confidence(), 95);
    }

    #[test]
    fn test_scope_serialization() {
        let value = serde_json::to_value(ModelScope::SinglePlatform(Platform::GitHub)).unwrap();
        assert_eq!(value["kind"], "single_platform");
        assert_eq!(value["platform"], "github");
    }
}
