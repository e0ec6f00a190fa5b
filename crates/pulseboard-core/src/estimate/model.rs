use std::collections::BTreeMap;

use super::engine::{combined_text, estimate_warnings, keyword_estimate};
use super::nearest_fibonacci;
use crate::models::estimation::DEFAULT_POINTS_TO_DAYS_RATIO;
use crate::models::{
    ComplexityMultipliers, CycleTimeByType, EstimationMethod, EstimationModel, EstimationResult,
    ModelScope, Platform, PlatformCount, TypeBucket, UnifiedIssue,
};
use crate::normalize::infer_issue_type;

/// Closed issues with a cycle time needed before the model is trusted.
pub const MIN_SAMPLE_SIZE: usize = 5;

/// Matching issues needed before a multiplier is learned instead of assumed.
const MIN_MULTIPLIER_SAMPLES: usize = 3;

/// Issues with story points needed (strictly more than) to learn the ratio.
const MIN_RATIO_SAMPLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Api,
    Database,
    Auth,
}

impl Trigger {
    const ALL: [Trigger; 3] = [Trigger::Api, Trigger::Database, Trigger::Auth];

    fn terms(&self) -> &'static [&'static str] {
        match self {
            Trigger::Api => &["api", "integration", "endpoint"],
            Trigger::Database => &["database", "migration", "schema"],
            Trigger::Auth => &["auth", "login", "permission", "security"],
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Trigger::Api => "API/integration work",
            Trigger::Database => "Database/schema work",
            Trigger::Auth => "Auth/security work",
        }
    }

    fn matches(&self, lower_text: &str) -> bool {
        self.terms().iter().any(|term| lower_text.contains(term))
    }

    fn multiplier(&self, multipliers: &ComplexityMultipliers) -> f64 {
        match self {
            Trigger::Api => multipliers.api,
            Trigger::Database => multipliers.db,
            Trigger::Auth => multipliers.auth,
        }
    }
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// (issue, cycle time) for closed issues whose cycle time is known
fn qualifying<'a>(
    issues: impl IntoIterator<Item = &'a UnifiedIssue>,
) -> Vec<(&'a UnifiedIssue, f64)> {
    issues
        .into_iter()
        .filter(|issue| issue.is_closed())
        .filter_map(|issue| issue.cycle_time_days.map(|days| (issue, days as f64)))
        .collect()
}

fn platform_counts(sample: &[(&UnifiedIssue, f64)]) -> Vec<PlatformCount> {
    let mut counts: BTreeMap<Platform, usize> = BTreeMap::new();
    for (issue, _) in sample {
        *counts.entry(issue.platform).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(platform, count)| PlatformCount {
            platform,
            count,
            display_name: platform.display_name().to_string(),
        })
        .collect()
}

fn avg_cycle_time_by_type(sample: &[(&UnifiedIssue, f64)]) -> CycleTimeByType {
    let bucket_mean = |bucket: TypeBucket| {
        mean(
            sample
                .iter()
                .filter(|(issue, _)| issue.issue_type.bucket() == bucket)
                .map(|(_, days)| *days),
        )
    };

    let defaults = CycleTimeByType::default();
    CycleTimeByType {
        feature: bucket_mean(TypeBucket::Feature).unwrap_or(defaults.feature),
        bug: bucket_mean(TypeBucket::Bug).unwrap_or(defaults.bug),
        task: bucket_mean(TypeBucket::Task).unwrap_or(defaults.task),
    }
}

fn complexity_multipliers(sample: &[(&UnifiedIssue, f64)]) -> ComplexityMultipliers {
    let defaults = ComplexityMultipliers::default();
    let overall = mean(sample.iter().map(|(_, days)| *days)).unwrap_or(0.0);
    let texts: Vec<(String, f64)> = sample
        .iter()
        .map(|(issue, days)| (issue.searchable_text(), *days))
        .collect();

    let learn = |trigger: Trigger| {
        let matching: Vec<f64> = texts
            .iter()
            .filter(|(text, _)| trigger.matches(text))
            .map(|(_, days)| *days)
            .collect();
        if matching.len() < MIN_MULTIPLIER_SAMPLES || overall <= 0.0 {
            return trigger.multiplier(&defaults);
        }
        mean(matching).map_or(trigger.multiplier(&defaults), |avg| avg / overall)
    };

    ComplexityMultipliers {
        api: learn(Trigger::Api),
        db: learn(Trigger::Database),
        auth: learn(Trigger::Auth),
    }
}

fn points_to_days_ratio(sample: &[(&UnifiedIssue, f64)]) -> f64 {
    let ratios: Vec<f64> = sample
        .iter()
        .filter_map(|(issue, days)| {
            issue
                .story_points
                .filter(|points| *points > 0.0)
                .map(|points| days / points)
        })
        .collect();

    if ratios.len() <= MIN_RATIO_SAMPLES {
        return DEFAULT_POINTS_TO_DAYS_RATIO;
    }

    // A zero ratio (every sampled issue closed the day it opened) would make
    // every estimate infinite.
    match mean(ratios) {
        Some(ratio) if ratio > 0.0 && ratio.is_finite() => ratio,
        _ => DEFAULT_POINTS_TO_DAYS_RATIO,
    }
}

fn build(sample: Vec<(&UnifiedIssue, f64)>, scope: ModelScope) -> EstimationModel {
    if sample.len() < MIN_SAMPLE_SIZE {
        return EstimationModel {
            sample_size: sample.len(),
            platforms: platform_counts(&sample),
            ..EstimationModel::empty(scope)
        };
    }

    EstimationModel {
        has_enough_data: true,
        sample_size: sample.len(),
        scope,
        platforms: platform_counts(&sample),
        avg_cycle_time_by_type: avg_cycle_time_by_type(&sample),
        complexity_multipliers: complexity_multipliers(&sample),
        points_to_days_ratio: points_to_days_ratio(&sample),
    }
}

/// Build a cross-org model from closed issues of every platform.
///
/// Open issues and closed issues without a cycle time are ignored.
pub fn build_model(issues: &[UnifiedIssue]) -> EstimationModel {
    build(qualifying(issues), ModelScope::CrossOrg)
}

/// Build a model from one platform's closed issues only.
pub fn build_platform_model(platform: Platform, issues: &[UnifiedIssue]) -> EstimationModel {
    build(
        qualifying(issues.iter().filter(|issue| issue.platform == platform)),
        ModelScope::SinglePlatform(platform),
    )
}

/// Estimate a story from a built model.
///
/// A model without enough data falls back to keyword analysis.
pub fn estimate_with_model(
    title: &str,
    description: &str,
    labels: &[String],
    model: &EstimationModel,
) -> EstimationResult {
    let text = combined_text(title, description, labels);

    if !model.has_enough_data {
        let mut result = keyword_estimate(&text);
        result.warnings.push(format!(
            "Only {} closed issue(s) with cycle times (need {}); using keyword analysis",
            model.sample_size, MIN_SAMPLE_SIZE
        ));
        return result;
    }

    let lower = text.to_lowercase();
    let bucket = infer_issue_type(labels, title).bucket();
    let base_days = model.avg_cycle_time_by_type.get(bucket);

    let mut days = base_days;
    let mut breakdown = vec![format!(
        "Base: average {} cycle time {:.1} days",
        bucket.as_str(),
        base_days
    )];
    for trigger in Trigger::ALL {
        if trigger.matches(&lower) {
            let factor = trigger.multiplier(&model.complexity_multipliers);
            days *= factor;
            breakdown.push(format!("{}: x{:.2}", trigger.label(), factor));
        }
    }

    let raw_points = days / model.points_to_days_ratio;
    breakdown.push(format!(
        "{:.1} days / {:.2} days per point = {:.1} points",
        days, model.points_to_days_ratio, raw_points
    ));
    let points = nearest_fibonacci(raw_points);

    EstimationResult {
        points,
        estimated_days: days.round().max(0.0) as u32,
        confidence: model.confidence(),
        method: EstimationMethod::Trained,
        based_on: format!(
            "Cycle-time model from {} closed issues: {}",
            model.sample_size,
            model.platform_summary()
        ),
        breakdown,
        warnings: estimate_warnings(&text, points),
        similar_issues: Vec::new(),
    }
}
