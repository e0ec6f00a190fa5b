//! Story point estimation
//!
//! Two paths produce an [`EstimationResult`](crate::models::EstimationResult):
//!
//! - [`estimate`] compares a new story against one collection of historical
//!   issues by word overlap and blends in keyword analysis.
//! - [`estimate_with_model`] uses an [`EstimationModel`](crate::models::EstimationModel)
//!   built from closed issues (cycle times per type, complexity multipliers)
//!   and falls back to keyword analysis when the model is thin.

mod engine;
mod fibonacci;
mod lexicon;
mod model;
mod similarity;

pub use engine::{estimate, historical_points};
pub use fibonacci::{FIBONACCI_SCALE, nearest_fibonacci};
pub use lexicon::{
    HIGH_COMPLEXITY_KEYWORDS, KeywordAnalysis, LOW_COMPLEXITY_KEYWORDS, MEDIUM_COMPLEXITY_KEYWORDS,
    analyze_keywords,
};
pub use model::{MIN_SAMPLE_SIZE, build_model, build_platform_model, estimate_with_model};
pub use similarity::{jaccard_similarity, tokenize};

/// Fixed days-per-point used when no model is available.
pub const UNTRAINED_DAYS_PER_POINT: f64 = 0.75;
