use regex::Regex;
use std::sync::LazyLock;

use super::lexicon::{KeywordAnalysis, analyze_keywords};
use super::similarity::{jaccard_similarity, tokenize};
use super::{UNTRAINED_DAYS_PER_POINT, nearest_fibonacci};
use crate::models::{EstimationMethod, EstimationResult, SimilarIssue, UnifiedIssue};

static POINTS_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| match Regex::new(r"(?i)^\s*(\d+)\s*points?\s*$") {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    });

/// Similarity a historical issue needs to count as related at all.
const MIN_SIMILARITY: f64 = 0.1;
const STRONG_MATCH: f64 = 0.5;
const VERY_STRONG_MATCH: f64 = 0.7;
const BLEND_MATCH: f64 = 0.3;

const DEFAULT_HISTORICAL_POINTS: f64 = 3.0;
const MAX_SIMILAR_ISSUES: usize = 3;
const BRIEF_TEXT_CHARS: usize = 50;

/// Points a historical issue is taken to be worth.
///
/// Explicit story points, else a "N points" label, else 3.
pub fn historical_points(issue: &UnifiedIssue) -> f64 {
    issue
        .story_points
        .or_else(|| {
            issue.labels.iter().find_map(|label| {
                POINTS_LABEL_RE
                    .captures(label)
                    .and_then(|caps| caps.get(1))
                    .and_then(|m| m.as_str().parse::<f64>().ok())
            })
        })
        .unwrap_or(DEFAULT_HISTORICAL_POINTS)
}

/// `"{title} {description} {labels}"`, the text every rule looks at.
pub(crate) fn combined_text(title: &str, description: &str, labels: &[String]) -> String {
    format!("{} {} {}", title, description, labels.join(" "))
}

/// Caveats that hold regardless of how the points were reached.
pub(crate) fn estimate_warnings(text: &str, points: u32) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut warnings = Vec::new();

    if lower.contains("integration") && points < 5 {
        warnings.push(
            "Integration work is often underestimated; consider at least 5 points".to_string(),
        );
    }

    if lower.contains("security") && points < 5 {
        warnings.push(
            "Security-sensitive work is often underestimated; plan a review and consider at least 5 points"
                .to_string(),
        );
    }

    if text.chars().count() < BRIEF_TEXT_CHARS {
        warnings.push(format!(
            "Description is brief (under {} characters); the estimate may be unreliable",
            BRIEF_TEXT_CHARS
        ));
    }

    warnings
}

pub(crate) fn untrained_days(points: u32) -> u32 {
    (f64::from(points) * UNTRAINED_DAYS_PER_POINT).ceil() as u32
}

pub(crate) fn keyword_confidence(analysis: &KeywordAnalysis) -> u8 {
    if analysis.match_count > 2 { 55 } else { 40 }
}

/// Keyword-only estimate, the path taken when there is no usable history.
pub(crate) fn keyword_estimate(text: &str) -> EstimationResult {
    let analysis = analyze_keywords(text);
    let points = analysis.points;

    EstimationResult {
        points,
        estimated_days: untrained_days(points),
        confidence: keyword_confidence(&analysis),
        method: EstimationMethod::Keyword,
        based_on: format!("Keyword analysis: {}", analysis.reason),
        breakdown: vec![format!(
            "{} keyword match(es): {}",
            analysis.match_count,
            analysis.matched_keywords.join(", ")
        )],
        warnings: estimate_warnings(text, points),
        similar_issues: Vec::new(),
    }
}

fn rank_similar<'a>(text: &str, historical: &'a [UnifiedIssue]) -> Vec<(f64, &'a UnifiedIssue)> {
    let candidate = tokenize(text);
    let mut similar: Vec<(f64, &UnifiedIssue)> = historical
        .iter()
        .map(|issue| {
            let words = tokenize(&combined_text(
                &issue.title,
                &issue.description,
                &issue.labels,
            ));
            (jaccard_similarity(&candidate, &words), issue)
        })
        .filter(|(score, _)| *score > MIN_SIMILARITY)
        .collect();

    similar.sort_by(|a, b| b.0.total_cmp(&a.0));
    similar
}

/// Estimate a story against one collection of historical issues.
///
/// Three strong matches are averaged; a single decent match is blended with
/// keyword analysis; otherwise keywords decide alone.
pub fn estimate(
    title: &str,
    description: &str,
    labels: &[String],
    historical: &[UnifiedIssue],
) -> EstimationResult {
    let text = combined_text(title, description, labels);
    let similar = rank_similar(&text, historical);

    let similar_issues: Vec<SimilarIssue> = similar
        .iter()
        .take(MAX_SIMILAR_ISSUES)
        .map(|(score, issue)| SimilarIssue {
            id: issue.id.clone(),
            title: issue.title.clone(),
            points: historical_points(issue),
            similarity: *score,
        })
        .collect();
    let top_similarity = similar.first().map(|(score, _)| *score).unwrap_or(0.0);

    let mut result = if similar.len() >= MAX_SIMILAR_ISSUES && top_similarity > STRONG_MATCH {
        let average = similar_issues.iter().map(|s| s.points).sum::<f64>()
            / similar_issues.len() as f64;
        let points = nearest_fibonacci(average);

        EstimationResult {
            points,
            estimated_days: untrained_days(points),
            confidence: if top_similarity > VERY_STRONG_MATCH { 85 } else { 70 },
            method: EstimationMethod::Historical,
            based_on: format!(
                "Average of the {} most similar historical issues (top match {:.0}% similar)",
                similar_issues.len(),
                top_similarity * 100.0
            ),
            breakdown: similar_issues
                .iter()
                .map(|s| {
                    format!(
                        "{}: {} pts ({:.0}% similar)",
                        s.title,
                        s.points,
                        s.similarity * 100.0
                    )
                })
                .collect(),
            warnings: Vec::new(),
            similar_issues: Vec::new(),
        }
    } else if top_similarity > BLEND_MATCH {
        let analysis = analyze_keywords(&text);
        let top = &similar_issues[0];
        let points = nearest_fibonacci((top.points + f64::from(analysis.points)) / 2.0);

        EstimationResult {
            points,
            estimated_days: untrained_days(points),
            confidence: 60,
            method: EstimationMethod::Blended,
            based_on: format!(
                "Blend of similar issue \"{}\" and keyword analysis",
                top.title
            ),
            breakdown: vec![
                format!(
                    "Similar issue: {} pts ({:.0}% similar)",
                    top.points,
                    top.similarity * 100.0
                ),
                format!("Keyword analysis: {} pts ({})", analysis.points, analysis.reason),
            ],
            warnings: Vec::new(),
            similar_issues: Vec::new(),
        }
    } else {
        keyword_estimate(&text)
    };

    result.warnings = estimate_warnings(&text, result.points);
    result.similar_issues = similar_issues;
    result
}
