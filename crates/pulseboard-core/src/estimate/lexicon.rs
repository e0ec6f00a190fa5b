use serde::{Deserialize, Serialize};

pub const HIGH_COMPLEXITY_KEYWORDS: &[&str] = &[
    "architecture",
    "refactor",
    "migration",
    "distributed",
    "infrastructure",
    "redesign",
    "overhaul",
    "scalability",
    "real-time",
    "microservice",
    "encryption",
    "concurrency",
];

pub const MEDIUM_COMPLEXITY_KEYWORDS: &[&str] = &[
    "api",
    "database",
    "integration",
    "authentication",
    "security",
    "workflow",
    "validation",
    "notification",
    "endpoint",
    "search",
    "permission",
    "dashboard",
];

pub const LOW_COMPLEXITY_KEYWORDS: &[&str] = &[
    "typo",
    "text",
    "copy",
    "label",
    "color",
    "style",
    "rename",
    "tooltip",
    "icon",
    "spacing",
    "documentation",
    "readme",
];

/// Outcome of matching a story's text against the keyword tiers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordAnalysis {
    pub points: u32,
    pub reason: String,
    pub match_count: usize,
    pub matched_keywords: Vec<String>,
}

fn matches(text: &str, tier: &[&str]) -> Vec<String> {
    tier.iter()
        .filter(|keyword| text.contains(*keyword))
        .map(|keyword| keyword.to_string())
        .collect()
}

/// Score text by complexity keywords.
///
/// Substring containment, not word boundaries. The branches are evaluated
/// strictly in this order; note that a single medium match, or no low
/// matches at all, yields 3 before any low-tier rule is considered.
pub fn analyze_keywords(text: &str) -> KeywordAnalysis {
    let text = text.to_lowercase();
    let high = matches(&text, HIGH_COMPLEXITY_KEYWORDS);
    let medium = matches(&text, MEDIUM_COMPLEXITY_KEYWORDS);
    let low = matches(&text, LOW_COMPLEXITY_KEYWORDS);

    let (points, reason) = if high.len() >= 2 {
        (
            13,
            format!("Multiple high-complexity keywords: {}", high.join(", ")),
        )
    } else if high.len() == 1 {
        (8, format!("High-complexity keyword: {}", high[0]))
    } else if medium.len() >= 2 {
        (
            5,
            format!("Multiple medium-complexity keywords: {}", medium.join(", ")),
        )
    } else if medium.len() == 1 || low.is_empty() {
        match medium.first() {
            Some(keyword) => (3, format!("Medium-complexity keyword: {}", keyword)),
            None => (3, "No complexity keywords found; using default".to_string()),
        }
    } else if low.len() >= 2 {
        (
            1,
            format!("Multiple low-complexity keywords: {}", low.join(", ")),
        )
    } else {
        (2, format!("Low-complexity keyword: {}", low[0]))
    };

    let matched_keywords: Vec<String> = high.into_iter().chain(medium).chain(low).collect();

    KeywordAnalysis {
        points,
        reason,
        match_count: matched_keywords.len(),
        matched_keywords,
    }
}
