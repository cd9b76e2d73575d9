use std::sync::OnceLock;

use regex_lite::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Comparison,
    Trend,
    Summary,
    Specific,
    General,
}

/// Entities and question type detected in a user question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryIntent {
    /// Mentioned companies, uppercased, in configured order.
    pub companies: Vec<String>,
    /// Years 2020-2049, first-seen order, no duplicates.
    pub years: Vec<String>,
    pub metrics: Vec<String>,
    pub query_type: QueryType,
}

const METRICS: [(&str, &[&str]); 4] = [
    ("revenue", &["revenue", "sales", "turnover"]),
    ("profit", &["profit", "earnings", "net income", "ebitda", "ebit"]),
    ("growth", &["growth", "increase", "trend"]),
    ("performance", &["performance", "results"]),
];

fn year_pattern() -> &'static Regex {
    static YEAR: OnceLock<Regex> = OnceLock::new();
    YEAR.get_or_init(|| Regex::new(r"20[2-4][0-9]").expect("static year pattern"))
}

/// Classify a question by keyword matching. Pure; no model involved.
///
/// Matching is by substring, so "over" also fires inside "overview" and
/// such questions classify as trend.
pub fn analyze_query_intent(question: &str, companies: &[String]) -> QueryIntent {
    let lower = question.to_lowercase();
    let has = |word: &str| lower.contains(word);

    let companies: Vec<String> = companies
        .iter()
        .filter(|c| has(c.to_lowercase().as_str()))
        .map(|c| c.to_uppercase())
        .collect();

    let mut years: Vec<String> = Vec::new();
    for m in year_pattern().find_iter(question) {
        if !years.iter().any(|y| y == m.as_str()) {
            years.push(m.as_str().to_string());
        }
    }

    let metrics: Vec<String> = METRICS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| has(*k)))
        .map(|(name, _)| name.to_string())
        .collect();

    let query_type = if has("compare") || has("between") || has("versus") {
        QueryType::Comparison
    } else if has("trend") || has("over") || has("growth") {
        QueryType::Trend
    } else if has("summary") || has("overview") {
        QueryType::Summary
    } else if companies.len() == 1 && years.len() == 1 {
        QueryType::Specific
    } else {
        QueryType::General
    };

    QueryIntent {
        companies,
        years,
        metrics,
        query_type,
    }
}
