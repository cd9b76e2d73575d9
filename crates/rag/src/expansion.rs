/// Financial synonyms appended to a question whose first attempt found nothing.
/// Checked in order; the first term contained in the question wins.
const EXPANSIONS: [(&str, &str); 3] = [
    ("revenue", "revenue total sales net sales turnover"),
    ("profit", "profit net income earnings EBIT EBITDA net profit"),
    ("growth", "growth increase change trend performance"),
];

const NO_INFORMATION: &str = "don't have that information";

/// Rewrite `question` with synonyms for its first financial term, if any.
pub fn expand_query(question: &str) -> Option<String> {
    let lower = question.to_lowercase();
    EXPANSIONS
        .iter()
        .find(|(term, _)| lower.contains(term))
        .map(|(_, alternatives)| format!("{question} (including {alternatives})"))
}

/// Whether an answer is the model's "nothing found" reply.
///
/// Heuristic: matches the phrase the QA prompt tells the model to use. An
/// answer that merely quotes the phrase also matches.
pub fn is_no_information(answer: &str) -> bool {
    answer.to_lowercase().contains(NO_INFORMATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_first_matching_term() {
        assert_eq!(
            expand_query("What was Ford's Profit in 2022?").as_deref(),
            Some("What was Ford's Profit in 2022? (including profit net income earnings EBIT EBITDA net profit)")
        );
    }

    #[test]
    fn revenue_takes_precedence_over_growth() {
        let expanded = expand_query("Revenue growth at BMW").unwrap();
        assert!(expanded.ends_with("(including revenue total sales net sales turnover)"));
    }

    #[test]
    fn no_term_no_expansion() {
        assert_eq!(expand_query("Who is the CEO of Tesla?"), None);
    }

    #[test]
    fn detects_no_information_case_insensitively() {
        assert!(is_no_information("I DON'T HAVE THAT INFORMATION in the reports."));
        assert!(is_no_information("Sorry, I don't have that information."));
        assert!(!is_no_information("BMW revenue was €155.5bn in 2023."));
    }
}
