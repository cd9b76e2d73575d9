use anyhow::Result;
use reportlens_core::Config;
use reportlens_rag::{QueryEngine, QueryResult};

use super::open_engine;
use crate::cli::QueryMode;
use crate::terminal::Terminal;

pub const TEST_QUESTIONS: &[&str] = &[
    "What was BMW's total revenue in 2023?",
    "How much revenue did Tesla generate in 2023?",
    "What was Ford's revenue for the year 2020?",
    "Can you provide the revenue figures for BMW in 2017?",
    "What key economic factors influenced Ford's performance in 2021?",
    "Which Tesla product is currently in the development stage?",
    "What were BMW's profit figures for 2020 and 2023?",
    "Between Tesla and Ford, which company achieved higher profits in 2022?",
    "What were Tesla's profit numbers for 2022 and 2023?",
    "Which company recorded better profitability in 2022 overall?",
    "Provide a summary of revenue figures for Tesla, BMW, and Ford over the past three years.",
    "What were the growth trends for BMW's financial performance from 2020 to 2023?",
];

/// The second question only makes sense with the first one's context.
pub const DEMO_QUESTIONS: &[&str] = &[
    "What was BMW's revenue in 2023?",
    "How does that compare to Tesla?",
    "What were the main factors affecting automotive industry in 2023?",
];

/// Aggregate outcome of a batch of questions.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySummary {
    pub total: usize,
    pub successful: usize,
    pub with_data: usize,
    /// Mean answer length in characters over successful queries.
    pub average_answer_chars: f64,
}

impl QuerySummary {
    pub fn from_results(results: &[QueryResult]) -> Self {
        let successful: Vec<&QueryResult> = results.iter().filter(|r| r.success).collect();
        let total_chars: usize = successful.iter().map(|r| r.answer.chars().count()).sum();
        let average_answer_chars = if successful.is_empty() {
            0.0
        } else {
            total_chars as f64 / successful.len() as f64
        };
        Self {
            total: results.len(),
            successful: successful.len(),
            with_data: results.iter().filter(|r| r.has_data()).count(),
            average_answer_chars,
        }
    }

    pub fn failed(&self) -> usize {
        self.total - self.successful
    }
}

pub async fn run(config: &Config, terminal: &Terminal, mode: QueryMode) -> Result<()> {
    match mode {
        QueryMode::Test => run_test_queries(config, terminal).await,
        QueryMode::Demo => run_demo(config, terminal).await,
    }
}

async fn run_test_queries(config: &Config, terminal: &Terminal) -> Result<()> {
    terminal.print_heading("REPORTLENS - TEST QUERIES")?;
    let mut engine = open_engine(config, terminal)?;
    terminal.print_success(" System initialized successfully")?;
    terminal.print_heading(&format!("Running {} test queries...", TEST_QUESTIONS.len()))?;

    let mut results = Vec::with_capacity(TEST_QUESTIONS.len());
    for (i, question) in TEST_QUESTIONS.iter().enumerate() {
        terminal.print_heading(&format!("Query {}/{}", i + 1, TEST_QUESTIONS.len()))?;
        terminal.print_question("Question", question)?;
        let result = ask(&mut engine, terminal, question).await?;
        results.push(result);
    }

    let summary = QuerySummary::from_results(&results);
    terminal.print_heading("TEST SUMMARY")?;
    terminal.print_success(&format!(
        "Successful queries: {}/{}",
        summary.successful, summary.total
    ))?;
    terminal.print_success(&format!(
        "Queries with actual data: {}/{}",
        summary.with_data, summary.total
    ))?;
    if summary.failed() > 0 {
        terminal.print_error(&format!("Failed queries: {}/{}", summary.failed(), summary.total))?;
    }
    terminal.print_warn(&format!(
        "\nAverage answer length: {:.0} characters",
        summary.average_answer_chars
    ))?;
    terminal.print_rule()
}

async fn run_demo(config: &Config, terminal: &Terminal) -> Result<()> {
    terminal.print_heading("REPORTLENS - INTERACTIVE DEMO")?;
    let mut engine = open_engine(config, terminal)?;
    terminal.print_success(" System initialized successfully")?;
    terminal.print_heading("Running interactive demo...")?;

    for (i, question) in DEMO_QUESTIONS.iter().enumerate() {
        terminal.print_line("")?;
        terminal.print_question(&format!("Question {}", i + 1), question)?;
        ask(&mut engine, terminal, question).await?;
    }

    terminal.print_heading("Demo completed!")?;
    terminal.print_warn("Notice how the second question used context from the first.")?;
    terminal.print_rule()
}

async fn ask(engine: &mut QueryEngine, terminal: &Terminal, question: &str) -> Result<QueryResult> {
    let spinner = terminal.start_spinner("Searching and analyzing...")?;
    let result = engine.query(question).await;
    spinner.stop();

    if result.success {
        let sources = engine.format_sources(&result.source_documents);
        terminal.print_answer(&result.answer, &sources)?;
    } else {
        terminal.print_error(&result.answer)?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(answer: &str, success: bool) -> QueryResult {
        QueryResult {
            answer: answer.to_string(),
            source_documents: Vec::new(),
            success,
        }
    }

    #[test]
    fn test_question_sets() {
        assert_eq!(TEST_QUESTIONS.len(), 12);
        assert_eq!(DEMO_QUESTIONS.len(), 3);
    }

    #[test]
    fn test_summary_counts() {
        let results = vec![
            result("BMW Group revenues were €155.5bn in 2023.", true),
            result("I don't have that information in the provided documents.", true),
            result("Error processing query: connection refused", false),
        ];
        let summary = QuerySummary::from_results(&results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed(), 1);
        // Failed queries never count as carrying data.
        assert_eq!(summary.with_data, 1);

        let expected = (results[0].answer.chars().count() + results[1].answer.chars().count()) as f64 / 2.0;
        assert!((summary.average_answer_chars - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_of_nothing() {
        let summary = QuerySummary::from_results(&[]);
        assert_eq!(summary.successful, 0);
        assert_eq!(summary.failed(), 0);
        assert_eq!(summary.average_answer_chars, 0.0);
    }
}
