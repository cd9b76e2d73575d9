//! Prompt templates rendered with minijinja.
//!
//! Both templates are registered once at construction; rendering only
//! fills in the per-question context.

use minijinja::{context, Environment};

const QA_TEMPLATE: &str = r#"You are an expert financial analyst specializing in the automotive industry. You are analyzing annual reports from {{ companies }}.

Context from annual reports (including tables marked with [TABLE] tags):
{{ context }}

CRITICAL INSTRUCTIONS:
1. Look for financial data in TABLES (marked with [TABLE]...[/TABLE]) as well as in regular text
2. Revenue and profit figures are often in tables - examine them carefully
3. When you find relevant financial data, always include:
   - The exact number/amount
   - The currency (e.g., millions, billions, EUR, USD)
   - The company name
   - The year
4. For comparison questions, retrieve data for ALL companies mentioned
5. If you find partial data, provide what you have and specify what's missing
6. Only say "I don't have that information" if you've thoroughly checked all context and found nothing relevant
7. Tables may use abbreviations: m = million, bn = billion, € = EUR, $ = USD

Common financial terms to look for:
- Revenue: "Total revenue", "Revenues", "Net sales", "Total net sales"
- Profit: "Net income", "Net profit", "Profit attributable", "EBIT", "EBITDA", "Earnings"
- Growth: "Change", "Increase", "Decrease", "Growth rate", "% change"

Question: {{ question }}

Provide a clear, specific answer with exact figures when available:"#;

const CONDENSE_TEMPLATE: &str = r#"Given the following conversation and a follow up question, rephrase the follow up question to be a standalone question, in its original language.

Chat History:
{{ chat_history }}
Follow Up Input: {{ question }}
Standalone question:"#;

pub struct PromptTemplates {
    env: Environment<'static>,
}

impl PromptTemplates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("qa", QA_TEMPLATE)?;
        env.add_template("condense", CONDENSE_TEMPLATE)?;
        Ok(Self { env })
    }

    /// The answering prompt: retrieved context plus the question.
    pub fn render_qa(
        &self,
        companies: &[String],
        context_text: &str,
        question: &str,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("qa")?.render(context! {
            companies => join_companies(companies),
            context => context_text,
            question => question,
        })
    }

    /// Rewrites a follow-up into a standalone question using the transcript.
    pub fn render_condense(&self, chat_history: &str, question: &str) -> Result<String, minijinja::Error> {
        self.env.get_template("condense")?.render(context! {
            chat_history => chat_history,
            question => question,
        })
    }
}

/// "BMW", "BMW and Tesla", "BMW, Tesla, and Ford".
pub fn join_companies(companies: &[String]) -> String {
    match companies {
        [] => "several companies".to_string(),
        [one] => one.clone(),
        [a, b] => format!("{a} and {b}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn joins_company_lists() {
        assert_eq!(join_companies(&names(&["BMW"])), "BMW");
        assert_eq!(join_companies(&names(&["BMW", "Ford"])), "BMW and Ford");
        assert_eq!(
            join_companies(&names(&["BMW", "Tesla", "Ford"])),
            "BMW, Tesla, and Ford"
        );
    }

    #[test]
    fn qa_prompt_carries_context_and_question() {
        let prompts = PromptTemplates::new().unwrap();
        let rendered = prompts
            .render_qa(
                &names(&["BMW", "Tesla", "Ford"]),
                "[TABLE]\nRevenue | 155,498\n[/TABLE]",
                "What was BMW's revenue in 2023?",
            )
            .unwrap();
        assert!(rendered.starts_with("You are an expert financial analyst"));
        assert!(rendered.contains("annual reports from BMW, Tesla, and Ford."));
        assert!(rendered.contains("[TABLE]\nRevenue | 155,498\n[/TABLE]"));
        assert!(rendered.contains("Question: What was BMW's revenue in 2023?"));
        assert!(rendered.contains(r#"Only say "I don't have that information""#));
        assert!(rendered.ends_with("with exact figures when available:"));
    }

    #[test]
    fn condense_prompt_includes_transcript() {
        let prompts = PromptTemplates::new().unwrap();
        let rendered = prompts
            .render_condense("Human: BMW revenue 2023?\nAssistant: €155.5bn", "And Tesla?")
            .unwrap();
        assert!(rendered.contains("Chat History:\nHuman: BMW revenue 2023?\nAssistant: €155.5bn\n"));
        assert!(rendered.contains("Follow Up Input: And Tesla?"));
        assert!(rendered.ends_with("Standalone question:"));
    }

    #[test]
    fn values_are_not_html_escaped() {
        let prompts = PromptTemplates::new().unwrap();
        let rendered = prompts
            .render_qa(&names(&["Ford"]), "R&D <costs> \"rose\"", "q")
            .unwrap();
        assert!(rendered.contains("R&D <costs> \"rose\""));
    }
}
