use std::sync::Arc;

use reportlens_core::{Chunk, MetadataFilter};
use reportlens_index::Retriever;
use reportlens_llm::{LlmProvider, Message};
use tracing::{debug, info, warn};

use crate::error::QueryError;
use crate::expansion::{expand_query, is_no_information};
use crate::history::{ConversationHistory, ConversationTurn};
use crate::intent::{analyze_query_intent, QueryIntent};
use crate::prompts::PromptTemplates;
use crate::sources::format_sources;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Chunks retrieved per question.
    pub top_k: usize,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Companies named in the prompt and recognized by intent analysis.
    pub companies: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_k: 15,
            temperature: 0.0,
            max_tokens: 2048,
            companies: vec!["BMW".into(), "Tesla".into(), "Ford".into()],
        }
    }
}

/// Outcome of one question. Failures are reported here, never raised.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub answer: String,
    pub source_documents: Vec<Chunk>,
    pub success: bool,
}

impl QueryResult {
    fn failure(err: &QueryError) -> Self {
        Self {
            answer: format!("Error processing query: {err}"),
            source_documents: Vec::new(),
            success: false,
        }
    }

    /// Whether the answer carries retrieved data rather than a refusal.
    pub fn has_data(&self) -> bool {
        self.success && !is_no_information(&self.answer)
    }
}

/// Conversational retrieval chain: condense, retrieve, answer.
pub struct QueryEngine {
    retriever: Arc<dyn Retriever>,
    llm: Box<dyn LlmProvider>,
    prompts: PromptTemplates,
    config: EngineConfig,
    history: ConversationHistory,
}

impl QueryEngine {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        llm: Box<dyn LlmProvider>,
        config: EngineConfig,
    ) -> Result<Self, QueryError> {
        Ok(Self {
            retriever,
            llm,
            prompts: PromptTemplates::new()?,
            config,
            history: ConversationHistory::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn model(&self) -> &str {
        self.llm.model()
    }

    /// Answer a question, retrying once with financial synonyms when the
    /// first attempt found no sources and the model reported no information.
    pub async fn query(&mut self, question: &str) -> QueryResult {
        match self.answer_with_expansion(question).await {
            Ok(result) => {
                self.history.record(question, &result.answer);
                result
            }
            Err(e) => {
                warn!(error = %e, "Query failed");
                QueryResult::failure(&e)
            }
        }
    }

    /// Answer a question with retrieval restricted to a company and/or year.
    /// The restriction applies to this call only.
    pub async fn query_with_filter(
        &mut self,
        question: &str,
        company: Option<&str>,
        year: Option<&str>,
    ) -> QueryResult {
        let filter = MetadataFilter::new(company, year);
        let filter = (!filter.is_empty()).then_some(filter);
        match self.answer(question, filter.as_ref()).await {
            Ok(result) => {
                self.history.record(question, &result.answer);
                result
            }
            Err(e) => {
                warn!(error = %e, "Filtered query failed");
                QueryResult::failure(&e)
            }
        }
    }

    async fn answer_with_expansion(&self, question: &str) -> Result<QueryResult, QueryError> {
        let first = self.answer(question, None).await?;
        if !(is_no_information(&first.answer) && first.source_documents.is_empty()) {
            return Ok(first);
        }
        match expand_query(question) {
            Some(expanded) => {
                info!(expanded = %expanded, "No information found; retrying with expanded query");
                self.answer(&expanded, None).await
            }
            None => Ok(first),
        }
    }

    /// One pass of the chain. Does not touch the history.
    pub async fn answer(
        &self,
        question: &str,
        filter: Option<&MetadataFilter>,
    ) -> Result<QueryResult, QueryError> {
        let standalone = self.standalone_question(question).await?;

        let sources = self
            .retriever
            .retrieve(&standalone, self.config.top_k, filter)
            .await?;
        debug!(question = %standalone, sources = sources.len(), "Retrieved context");

        let context_text = sources
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = self
            .prompts
            .render_qa(&self.config.companies, &context_text, &standalone)?;

        let answer = self
            .llm
            .complete(
                vec![Message::system(prompt)],
                self.config.temperature,
                self.config.max_tokens,
            )
            .await?;

        Ok(QueryResult {
            answer: answer.trim().to_string(),
            source_documents: sources,
            success: true,
        })
    }

    /// Fold the history into the question, or pass it through on a fresh conversation.
    async fn standalone_question(&self, question: &str) -> Result<String, QueryError> {
        if self.history.is_empty() {
            return Ok(question.to_string());
        }
        let prompt = self
            .prompts
            .render_condense(&self.history.transcript(), question)?;
        let condensed = self
            .llm
            .complete(
                vec![Message::user(prompt)],
                self.config.temperature,
                self.config.max_tokens,
            )
            .await?;
        let condensed = condensed.trim();
        if condensed.is_empty() {
            return Ok(question.to_string());
        }
        debug!(original = question, standalone = condensed, "Condensed follow-up question");
        Ok(condensed.to_string())
    }

    pub fn history(&self) -> &[ConversationTurn] {
        self.history.turns()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn analyze_query_intent(&self, question: &str) -> QueryIntent {
        analyze_query_intent(question, &self.config.companies)
    }

    pub fn format_sources(&self, chunks: &[Chunk]) -> String {
        format_sources(chunks)
    }
}
