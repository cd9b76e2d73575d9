use reportlens_index::IndexError;
use reportlens_llm::LlmError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("retrieval failed: {0}")]
    Index(#[from] IndexError),

    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("prompt rendering failed: {0}")]
    Template(#[from] minijinja::Error),
}
