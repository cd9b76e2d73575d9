pub mod chat;
pub mod setup;
pub mod test_queries;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use reportlens_core::Config;
use reportlens_index::{IndexConfig, IndexError, Retriever, VectorIndex};
use reportlens_ingest::embedding::create_embedder;
use reportlens_llm::create_provider;
use reportlens_rag::{EngineConfig, QueryEngine};
use tracing::info;

use crate::terminal::Terminal;

pub fn index_config(config: &Config) -> IndexConfig {
    IndexConfig {
        persist_dir: config.data.index_dir.clone(),
        batch_size: config.embedding.batch_size,
    }
}

/// What to tell the user when the index on disk cannot serve queries.
fn load_remediation(err: &IndexError) -> Option<&'static str> {
    match err {
        IndexError::NotFound(_) | IndexError::Empty(_) => {
            Some("Please run `reportlens setup` first to build the index.")
        }
        IndexError::DimensionMismatch { .. } => Some(
            "The embedding settings changed since the index was built. \
             Rerun `reportlens setup` to rebuild it.",
        ),
        _ => None,
    }
}

/// Load the persisted index and wire it to the configured chat model.
///
/// A missing, empty or mismatched index prints how to rebuild it and fails.
pub fn open_engine(config: &Config, terminal: &Terminal) -> Result<QueryEngine> {
    config
        .validate_credentials()
        .context("Set OPENAI_API_KEY in .env or use ollama for LLM_PROVIDER and EMBEDDING_PROVIDER")?;

    terminal.print_info("Loading vector index...")?;
    let embedder = create_embedder(config).context("Failed to create embedder")?;
    let mut index = VectorIndex::new(index_config(config), embedder);

    if let Err(e) = index.load() {
        let Some(hint) = load_remediation(&e) else {
            return Err(e).context("Failed to load vector index");
        };
        terminal.print_error(&e.to_string())?;
        terminal.print_warn(hint)?;
        bail!("vector index unavailable");
    }
    info!(entries = index.len(), dir = %index.persist_dir().display(), "Index ready");

    terminal.print_info("Initializing query engine...")?;
    let llm = create_provider(&config.llm, &config.ollama).context("Failed to create LLM provider")?;
    let retriever: Arc<dyn Retriever> = Arc::new(index);
    let engine = QueryEngine::new(
        retriever,
        llm,
        EngineConfig {
            top_k: config.retrieval.top_k,
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            companies: config.data.companies.clone(),
        },
    )?;
    Ok(engine)
}
