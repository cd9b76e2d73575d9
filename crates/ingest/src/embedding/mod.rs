pub mod batcher;
pub mod cache;
pub mod ollama;
pub mod openai;
pub mod traits;

use std::sync::Arc;

use reportlens_core::{Config, ConfigError};

pub use batcher::EmbeddingBatcher;
pub use cache::QueryEmbeddingCache;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use traits::{Embedder, EmbeddingError};

/// Build the embedding backend selected by `EMBEDDING_PROVIDER`.
pub fn create_embedder(config: &Config) -> Result<Arc<dyn Embedder>, ConfigError> {
    match config.embedding.provider.as_str() {
        "openai" => {
            let api_key = config
                .llm
                .openai_api_key
                .clone()
                .ok_or_else(|| ConfigError::MissingCredential("OPENAI_API_KEY".into()))?;
            Ok(Arc::new(OpenAiEmbedder::new(
                api_key,
                config.embedding.model.clone(),
                Some(config.llm.openai_base_url.clone()),
                config.embedding.dimensions,
            )))
        }
        "ollama" => Ok(Arc::new(OllamaEmbedder::new(
            config.ollama.url.clone(),
            config.ollama.embedding_model.clone(),
            config.embedding.dimensions,
        ))),
        other => Err(ConfigError::UnknownProvider(other.to_string())),
    }
}
