use async_trait::async_trait;
use reportlens_core::{Chunk, MetadataFilter};

use crate::error::IndexError;

/// Source of context chunks for a question.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Top `k` chunks for `query`, most similar first, restricted by `filter`.
    async fn retrieve(
        &self,
        query: &str,
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<Chunk>, IndexError>;
}
