use std::path::PathBuf;

use reportlens_ingest::embedding::EmbeddingError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("no index found at {0}")]
    NotFound(PathBuf),

    #[error("index at {0} contains no entries")]
    Empty(PathBuf),

    #[error("index is not initialized; create or load it first")]
    NotInitialized,

    #[error("index holds {index}-dimensional vectors but the embedder produces {embedder}")]
    DimensionMismatch { index: usize, embedder: usize },

    #[error("no chunks to index and no existing index to load")]
    NothingToIndex,

    #[error("embedding batch {batch}/{total} failed: {source}")]
    Batch {
        batch: usize,
        total: usize,
        #[source]
        source: Box<IndexError>,
    },

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(String),
}
