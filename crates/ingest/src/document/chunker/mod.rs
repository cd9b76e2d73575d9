//! Recursive character chunking.
//!
//! Splits page documents into overlapping, size-bounded chunks for embedding.
//! Text is split on the coarsest separator present (paragraph, line, sentence,
//! word, character), oversized pieces are split again with the finer
//! separators, and the pieces are merged greedily into windows that share a
//! tail of up to `overlap_chars` characters with the previous window.

mod helpers;
mod strategies;
mod types;

pub use strategies::{chunk_documents, split_text};
pub use types::{ChunkConfig, ChunkConfigError, SEPARATORS};
