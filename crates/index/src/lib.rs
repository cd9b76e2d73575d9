//! Persisted vector index over report chunks.

pub mod entry;
pub mod error;
pub mod retriever;
pub mod similarity;
pub mod storage;
pub mod store;

pub use entry::{IndexEntry, ScoredChunk};
pub use error::IndexError;
pub use retriever::Retriever;
pub use storage::{IndexMeta, ENTRIES_FILE, META_FILE};
pub use store::{IndexConfig, VectorIndex};
