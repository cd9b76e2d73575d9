//! Report ingestion: PDF loading, chunking and embedding backends.

pub mod document;
pub mod embedding;
pub mod stats;

pub use document::chunker::{chunk_documents, ChunkConfig, ChunkConfigError};
pub use document::{count_pdfs, extract_year, DocumentLoader, ExtractionError, LoadError, RawPage};
pub use stats::ChunkStats;
