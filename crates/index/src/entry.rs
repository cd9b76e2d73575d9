use reportlens_core::{Chunk, DocumentMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One embedded chunk as persisted in `entries.dat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: Uuid,
    pub content: String,
    pub metadata: DocumentMetadata,
    pub embedding: Vec<f32>,
}

impl IndexEntry {
    pub fn new(chunk: Chunk, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: chunk.content,
            metadata: chunk.metadata,
            embedding,
        }
    }

    pub fn to_chunk(&self) -> Chunk {
        Chunk {
            content: self.content.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// A search hit with its cosine similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}
