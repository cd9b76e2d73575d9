use std::sync::Arc;

use reportlens_core::Chunk;

use super::traits::{Embedder, EmbeddingError};

/// Collects chunks and embeds them one fixed-size batch at a time.
pub struct EmbeddingBatcher {
    buffer: Vec<Chunk>,
    batch_size: usize,
    flushed: usize,
    embedder: Arc<dyn Embedder>,
}

impl EmbeddingBatcher {
    pub fn new(embedder: Arc<dyn Embedder>, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            buffer: Vec::with_capacity(batch_size),
            batch_size,
            flushed: 0,
            embedder,
        }
    }

    /// Number of batches needed for `items` chunks.
    pub fn batch_count(&self, items: usize) -> usize {
        items.div_ceil(self.batch_size)
    }

    /// Add a chunk. Returns the embedded batch once it is full (auto-flush).
    pub async fn add(
        &mut self,
        chunk: Chunk,
    ) -> Result<Option<Vec<(Chunk, Vec<f32>)>>, EmbeddingError> {
        self.buffer.push(chunk);
        if self.buffer.len() >= self.batch_size {
            Ok(Some(self.flush().await?))
        } else {
            Ok(None)
        }
    }

    /// Force-flush remaining chunks.
    pub async fn flush(&mut self) -> Result<Vec<(Chunk, Vec<f32>)>, EmbeddingError> {
        if self.buffer.is_empty() {
            return Ok(Vec::new());
        }
        let batch: Vec<Chunk> = self.buffer.drain(..).collect();
        let texts: Vec<&str> = batch.iter().map(|c| c.content.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != batch.len() {
            return Err(EmbeddingError::CountMismatch {
                sent: batch.len(),
                received: embeddings.len(),
            });
        }
        self.flushed += 1;
        Ok(batch.into_iter().zip(embeddings).collect())
    }

    /// Number of chunks currently buffered.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Number of batches embedded so far.
    pub fn flushed(&self) -> usize {
        self.flushed
    }
}
