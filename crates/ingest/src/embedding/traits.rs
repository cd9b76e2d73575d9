use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding count mismatch: sent {sent} texts, got {received} vectors")]
    CountMismatch { sent: usize, received: usize },
}

/// Trait for embedding backends (OpenAI, Ollama).
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, returning one vector per input text (in order).
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// The dimensionality of the output vectors.
    fn dimensions(&self) -> usize;

    /// Short backend label for logs.
    fn name(&self) -> &str;
}

/// Check a backend response against the request before trusting it.
pub(crate) fn validate_response(
    sent: usize,
    expected_dims: usize,
    embeddings: &[Vec<f32>],
) -> Result<(), EmbeddingError> {
    if embeddings.len() != sent {
        return Err(EmbeddingError::CountMismatch {
            sent,
            received: embeddings.len(),
        });
    }
    if let Some(bad) = embeddings.iter().find(|e| e.len() != expected_dims) {
        return Err(EmbeddingError::DimensionMismatch {
            expected: expected_dims,
            actual: bad.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_response() {
        assert!(validate_response(2, 3, &[vec![0.0; 3], vec![1.0; 3]]).is_ok());
    }

    #[test]
    fn rejects_missing_vectors() {
        let err = validate_response(3, 3, &[vec![0.0; 3]]).unwrap_err();
        assert!(matches!(err, EmbeddingError::CountMismatch { sent: 3, received: 1 }));
    }

    #[test]
    fn rejects_wrong_dimensions() {
        let err = validate_response(2, 4, &[vec![0.0; 4], vec![0.0; 2]]).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch { expected: 4, actual: 2 }
        ));
    }
}
