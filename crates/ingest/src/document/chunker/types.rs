//! Chunk configuration.

use reportlens_core::config::ChunkingConfig;
use thiserror::Error;

/// Split points, coarsest first. The empty separator splits into characters.
pub const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " ", ""];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkConfigError {
    #[error("max_chunk_chars must be positive")]
    ZeroMax,
    #[error("overlap_chars ({overlap}) must be smaller than max_chunk_chars ({max})")]
    OverlapTooLarge { overlap: usize, max: usize },
}

// ── Configuration ───────────────────────────────────────────────────────────

/// Configuration for the chunking engine. Lengths are in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Maximum characters per chunk (default: 1500).
    pub max_chunk_chars: usize,
    /// Characters shared with the previous chunk (default: 300).
    pub overlap_chars: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: 1500,
            overlap_chars: 300,
        }
    }
}

impl ChunkConfig {
    pub fn new(max_chunk_chars: usize, overlap_chars: usize) -> Result<Self, ChunkConfigError> {
        let config = Self {
            max_chunk_chars,
            overlap_chars,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ChunkConfigError> {
        if self.max_chunk_chars == 0 {
            return Err(ChunkConfigError::ZeroMax);
        }
        if self.overlap_chars >= self.max_chunk_chars {
            return Err(ChunkConfigError::OverlapTooLarge {
                overlap: self.overlap_chars,
                max: self.max_chunk_chars,
            });
        }
        Ok(())
    }
}

impl TryFrom<&ChunkingConfig> for ChunkConfig {
    type Error = ChunkConfigError;

    fn try_from(value: &ChunkingConfig) -> Result<Self, Self::Error> {
        Self::new(value.chunk_size, value.chunk_overlap)
    }
}
