//! Recursive splitting over the separator hierarchy.

use reportlens_core::{Chunk, Document};
use tracing::debug;

use super::helpers::{char_len, merge_pieces, split_keeping_separator};
use super::types::{ChunkConfig, SEPARATORS};

/// Chunk every document; each chunk carries a copy of its page's metadata.
pub fn chunk_documents(documents: &[Document], config: &ChunkConfig) -> Vec<Chunk> {
    let chunks: Vec<Chunk> = documents
        .iter()
        .flat_map(|doc| {
            split_text(&doc.content, config)
                .into_iter()
                .map(|content| Chunk {
                    content,
                    metadata: doc.metadata.clone(),
                })
        })
        .collect();
    debug!(documents = documents.len(), chunks = chunks.len(), "Chunked documents");
    chunks
}

/// Split one text into trimmed, non-empty chunks of at most `max_chunk_chars`.
pub fn split_text(text: &str, config: &ChunkConfig) -> Vec<String> {
    split_recursive(text, SEPARATORS, config)
}

fn split_recursive(text: &str, separators: &[&str], config: &ChunkConfig) -> Vec<String> {
    // Coarsest separator present in the text; the empty one always applies.
    let mut separator = "";
    let mut finer: &[&str] = &[];
    for (i, &sep) in separators.iter().enumerate() {
        if sep.is_empty() {
            separator = sep;
            finer = &[];
            break;
        }
        if text.contains(sep) {
            separator = sep;
            finer = &separators[i + 1..];
            break;
        }
    }

    let mut chunks = Vec::new();
    let mut fitting = Vec::new();

    for piece in split_keeping_separator(text, separator) {
        if char_len(&piece) < config.max_chunk_chars {
            fitting.push(piece);
            continue;
        }
        if !fitting.is_empty() {
            chunks.extend(merge_pieces(std::mem::take(&mut fitting), config));
        }
        if finer.is_empty() {
            let trimmed = piece.trim();
            if !trimmed.is_empty() {
                chunks.push(trimmed.to_string());
            }
        } else {
            chunks.extend(split_recursive(&piece, finer, config));
        }
    }

    if !fitting.is_empty() {
        chunks.extend(merge_pieces(fitting, config));
    }
    chunks
}
