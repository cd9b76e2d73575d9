//! Text splitting and merging utilities used by the recursive splitter.

use std::collections::VecDeque;

use super::types::ChunkConfig;

/// Length in characters, the unit every bound is expressed in.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split `text` on `separator`, keeping each separator at the start of the
/// piece that follows it. Empty pieces are dropped. An empty separator
/// splits into single characters.
pub(crate) fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }
    let mut parts = text.split(separator);
    let mut pieces = Vec::new();
    if let Some(first) = parts.next() {
        if !first.is_empty() {
            pieces.push(first.to_string());
        }
    }
    for rest in parts {
        pieces.push(format!("{separator}{rest}"));
    }
    pieces
}

/// Join a window and trim it. `None` when nothing but whitespace is left.
fn join_window(window: &VecDeque<(String, usize)>) -> Option<String> {
    let joined: String = window.iter().map(|(piece, _)| piece.as_str()).collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Greedily merge pieces (each shorter than the max) into windows of at most
/// `max_chunk_chars`. On emitting a window, leading pieces are dropped until
/// the retained tail fits within `overlap_chars` and leaves room for the
/// incoming piece; that tail opens the next window.
pub(crate) fn merge_pieces(pieces: Vec<String>, config: &ChunkConfig) -> Vec<String> {
    let max = config.max_chunk_chars;
    let overlap = config.overlap_chars;

    let mut out = Vec::new();
    let mut window: VecDeque<(String, usize)> = VecDeque::new();
    let mut total = 0usize;

    for piece in pieces {
        let len = char_len(&piece);
        if total + len > max && !window.is_empty() {
            if let Some(chunk) = join_window(&window) {
                out.push(chunk);
            }
            while total > overlap || (total + len > max && total > 0) {
                match window.pop_front() {
                    Some((_, dropped)) => total -= dropped,
                    None => break,
                }
            }
        }
        total += len;
        window.push_back((piece, len));
    }

    if let Some(chunk) = join_window(&window) {
        out.push(chunk);
    }
    out
}
