use std::panic::{self, AssertUnwindSafe};

use super::tables::{detect_tables, render_tables};
use super::{ExtractionError, PageExtractor, RawPage};

/// Primary extractor: pdf-extract text with column-aligned tables appended
/// as `[TABLE]` blocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct TableAwarePdfExtractor;

impl PageExtractor for TableAwarePdfExtractor {
    fn name(&self) -> &'static str {
        "table-aware"
    }

    fn extract(&self, bytes: &[u8]) -> Result<Vec<RawPage>, ExtractionError> {
        let text = extract_guarded(bytes)?;
        Ok(split_pages(&text)
            .into_iter()
            .map(|(page_number, page_text)| {
                let tables = detect_tables(&page_text);
                let mut text = page_text;
                if !tables.is_empty() {
                    tracing::debug!(page = page_number, tables = tables.len(), "Detected tables");
                    text.push_str(&render_tables(&tables));
                }
                RawPage { page_number, text }
            })
            .collect())
    }
}

/// pdf-extract panics on some malformed fonts; treat that as a failed extraction.
fn extract_guarded(bytes: &[u8]) -> Result<String, ExtractionError> {
    match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(result) => result.map_err(|e| ExtractionError::PdfError(e.to_string())),
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(ExtractionError::Panicked(msg))
        }
    }
}

/// Split pdf-extract output on form feeds. Blank pages are dropped but keep
/// their slot in the numbering.
pub(crate) fn split_pages(text: &str) -> Vec<(u32, String)> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    if !text.contains('\x0C') {
        return vec![(1, text.trim().to_string())];
    }
    text.split('\x0C')
        .enumerate()
        .filter(|(_, page_text)| !page_text.trim().is_empty())
        .map(|(i, page_text)| (i as u32 + 1, page_text.trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_feeds_separate_pages() {
        let pages = split_pages("first page\x0C\x0Cthird page\x0C");
        assert_eq!(
            pages,
            vec![(1, "first page".to_string()), (3, "third page".to_string())]
        );
    }

    #[test]
    fn no_form_feed_is_one_page() {
        assert_eq!(split_pages("  only text \n"), vec![(1, "only text".to_string())]);
    }

    #[test]
    fn blank_output_has_no_pages() {
        assert!(split_pages(" \n\x0C ").is_empty());
    }

    #[test]
    fn garbage_bytes_are_an_error_not_a_panic() {
        let result = TableAwarePdfExtractor.extract(b"definitely not a pdf");
        assert!(result.is_err());
    }
}
