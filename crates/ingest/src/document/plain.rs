use tracing::{debug, warn};

use super::{ExtractionError, PageExtractor, RawPage};

/// Fallback extractor: page text only, read with lopdf.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainPdfExtractor;

impl PageExtractor for PlainPdfExtractor {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn extract(&self, bytes: &[u8]) -> Result<Vec<RawPage>, ExtractionError> {
        let doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| ExtractionError::PdfError(format!("Failed to load PDF: {e}")))?;

        let pages = doc.get_pages();
        debug!(page_count = pages.len(), "Extracting text with lopdf");

        let mut out = Vec::with_capacity(pages.len());
        for page_number in pages.keys().copied() {
            match doc.extract_text(&[page_number]) {
                Ok(text) if !text.trim().is_empty() => out.push(RawPage {
                    page_number,
                    text: text.trim().to_string(),
                }),
                Ok(_) => {}
                Err(e) => {
                    warn!(page = page_number, error = %e, "Failed to extract text from page, skipping");
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_an_error() {
        assert!(PlainPdfExtractor.extract(b"%PDF-nope").is_err());
    }
}
