pub mod chunker;
mod loader;
mod pdf;
mod plain;
mod tables;

use std::path::PathBuf;
use std::sync::OnceLock;

use regex_lite::Regex;
use reportlens_core::UNKNOWN_YEAR;
use thiserror::Error;

pub use loader::{count_pdfs, DocumentLoader};
pub use pdf::TableAwarePdfExtractor;
pub use plain::PlainPdfExtractor;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("PDF library panicked: {0}")]
    Panicked(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no documents were loaded from {0}; check the data directory")]
    NoDocuments(PathBuf),
    #[error("data directory {0} does not exist")]
    DataDirMissing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A page of extracted text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPage {
    /// 1-based page number.
    pub page_number: u32,
    /// The extracted text, possibly followed by `[TABLE]` blocks.
    pub text: String,
}

/// One way of turning PDF bytes into pages. The loader tries strategies in order.
pub trait PageExtractor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn extract(&self, bytes: &[u8]) -> Result<Vec<RawPage>, ExtractionError>;
}

fn year_pattern() -> &'static Regex {
    static YEAR: OnceLock<Regex> = OnceLock::new();
    YEAR.get_or_init(|| Regex::new(r"20\d\d").expect("static year pattern"))
}

/// First `20xx` in a file name, or `"Unknown"`.
pub fn extract_year(file_name: &str) -> String {
    year_pattern()
        .find(file_name)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_YEAR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_from_file_name() {
        assert_eq!(extract_year("BMW_Report_2022_final.pdf"), "2022");
        assert_eq!(extract_year("tesla-10k-2023.pdf"), "2023");
        assert_eq!(extract_year("report.pdf"), "Unknown");
    }

    #[test]
    fn first_year_wins() {
        assert_eq!(extract_year("Ford_2021_vs_2022.pdf"), "2021");
    }

    #[test]
    fn nineteen_hundreds_are_not_years() {
        assert_eq!(extract_year("archive_1999.pdf"), "Unknown");
    }
}
