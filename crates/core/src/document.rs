use serde::{Deserialize, Serialize};

/// Year recorded when a file name carries no `20xx` year.
pub const UNKNOWN_YEAR: &str = "Unknown";

/// Attribution carried by every page and every chunk cut from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Company directory the PDF was loaded from (e.g. "BMW").
    pub company: String,
    /// File name of the source PDF, without directory.
    pub source_file: String,
    /// Four-digit report year, or [`UNKNOWN_YEAR`].
    pub year: String,
    /// 1-based page number, when the extractor knows it.
    #[serde(default)]
    pub page: Option<u32>,
}

/// One page of source material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

/// A size-bounded slice of a [`Document`], the unit of embedding and retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl Chunk {
    /// Number of characters (not bytes) in the chunk.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Equality constraint on chunk metadata. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFilter {
    pub company: Option<String>,
    pub year: Option<String>,
}

impl MetadataFilter {
    pub fn new(company: Option<&str>, year: Option<&str>) -> Self {
        Self {
            company: company.map(str::to_string),
            year: year.map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.company.is_none() && self.year.is_none()
    }

    pub fn matches(&self, metadata: &DocumentMetadata) -> bool {
        let company_ok = self
            .company
            .as_deref()
            .map_or(true, |c| c == metadata.company);
        let year_ok = self.year.as_deref().map_or(true, |y| y == metadata.year);
        company_ok && year_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(company: &str, year: &str) -> DocumentMetadata {
        DocumentMetadata {
            company: company.to_string(),
            source_file: format!("{company}_{year}.pdf"),
            year: year.to_string(),
            page: Some(1),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = MetadataFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&meta("BMW", "2023")));
        assert!(filter.matches(&meta("Ford", UNKNOWN_YEAR)));
    }

    #[test]
    fn filter_is_exact_equality() {
        let filter = MetadataFilter::new(Some("BMW"), Some("2023"));
        assert!(filter.matches(&meta("BMW", "2023")));
        assert!(!filter.matches(&meta("BMW", "2022")));
        assert!(!filter.matches(&meta("bmw", "2023")));
        assert!(!filter.matches(&meta("Tesla", "2023")));
    }

    #[test]
    fn company_only_filter() {
        let filter = MetadataFilter::new(Some("Tesla"), None);
        assert!(filter.matches(&meta("Tesla", "2022")));
        assert!(filter.matches(&meta("Tesla", "2023")));
        assert!(!filter.matches(&meta("Ford", "2022")));
    }

    #[test]
    fn char_len_counts_characters() {
        let chunk = Chunk {
            content: "€12bn".to_string(),
            metadata: meta("BMW", "2023"),
        };
        assert_eq!(chunk.char_len(), 5);
    }

    #[test]
    fn metadata_serializes_page_as_null_when_missing() {
        let mut m = meta("Ford", "2021");
        m.page = None;
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"page\":null"));
        assert!(json.contains("\"company\":\"Ford\""));
    }
}
