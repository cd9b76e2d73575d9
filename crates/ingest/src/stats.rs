use indexmap::IndexMap;
use reportlens_core::Chunk;
use serde::Serialize;

/// Chunk counts per company and per year, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChunkStats {
    pub total: usize,
    pub by_company: IndexMap<String, usize>,
    pub by_year: IndexMap<String, usize>,
}

impl ChunkStats {
    pub fn from_chunks(chunks: &[Chunk]) -> Self {
        let mut stats = Self {
            total: chunks.len(),
            ..Self::default()
        };
        for chunk in chunks {
            *stats
                .by_company
                .entry(chunk.metadata.company.clone())
                .or_insert(0) += 1;
            *stats.by_year.entry(chunk.metadata.year.clone()).or_insert(0) += 1;
        }
        stats
    }

    /// Years in ascending order, for display.
    pub fn years_sorted(&self) -> Vec<(&str, usize)> {
        let mut years: Vec<(&str, usize)> =
            self.by_year.iter().map(|(y, n)| (y.as_str(), *n)).collect();
        years.sort_by(|a, b| a.0.cmp(b.0));
        years
    }
}
