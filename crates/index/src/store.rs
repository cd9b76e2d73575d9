use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use reportlens_core::{Chunk, MetadataFilter};
use reportlens_ingest::embedding::{Embedder, EmbeddingBatcher, QueryEmbeddingCache};
use tracing::{debug, info, warn};

use crate::entry::{IndexEntry, ScoredChunk};
use crate::error::IndexError;
use crate::retriever::Retriever;
use crate::similarity::cosine_similarity;
use crate::storage::{self, IndexMeta, ENTRIES_FILE};

#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Directory holding `entries.dat` and `meta.json`.
    pub persist_dir: PathBuf,
    /// Chunks per embedding request while building.
    pub batch_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            persist_dir: PathBuf::from("data/processed/index"),
            batch_size: 100,
        }
    }
}

/// Embedded chunks persisted on disk and searched in memory by cosine similarity.
///
/// Searches fail with [`IndexError::NotInitialized`] until `create` or `load`
/// has succeeded.
pub struct VectorIndex {
    config: IndexConfig,
    embedder: Arc<dyn Embedder>,
    queries: QueryEmbeddingCache,
    entries: Option<Vec<IndexEntry>>,
}

impl VectorIndex {
    pub fn new(config: IndexConfig, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            queries: QueryEmbeddingCache::with_default_capacity(embedder.clone()),
            config,
            embedder,
            entries: None,
        }
    }

    pub fn persist_dir(&self) -> &Path {
        &self.config.persist_dir
    }

    fn entries_path(&self) -> PathBuf {
        self.config.persist_dir.join(ENTRIES_FILE)
    }

    /// Whether a persisted index is present. Does not decode it.
    pub fn exists(&self) -> bool {
        self.entries_path().is_file()
    }

    pub fn is_loaded(&self) -> bool {
        self.entries.is_some()
    }

    /// Number of loaded entries (0 when nothing is loaded).
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Metadata of the persisted index, if `meta.json` is readable.
    pub fn meta(&self) -> Option<IndexMeta> {
        storage::read_meta(&self.config.persist_dir)
    }

    /// Replace any persisted index with embeddings of `chunks`.
    ///
    /// Batches are embedded and appended one at a time. A failing batch
    /// leaves the earlier frames on disk and the index unloaded.
    pub async fn create(&mut self, chunks: Vec<Chunk>) -> Result<(), IndexError> {
        if chunks.is_empty() {
            return Err(IndexError::NothingToIndex);
        }

        self.entries = None;
        let dir = self.config.persist_dir.clone();
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        fs::create_dir_all(&dir)?;
        let path = self.entries_path();

        let mut batcher = EmbeddingBatcher::new(self.embedder.clone(), self.config.batch_size);
        let total = batcher.batch_count(chunks.len());
        info!(
            chunks = chunks.len(),
            batches = total,
            embedder = self.embedder.name(),
            dir = %dir.display(),
            "Creating vector index"
        );

        let mut loaded: Vec<IndexEntry> = Vec::with_capacity(chunks.len());
        let mut raw_bytes = 0u64;
        for chunk in chunks {
            let batch_no = batcher.flushed() + 1;
            let embedded = batcher
                .add(chunk)
                .await
                .map_err(|e| batch_error(batch_no, total, e.into()))?;
            if let Some(embedded) = embedded {
                raw_bytes += persist_batch(&path, embedded, batch_no, total, &mut loaded)?;
            }
        }
        if batcher.pending() > 0 {
            let batch_no = batcher.flushed() + 1;
            let embedded = batcher
                .flush()
                .await
                .map_err(|e| batch_error(batch_no, total, e.into()))?;
            raw_bytes += persist_batch(&path, embedded, batch_no, total, &mut loaded)?;
        }

        let meta = IndexMeta {
            entry_count: loaded.len(),
            dimensions: loaded.first().map_or(0, |e| e.embedding.len()),
            batches: total,
            created_at: Utc::now(),
        };
        storage::write_meta(&dir, &meta)?;
        info!(
            entries = meta.entry_count,
            dimensions = meta.dimensions,
            raw_bytes,
            "Vector index created"
        );

        self.entries = Some(loaded);
        Ok(())
    }

    /// Load the persisted index into memory.
    ///
    /// Fails with [`IndexError::DimensionMismatch`] when the stored vectors
    /// were built by an embedder of a different size.
    pub fn load(&mut self) -> Result<(), IndexError> {
        let dir = &self.config.persist_dir;
        if !self.exists() {
            return Err(IndexError::NotFound(dir.clone()));
        }
        let entries = storage::read_entries(&self.entries_path())?;
        if entries.is_empty() {
            return Err(IndexError::Empty(dir.clone()));
        }
        let stored = entries[0].embedding.len();
        let expected = self.embedder.dimensions();
        if stored != expected {
            return Err(IndexError::DimensionMismatch {
                index: stored,
                embedder: expected,
            });
        }
        match storage::read_meta(dir) {
            Some(meta) if meta.entry_count != entries.len() => warn!(
                expected = meta.entry_count,
                found = entries.len(),
                "meta.json disagrees with entries.dat; index may be from an interrupted build"
            ),
            Some(_) => {}
            None => warn!(dir = %dir.display(), "meta.json missing; index may be from an interrupted build"),
        }
        info!(entries = entries.len(), dir = %dir.display(), "Loaded vector index");
        self.entries = Some(entries);
        Ok(())
    }

    /// Load when a persisted index exists, otherwise build one from `chunks`.
    pub async fn get_or_create(&mut self, chunks: Option<Vec<Chunk>>) -> Result<(), IndexError> {
        if self.exists() {
            return self.load();
        }
        match chunks {
            Some(chunks) => self.create(chunks).await,
            None => Err(IndexError::NothingToIndex),
        }
    }

    /// Remove the persisted index and unload it.
    pub fn delete(&mut self) -> Result<(), IndexError> {
        self.entries = None;
        let dir = &self.config.persist_dir;
        if dir.exists() {
            fs::remove_dir_all(dir)?;
            info!(dir = %dir.display(), "Deleted vector index");
        }
        self.queries.clear();
        Ok(())
    }

    /// Top `k` chunks for `query`, optionally restricted by metadata.
    pub async fn search(
        &self,
        query: &str,
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<Chunk>, IndexError> {
        Ok(self
            .scored(query, k, filter)
            .await?
            .into_iter()
            .map(|hit| hit.chunk)
            .collect())
    }

    /// Top `k` chunks for `query` with their similarity scores.
    pub async fn search_with_score(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredChunk>, IndexError> {
        self.scored(query, k, None).await
    }

    async fn scored(
        &self,
        query: &str,
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<ScoredChunk>, IndexError> {
        let entries = self.entries.as_ref().ok_or(IndexError::NotInitialized)?;
        if k == 0 {
            return Ok(Vec::new());
        }
        let query_vec = self.queries.embed_query(query).await?;
        let filter = filter.filter(|f| !f.is_empty());

        let mut hits: Vec<(f32, &IndexEntry)> = entries
            .iter()
            .filter(|e| filter.map_or(true, |f| f.matches(&e.metadata)))
            .map(|e| (cosine_similarity(&query_vec, &e.embedding), e))
            .collect();
        // Stable: equal scores keep insertion order.
        hits.sort_by(|a, b| b.0.total_cmp(&a.0));
        hits.truncate(k);

        debug!(query, k, returned = hits.len(), filtered = filter.is_some(), "Searched index");
        Ok(hits
            .into_iter()
            .map(|(score, e)| ScoredChunk {
                chunk: e.to_chunk(),
                score,
            })
            .collect())
    }
}

fn batch_error(batch: usize, total: usize, source: IndexError) -> IndexError {
    IndexError::Batch {
        batch,
        total,
        source: Box::new(source),
    }
}

/// Append one embedded batch as a frame and keep its entries for loading.
fn persist_batch(
    path: &Path,
    embedded: Vec<(Chunk, Vec<f32>)>,
    batch_no: usize,
    total: usize,
    loaded: &mut Vec<IndexEntry>,
) -> Result<u64, IndexError> {
    let entries: Vec<IndexEntry> = embedded
        .into_iter()
        .map(|(chunk, embedding)| IndexEntry::new(chunk, embedding))
        .collect();
    let raw = storage::write_frame(path, &entries, batch_no == 1)
        .map_err(|e| batch_error(batch_no, total, e))?;
    info!("Embedding batch {}/{}", batch_no, total);
    loaded.extend(entries);
    Ok(raw)
}

#[async_trait]
impl Retriever for VectorIndex {
    async fn retrieve(
        &self,
        query: &str,
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<Chunk>, IndexError> {
        self.search(query, k, filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reportlens_core::DocumentMetadata;
    use reportlens_ingest::embedding::EmbeddingError;

    /// Embeds by counting keyword hits so similarity is predictable.
    struct KeywordEmbedder;

    const KEYWORDS: [&str; 3] = ["revenue", "profit", "growth"];

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(texts
                .iter()
                .map(|t| {
                    let lower = t.to_lowercase();
                    let mut v: Vec<f32> = KEYWORDS
                        .iter()
                        .map(|k| lower.matches(k).count() as f32)
                        .collect();
                    v.push(0.1);
                    v
                })
                .collect())
        }

        fn dimensions(&self) -> usize {
            4
        }

        fn name(&self) -> &str {
            "keyword"
        }
    }

    fn chunk(text: &str, company: &str, year: &str) -> Chunk {
        Chunk {
            content: text.to_string(),
            metadata: DocumentMetadata {
                company: company.into(),
                source_file: format!("{company}_{year}.pdf"),
                year: year.into(),
                page: Some(1),
            },
        }
    }

    fn index(dir: &Path, batch_size: usize) -> VectorIndex {
        VectorIndex::new(
            IndexConfig {
                persist_dir: dir.join("index"),
                batch_size,
            },
            Arc::new(KeywordEmbedder),
        )
    }

    #[tokio::test]
    async fn search_before_load_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let idx = index(dir.path(), 10);
        assert!(matches!(
            idx.search("revenue", 3, None).await,
            Err(IndexError::NotInitialized)
        ));
        assert!(matches!(
            idx.search_with_score("revenue", 3).await,
            Err(IndexError::NotInitialized)
        ));
    }

    #[tokio::test]
    async fn ranks_by_similarity() {
        let dir = tempfile::tempdir().unwrap();
        let mut idx = index(dir.path(), 2);
        idx.create(vec![
            chunk("growth growth growth", "Tesla", "2023"),
            chunk("revenue revenue and sales", "BMW", "2023"),
            chunk("profit margin", "Ford", "2022"),
        ])
        .await
        .unwrap();

        let hits = idx.search_with_score("revenue", 3).await.unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].chunk.metadata.company, "BMW");
        assert!(hits[0].score >= hits[1].score && hits[1].score >= hits[2].score);
    }

    #[tokio::test]
    async fn ties_keep_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut idx = index(dir.path(), 10);
        idx.create(vec![
            chunk("profit one", "BMW", "2021"),
            chunk("profit two", "BMW", "2022"),
            chunk("profit three", "BMW", "2023"),
        ])
        .await
        .unwrap();
        let hits = idx.search("profit", 3, None).await.unwrap();
        let years: Vec<_> = hits.iter().map(|c| c.metadata.year.as_str()).collect();
        assert_eq!(years, vec!["2021", "2022", "2023"]);
    }

    #[tokio::test]
    async fn filter_restricts_results() {
        let dir = tempfile::tempdir().unwrap();
        let mut idx = index(dir.path(), 10);
        idx.create(vec![
            chunk("revenue", "BMW", "2023"),
            chunk("revenue", "Tesla", "2023"),
            chunk("revenue", "Tesla", "2022"),
        ])
        .await
        .unwrap();

        let filter = MetadataFilter::new(Some("Tesla"), Some("2022"));
        let hits = idx.search("revenue", 5, Some(&filter)).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].metadata.company, "Tesla");
        assert_eq!(hits[0].metadata.year, "2022");

        let empty = MetadataFilter::default();
        assert_eq!(idx.search("revenue", 5, Some(&empty)).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn non_finite_embeddings_rank_last() {
        let dir = tempfile::tempdir().unwrap();
        let mut idx = index(dir.path(), 10);
        idx.create(vec![
            chunk("broken vector", "Ford", "2022"),
            chunk("profit margin", "Tesla", "2023"),
            chunk("revenue", "BMW", "2023"),
        ])
        .await
        .unwrap();
        if let Some(entries) = idx.entries.as_mut() {
            entries[0].embedding = vec![f32::INFINITY, f32::INFINITY, 0.0, 0.1];
        }

        let hits = idx.search_with_score("revenue", 3).await.unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].chunk.metadata.company, "BMW");
        assert_eq!(hits[2].chunk.metadata.company, "Ford");
        assert_eq!(hits[2].score, 0.0);
        assert!(hits.iter().all(|h| h.score.is_finite()));
    }

    #[tokio::test]
    async fn k_zero_returns_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut idx = index(dir.path(), 10);
        idx.create(vec![chunk("revenue", "BMW", "2023")]).await.unwrap();
        assert!(idx.search("revenue", 0, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_with_no_chunks_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut idx = index(dir.path(), 10);
        assert!(matches!(idx.create(Vec::new()).await, Err(IndexError::NothingToIndex)));
        assert!(!idx.exists());
    }

    #[tokio::test]
    async fn meta_records_batches() {
        let dir = tempfile::tempdir().unwrap();
        let mut idx = index(dir.path(), 2);
        let chunks = (0..5).map(|i| chunk(&format!("revenue {i}"), "BMW", "2023")).collect();
        idx.create(chunks).await.unwrap();
        let meta = idx.meta().unwrap();
        assert_eq!(meta.entry_count, 5);
        assert_eq!(meta.batches, 3);
        assert_eq!(meta.dimensions, 4);
        assert_eq!(idx.len(), 5);
    }
}
