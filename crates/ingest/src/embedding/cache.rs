use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;

use super::traits::{Embedder, EmbeddingError};

const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
    Some(n) => n,
    None => NonZeroUsize::MIN,
};

/// LRU cache of query embeddings in front of an [`Embedder`].
///
/// Chat sessions repeat questions (and the setup verification queries run
/// on every setup), so query vectors are kept keyed by the exact query text.
pub struct QueryEmbeddingCache {
    embedder: Arc<dyn Embedder>,
    cache: Mutex<CacheState>,
}

struct CacheState {
    entries: LruCache<String, Vec<f32>>,
    hits: u64,
    misses: u64,
}

impl QueryEmbeddingCache {
    pub fn new(embedder: Arc<dyn Embedder>, capacity: usize) -> Self {
        Self {
            embedder,
            cache: Mutex::new(CacheState {
                entries: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(DEFAULT_CAPACITY)),
                hits: 0,
                misses: 0,
            }),
        }
    }

    pub fn with_default_capacity(embedder: Arc<dyn Embedder>) -> Self {
        Self::new(embedder, DEFAULT_CAPACITY.get())
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Embed one query, serving repeats from the cache.
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>, EmbeddingError> {
        if let Some(hit) = self.lookup(query) {
            return Ok(hit);
        }
        let mut vectors = self.embedder.embed_batch(&[query]).await?;
        let vector = vectors.pop().ok_or(EmbeddingError::CountMismatch {
            sent: 1,
            received: 0,
        })?;
        if let Ok(mut state) = self.cache.lock() {
            state.entries.put(query.to_string(), vector.clone());
        }
        Ok(vector)
    }

    fn lookup(&self, query: &str) -> Option<Vec<f32>> {
        // A poisoned lock only costs a cache miss.
        let mut state = self.cache.lock().ok()?;
        match state.entries.get(query).cloned() {
            Some(v) => {
                state.hits += 1;
                Some(v)
            }
            None => {
                state.misses += 1;
                None
            }
        }
    }

    pub fn hits(&self) -> u64 {
        self.cache.lock().map(|s| s.hits).unwrap_or(0)
    }

    pub fn misses(&self) -> u64 {
        self.cache.lock().map(|s| s.misses).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|s| s.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut state) = self.cache.lock() {
            state.entries.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for CountingEmbedder {
        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn cache(capacity: usize) -> (Arc<CountingEmbedder>, QueryEmbeddingCache) {
        let embedder = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
        });
        let cache = QueryEmbeddingCache::new(embedder.clone(), capacity);
        (embedder, cache)
    }

    #[tokio::test]
    async fn repeat_query_is_served_from_cache() {
        let (embedder, cache) = cache(10);
        let first = cache.embed_query("BMW revenue 2023").await.unwrap();
        let second = cache.embed_query("BMW revenue 2023").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[tokio::test]
    async fn eviction_follows_lru() {
        let (embedder, cache) = cache(2);
        cache.embed_query("a").await.unwrap();
        cache.embed_query("b").await.unwrap();
        cache.embed_query("c").await.unwrap(); // evicts "a"
        assert_eq!(cache.len(), 2);
        cache.embed_query("a").await.unwrap();
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn clear_empties_cache() {
        let (_, cache) = cache(4);
        cache.embed_query("x").await.unwrap();
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }
}
