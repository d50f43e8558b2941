//! Result caching with LRU eviction, keyed by validated query

use crate::query::ParsedQuery;
use crate::search::ResultSet;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

const FALLBACK_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
    Some(n) => n,
    None => unreachable!(),
};

pub struct ResultCache {
    cache: Mutex<LruCache<ParsedQuery, Arc<ResultSet>>>,
}

impl ResultCache {
    pub fn new(capacity: usize) -> Self {
        let cache = LruCache::new(NonZeroUsize::new(capacity).unwrap_or(FALLBACK_CAPACITY));
        Self { cache: Mutex::new(cache) }
    }

    pub fn get(&self, query: &ParsedQuery) -> Option<Arc<ResultSet>> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.get(query).map(Arc::clone)
    }

    pub fn put(&self, query: ParsedQuery, results: Arc<ResultSet>) {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.put(query, results);
    }

    /// Cached results for `query`, computing and storing them on a miss
    pub fn get_or_insert_with<E>(
        &self,
        query: &ParsedQuery,
        compute: impl FnOnce() -> Result<ResultSet, E>,
    ) -> Result<Arc<ResultSet>, E> {
        if let Some(results) = self.get(query) {
            tracing::debug!(?query, "result cache hit");
            return Ok(results);
        }

        let results = Arc::new(compute()?);
        self.put(query.clone(), Arc::clone(&results));
        Ok(results)
    }

    pub fn clear(&self) {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// (entries, capacity)
    pub fn stats(&self) -> (usize, usize) {
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        (cache.len(), cache.cap().get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Mode;

    fn content(keyword: &str) -> ParsedQuery {
        ParsedQuery::Content { mode: Mode::Normal, keyword: keyword.to_string() }
    }

    #[test]
    fn test_computes_once() {
        let cache = ResultCache::new(4);
        let mut calls = 0;
        for _ in 0..3 {
            let results = cache
                .get_or_insert_with(&content("قل"), || {
                    calls += 1;
                    Ok::<_, ()>(ResultSet::empty())
                })
                .unwrap();
            assert!(results.is_empty());
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.stats(), (1, 4));
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache = ResultCache::new(4);
        let err = cache.get_or_insert_with(&content("قل"), || Err::<ResultSet, _>("boom"));
        assert!(err.is_err());
        assert!(cache.get(&content("قل")).is_none());
    }

    #[test]
    fn test_evicts_least_recent() {
        let cache = ResultCache::new(2);
        cache.put(content("ا"), Arc::new(ResultSet::empty()));
        cache.put(content("ب"), Arc::new(ResultSet::empty()));
        cache.get(&content("ا"));
        cache.put(content("ت"), Arc::new(ResultSet::empty()));
        assert!(cache.get(&content("ا")).is_some());
        assert!(cache.get(&content("ب")).is_none());

        cache.clear();
        assert_eq!(cache.stats(), (0, 2));
    }

    #[test]
    fn test_zero_capacity_falls_back() {
        assert_eq!(ResultCache::new(0).stats().1, 256);
    }
}
