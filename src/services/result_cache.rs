//! Memoized, pre-paginated search results.
//!
//! One entry holds every page of one search, computed from a single snapshot,
//! so all pages of an entry report the same total. Entries are replaced whole
//! when they expire and never extended page by page.

use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::cache::TtlCache;
use crate::domain::SearchMode;
use crate::services::paginator;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchCacheKey {
    pub mode: SearchMode,
    pub query: String,
    pub page_size: usize,
}

impl SearchCacheKey {
    #[must_use]
    pub fn new(mode: SearchMode, query: &str, page_size: usize) -> Self {
        Self {
            mode,
            query: normalize_query(query),
            page_size,
        }
    }
}

/// Every search predicate is case-insensitive, so queries differing only in
/// case or surrounding whitespace share an entry.
#[must_use]
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPage<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

#[derive(Debug)]
pub struct CachedSearch<T> {
    pages: Vec<ResultPage<T>>,
    total_count: u64,
}

impl<T: Clone> CachedSearch<T> {
    fn new(items: &[T], total_count: u64, page_size: usize) -> Self {
        let pages = paginator::split(items, page_size)
            .into_iter()
            .map(|items| ResultPage { items, total_count })
            .collect();

        Self { pages, total_count }
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// A page past the stored ones is empty but keeps the entry's total.
    fn lookup(&self, page: usize, was_cache_hit: bool) -> PageLookup<T> {
        self.pages.get(page).map_or_else(
            || PageLookup {
                items: Vec::new(),
                total_count: self.total_count,
                was_cache_hit,
            },
            |stored| PageLookup {
                items: stored.items.clone(),
                total_count: stored.total_count,
                was_cache_hit,
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLookup<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub was_cache_hit: bool,
}

pub struct ResultCache<T> {
    entries: TtlCache<SearchCacheKey, CachedSearch<T>>,
    ttl: Duration,
}

impl<T: Clone> ResultCache<T> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: TtlCache::new(),
            ttl,
        }
    }

    /// Serves `page` of the search identified by `key`, running `compute` on a
    /// miss. `compute` returns the capped, ordered matches and the uncapped
    /// match count.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: SearchCacheKey,
        page: usize,
        compute: F,
    ) -> Result<PageLookup<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(Vec<T>, u64), E>>,
    {
        if let Some((entry, age)) = self.entries.get(&key) {
            debug!(
                mode = %key.mode,
                query = %key.query,
                page,
                stored_pages = entry.page_count(),
                age_ms = u64::try_from(age.as_millis()).unwrap_or(u64::MAX),
                "Search cache hit"
            );
            return Ok(entry.lookup(page, true));
        }

        let (items, total_count) = compute().await?;
        let page_size = key.page_size;
        let entry = self.entries.put(
            key,
            CachedSearch::new(&items, total_count, page_size),
            self.ttl,
        );

        Ok(entry.lookup(page, false))
    }

    pub fn invalidate(&self, key: &SearchCacheKey) {
        self.entries.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key(query: &str) -> SearchCacheKey {
        SearchCacheKey::new(SearchMode::Map, query, 5)
    }

    async fn lookup(
        cache: &ResultCache<u32>,
        calls: &AtomicUsize,
        query: &str,
        page: usize,
    ) -> PageLookup<u32> {
        cache
            .get_or_compute(key(query), page, move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(((0..12).collect(), 40))
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn first_call_misses_then_hits() {
        let cache = ResultCache::new(Duration::from_secs(300));
        let calls = AtomicUsize::new(0);

        let first = lookup(&cache, &calls, "box", 0).await;
        assert!(!first.was_cache_hit);
        assert_eq!(first.items, vec![0, 1, 2, 3, 4]);

        let second = lookup(&cache, &calls, "box", 0).await;
        assert!(second.was_cache_hit);
        assert_eq!(second.items, first.items);

        let third = lookup(&cache, &calls, "box", 2).await;
        assert!(third.was_cache_hit);
        assert_eq!(third.items, vec![10, 11]);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn pages_share_the_entry_total() {
        let cache = ResultCache::new(Duration::from_secs(300));
        let calls = AtomicUsize::new(0);

        for page in 0..3 {
            assert_eq!(lookup(&cache, &calls, "box", page).await.total_count, 40);
        }
    }

    #[tokio::test]
    async fn page_past_stored_pages_is_empty_without_recompute() {
        let cache = ResultCache::new(Duration::from_secs(300));
        let calls = AtomicUsize::new(0);

        lookup(&cache, &calls, "box", 0).await;
        let beyond = lookup(&cache, &calls, "box", 3).await;

        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_count, 40);
        assert!(beyond.was_cache_hit);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn queries_are_normalized_into_one_key() {
        let cache = ResultCache::new(Duration::from_secs(300));
        let calls = AtomicUsize::new(0);

        lookup(&cache, &calls, "Box", 0).await;
        assert!(lookup(&cache, &calls, "  box ", 0).await.was_cache_hit);
        assert!(!lookup(&cache, &calls, "saltern", 0).await.was_cache_hit);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn expired_entries_are_recomputed() {
        let cache = ResultCache::new(Duration::ZERO);
        let calls = AtomicUsize::new(0);

        lookup(&cache, &calls, "box", 0).await;
        assert!(!lookup(&cache, &calls, "box", 0).await.was_cache_hit);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn compute_errors_are_not_cached() {
        let cache: ResultCache<u32> = ResultCache::new(Duration::from_secs(300));

        let failed = cache
            .get_or_compute(key("box"), 0, || async { Err::<(Vec<u32>, u64), _>("store down") })
            .await;
        assert_eq!(failed, Err("store down"));

        let calls = AtomicUsize::new(0);
        assert!(!lookup(&cache, &calls, "box", 0).await.was_cache_hit);
    }

    #[tokio::test]
    async fn concurrent_misses_settle_on_one_entry() {
        let cache = Arc::new(ResultCache::new(Duration::from_secs(300)));
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move { lookup(&cache, &calls, "box", 1).await })
            })
            .collect();

        for task in tasks {
            let page = task.await.unwrap();
            assert_eq!(page.items, vec![5, 6, 7, 8, 9]);
            assert_eq!(page.total_count, 40);
        }

        let after = lookup(&cache, &calls, "box", 1).await;
        assert!(after.was_cache_hit);
    }

    #[tokio::test]
    async fn empty_results_report_no_pages() {
        let cache: ResultCache<u32> = ResultCache::new(Duration::from_secs(300));
        let page = cache
            .get_or_compute(key("nothing"), 0, || async {
                Ok::<_, Infallible>((Vec::new(), 0))
            })
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
    }
}
