use std::{collections::HashMap, sync::Arc, time::Duration};

use pricebyte_upstream::SearchPage;
use tokio::{sync::Mutex, time::Instant};

/// Cache key for a search: the trimmed, lower-cased query plus paging.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchCacheKey {
    query: String,
    offset: i64,
    limit: i64,
}

impl SearchCacheKey {
    #[must_use]
    pub fn new(query: &str, offset: i64, limit: i64) -> Self {
        Self {
            query: query.trim().to_lowercase(),
            offset,
            limit,
        }
    }
}

#[derive(Debug)]
struct CachedPage {
    page: SearchPage,
    inserted_at: Instant,
}

/// Bounded, time-expiring cache of successful upstream search pages.
///
/// Entries older than `ttl` are never returned. When full, the oldest entry
/// is evicted to make room. A `max_entries` of zero disables caching.
#[derive(Debug, Clone)]
pub struct SearchCache {
    max_entries: usize,
    ttl: Duration,
    entries: Arc<Mutex<HashMap<SearchCacheKey, CachedPage>>>,
}

impl SearchCache {
    #[must_use]
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            max_entries,
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self::new(0, Duration::ZERO)
    }

    fn is_enabled(&self) -> bool {
        self.max_entries > 0 && !self.ttl.is_zero()
    }

    /// Returns a fresh entry for `key`. Expired entries are dropped on lookup.
    pub async fn get(&self, key: &SearchCacheKey) -> Option<SearchPage> {
        if !self.is_enabled() {
            return None;
        }

        let mut entries = self.entries.lock().await;
        let cached = entries.get(key)?;
        if cached.inserted_at.elapsed() < self.ttl {
            return Some(cached.page.clone());
        }
        entries.remove(key);
        None
    }

    pub async fn insert(&self, key: SearchCacheKey, page: SearchPage) {
        if !self.is_enabled() {
            return;
        }

        let mut entries = self.entries.lock().await;
        let ttl = self.ttl;
        entries.retain(|_, cached| cached.inserted_at.elapsed() < ttl);

        if !entries.contains_key(&key) && entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, cached)| cached.inserted_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key,
            CachedPage {
                page,
                inserted_at: Instant::now(),
            },
        );
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}
