use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use crate::data::types::Series;

/// Per-keyword memo of fetched series.
///
/// Without a TTL entries live until invalidated or the process exits.
pub struct SeriesCache {
    cache: DashMap<String, CachedSeries>,
    ttl: Option<Duration>,
}

struct CachedSeries {
    series: Arc<Series>,
    timestamp: Instant,
}

impl SeriesCache {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            cache: DashMap::new(),
            ttl,
        }
    }

    pub fn insert(&self, key: String, series: Arc<Series>) {
        self.cache.insert(key, CachedSeries {
            series,
            timestamp: Instant::now(),
        });
    }

    /// Get series if not expired (evict on read)
    pub fn get(&self, key: &str) -> Option<Arc<Series>> {
        {
            let entry = self.cache.get(key)?;
            let fresh = self.ttl.map_or(true, |ttl| entry.timestamp.elapsed() <= ttl);
            if fresh {
                return Some(Arc::clone(&entry.series));
            }
        } // read lock dropped before removal

        self.cache.remove(key);
        None
    }

    /// Drop one keyword so the next fetch goes to the provider.
    pub fn invalidate(&self, key: &str) -> bool {
        self.cache.remove(key).is_some()
    }

    /// Drop every entry, returning how many there were.
    pub fn clear(&self) -> usize {
        let dropped = self.cache.len();
        self.cache.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }
}

impl Default for SeriesCache {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn series(keyword: &str) -> Arc<Series> {
        Arc::new(Series::new(keyword, Vec::new()))
    }

    #[test]
    fn test_cache_insert_and_get() {
        let cache = SeriesCache::default();
        cache.insert("youtube.com".to_string(), series("youtube.com"));

        let hit = cache.get("youtube.com").unwrap();
        assert_eq!(hit.keyword, "youtube.com");
        assert!(cache.get("amazon.com").is_none());
    }

    #[test]
    fn test_cache_ttl_expiration() {
        let cache = SeriesCache::new(Some(Duration::from_millis(200)));
        cache.insert("amazon.com".to_string(), series("amazon.com"));

        // Should exist immediately
        assert!(cache.get("amazon.com").is_some());

        thread::sleep(Duration::from_millis(300));

        // Should be evicted
        assert!(cache.get("amazon.com").is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_no_ttl_keeps_entries() {
        let cache = SeriesCache::new(None);
        cache.insert("linkedin.com".to_string(), series("linkedin.com"));

        thread::sleep(Duration::from_millis(50));

        assert!(cache.get("linkedin.com").is_some());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = SeriesCache::default();
        cache.insert("facebook.com".to_string(), series("facebook.com"));
        cache.insert("instagram.com".to_string(), series("instagram.com"));

        assert!(cache.invalidate("facebook.com"));
        assert!(!cache.invalidate("facebook.com"));
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.clear(), 1);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.clear(), 0);
    }
}
