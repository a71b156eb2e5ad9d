//! Key-value storage behind the page cache.

use std::sync::RwLock;

use lru::LruCache;
use metrics::counter;

use super::config::CacheConfig;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

pub const METRIC_STORE_EVICT: &str = "pagewright_cache_store_evict_total";

/// String key-value store shared by all requests.
pub trait CacheStore: Send + Sync {
    fn get_value(&self, key: &str) -> Option<String>;

    fn set_value(&self, key: &str, value: String);

    fn delete_value(&self, key: &str);

    /// Delete every key starting with `prefix`, returning how many were removed.
    fn delete_keys(&self, prefix: &str) -> usize;
}

/// In-process store with LRU eviction.
pub struct MemoryCacheStore {
    entries: RwLock<LruCache<String, String>>,
}

impl MemoryCacheStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(config.page_limit_non_zero())),
        }
    }

    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCacheStore {
    fn get_value(&self, key: &str) -> Option<String> {
        rw_write(&self.entries, SOURCE, "get_value")
            .get(key)
            .cloned()
    }

    fn set_value(&self, key: &str, value: String) {
        let evicted = rw_write(&self.entries, SOURCE, "set_value").push(key.to_string(), value);
        if let Some((evicted_key, _)) = evicted
            && evicted_key != key
        {
            counter!(METRIC_STORE_EVICT).increment(1);
        }
    }

    fn delete_value(&self, key: &str) {
        rw_write(&self.entries, SOURCE, "delete_value").pop(key);
    }

    fn delete_keys(&self, prefix: &str) -> usize {
        let mut entries = rw_write(&self.entries, SOURCE, "delete_keys");
        let doomed: Vec<String> = entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &doomed {
            entries.pop(key);
        }
        doomed.len()
    }
}
