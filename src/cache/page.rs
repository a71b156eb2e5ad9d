//! Rendered page cache keyed by slug.

use std::sync::Arc;

use metrics::counter;
use tracing::debug;

use super::config::CacheConfig;
use super::store::CacheStore;

/// Prefix shared by every page entry in the store.
pub const PAGE_KEY_PREFIX: &str = "page:";

pub const METRIC_PAGE_HIT: &str = "pagewright_page_cache_hit_total";
pub const METRIC_PAGE_MISS: &str = "pagewright_page_cache_miss_total";
pub const METRIC_PAGE_BYPASS: &str = "pagewright_page_cache_bypass_total";

pub fn page_key(slug: &str) -> String {
    format!("{PAGE_KEY_PREFIX}{slug}")
}

#[derive(Clone)]
pub struct PageCache {
    store: Arc<dyn CacheStore>,
    config: CacheConfig,
}

impl PageCache {
    pub fn new(store: Arc<dyn CacheStore>, config: CacheConfig) -> Self {
        Self { store, config }
    }

    /// Whether reads and writes are skipped.
    pub fn is_bypassed(&self) -> bool {
        self.config.auto_cache_clear
    }

    pub fn get(&self, slug: &str) -> Option<String> {
        if self.is_bypassed() {
            counter!(METRIC_PAGE_BYPASS).increment(1);
            return None;
        }

        match self.store.get_value(&page_key(slug)) {
            Some(markup) if !markup.is_empty() => {
                counter!(METRIC_PAGE_HIT).increment(1);
                debug!(slug, "page cache hit");
                Some(markup)
            }
            _ => {
                counter!(METRIC_PAGE_MISS).increment(1);
                debug!(slug, "page cache miss");
                None
            }
        }
    }

    pub fn put(&self, slug: &str, markup: &str) {
        if self.is_bypassed() {
            return;
        }
        self.store.set_value(&page_key(slug), markup.to_string());
    }

    pub fn invalidate(&self, slug: &str) {
        self.store.delete_value(&page_key(slug));
        debug!(slug, "page cache entry invalidated");
    }

    pub fn invalidate_all(&self) -> usize {
        let removed = self.store.delete_keys(PAGE_KEY_PREFIX);
        debug!(removed, "page cache cleared");
        removed
    }
}
