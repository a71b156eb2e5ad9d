//! Page cache.
//!
//! Rendered markup is stored under `page:<slug>` in a [`CacheStore`]. The
//! bundled [`MemoryCacheStore`] keeps entries in process with LRU eviction.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! auto_cache_clear = false
//! page_limit = 500
//! ```

mod config;
mod lock;
mod page;
mod store;

pub use config::CacheConfig;
pub use page::{
    METRIC_PAGE_BYPASS, METRIC_PAGE_HIT, METRIC_PAGE_MISS, PAGE_KEY_PREFIX, PageCache, page_key,
};
pub use store::{CacheStore, METRIC_STORE_EVICT, MemoryCacheStore};
