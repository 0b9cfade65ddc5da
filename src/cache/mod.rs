//! # Cache Module
//!
//! Short-lived, in-memory cache for resolved searches.
//!
//! Every expensive computation of the resolution engine (catalog calls per
//! genre, per-theme selections, popular tracks, full search responses) is
//! stored here under a string key and reused until it expires.
//!
//! ## Features
//!
//! - **TTL Support**: entries older than the TTL (5 minutes by default) are
//!   treated as misses and evicted on read
//! - **Memory Bounded**: a fixed capacity with least-recently-used eviction
//! - **Thread Safety**: concurrent access from multiple tasks
//! - **Metrics**: hit/miss/eviction counters
//!
//! ## Configuration
//!
//! ```env
//! CACHE_TTL=300          # Time-to-live in seconds
//! CACHE_CAPACITY=1000    # Maximum number of entries
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use mood2music::cache::{CachedValue, ResolutionCache};
//! use std::time::Duration;
//!
//! let cache = ResolutionCache::new(Duration::from_secs(300), 1000);
//! cache.put("popular_tracks_10".to_string(), CachedValue::Tracks(Vec::new()));
//!
//! if let Some(CachedValue::Tracks(tracks)) = cache.get(&"popular_tracks_10".to_string()) {
//!     println!("{} cached tracks", tracks.len());
//! }
//! ```

pub mod lru_cache;

pub use lru_cache::{CacheMetrics, TtlCache};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::SearchResponse;
use crate::sources::Track;

/// Cache shared by every operation of the resolution engine.
///
/// Keys are namespaced by operation (`genre_…`, `theme_…`, `popular_tracks_…`,
/// `smart_search_…`) so one store can hold every kind of result.
pub type ResolutionCache = TtlCache<String, CachedValue>;

/// A cached result: either a ranked track list or a full search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CachedValue {
    Tracks(Vec<Track>),
    Response(SearchResponse),
}

impl ResolutionCache {
    /// Performs cache maintenance by removing expired entries.
    ///
    /// Reads already evict stale entries they touch; this sweeps the ones
    /// nobody asks for again.
    pub fn cleanup_old_entries(&self) -> usize {
        let removed = self.cleanup_expired();
        if removed > 0 {
            info!("🧹 Cache cleanup: removed {} expired entries", removed);
        }

        let metrics = self.metrics();
        debug!(
            "📊 Cache: {}/{} entries, hit rate {:.1}%, miss rate {:.1}%, {} evictions",
            self.len(),
            self.capacity(),
            metrics.hit_rate() * 100.0,
            metrics.miss_rate() * 100.0,
            metrics.evictions
        );

        removed
    }
}
