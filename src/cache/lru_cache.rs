use dashmap::DashMap;
use std::{
    hash::Hash,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};
use tracing::debug;

/// Cache entry con TTL
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    last_used: u64,
}

impl<V> CacheEntry<V> {
    fn new(value: V, tick: u64) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
            last_used: tick,
        }
    }

    /// An entry is valid while `now - inserted_at < ttl`.
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expired_removals: AtomicU64,
}

/// Time-bounded cache with a fixed capacity.
///
/// Expired entries are evicted when read. Once `capacity` keys are stored,
/// inserting a new key drops the least recently used one.
#[derive(Debug)]
pub struct TtlCache<K: Clone + Eq + Hash, V> {
    data: Arc<DashMap<K, CacheEntry<V>>>,
    ttl: Duration,
    capacity: usize,
    clock: Arc<AtomicU64>,
    counters: Arc<Counters>,
}

impl<K, V> TtlCache<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            data: Arc::new(DashMap::new()),
            ttl,
            capacity: capacity.max(1),
            clock: Arc::new(AtomicU64::new(0)),
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        match self.data.get_mut(key) {
            Some(mut entry) if !entry.is_expired(self.ttl) => {
                entry.last_used = self.tick();
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.value.clone());
            }
            Some(_) => {}
            None => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        }

        // Entrada expirada: se elimina solo si nadie la reemplazó entretanto
        let ttl = self.ttl;
        if self.data.remove_if(key, |_, entry| entry.is_expired(ttl)).is_some() {
            self.counters.expired_removals.fetch_add(1, Ordering::Relaxed);
        }
        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Stores `value`, overwriting any previous entry for `key`.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        if !self.data.contains_key(&key) && self.data.len() >= self.capacity {
            self.evict_least_recently_used();
        }

        let entry = CacheEntry::new(value, self.tick());
        self.data.insert(key, entry).map(|old| old.value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Limpia entradas expiradas y retorna el número de elementos removidos
    pub fn cleanup_expired(&self) -> usize {
        let before = self.data.len();
        let ttl = self.ttl;
        self.data.retain(|_, entry| !entry.is_expired(ttl));
        let removed = before.saturating_sub(self.data.len());

        if removed > 0 {
            self.counters
                .expired_removals
                .fetch_add(removed as u64, Ordering::Relaxed);
            debug!("Removed {} expired cache entries", removed);
        }

        removed
    }

    pub fn metrics(&self) -> CacheMetrics {
        CacheMetrics {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
            expired_removals: self.counters.expired_removals.load(Ordering::Relaxed),
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn evict_least_recently_used(&self) {
        // Expired entries go first; they would miss on read anyway
        if self.cleanup_expired() > 0 && self.data.len() < self.capacity {
            return;
        }

        let oldest = self
            .data
            .iter()
            .min_by_key(|entry| entry.value().last_used)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            if self.data.remove(&key).is_some() {
                self.counters.evictions.fetch_add(1, Ordering::Relaxed);
                debug!("Cache full ({} entries), evicted least recently used key", self.capacity);
            }
        }
    }
}

impl<K, V> Clone for TtlCache<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            ttl: self.ttl,
            capacity: self.capacity,
            clock: self.clock.clone(),
            counters: self.counters.clone(),
        }
    }
}

/// Métricas básicas del cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expired_removals: u64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }

    pub fn miss_rate(&self) -> f64 {
        1.0 - self.hit_rate()
    }
}
