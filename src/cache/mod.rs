//! Memoization of render passes.
//!
//! A render is a pure function of its [`Document`], so results are keyed by
//! value: a hash of the text plus every flag that influences the output.
//! Re-rendering an unchanged document (for example after a focus change)
//! returns the cached [`RenderResult`] without recomputing anything.
//!
//! The cache is thread-safe and bounded both by entry count and by an
//! estimated byte size, evicting least-recently-used entries first.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::CacheConfig;
use crate::render::{Document, LineNumbers, RenderResult, StyledSpan};

/// Cache key for one render pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderKey {
    text_hash: u64,
    text_len: usize,
    diff_mode: bool,
    wrap: bool,
    font_size_bits: u32,
    query: String,
}

impl RenderKey {
    /// Key for `doc`. The query is trimmed, matching the highlighter.
    #[must_use]
    pub fn for_document(doc: &Document) -> Self {
        let mut hasher = DefaultHasher::new();
        doc.text.hash(&mut hasher);
        Self {
            text_hash: hasher.finish(),
            text_len: doc.text.len(),
            diff_mode: doc.diff_mode,
            wrap: doc.wrap,
            font_size_bits: doc.font_size.to_bits(),
            query: doc.search_query.trim().to_string(),
        }
    }
}

/// LRU cache entry with access tracking.
#[derive(Debug)]
struct CacheEntry<V> {
    /// The cached value.
    value: V,
    /// Access order (higher = more recent).
    access_order: u64,
    /// Size estimate in bytes.
    size_estimate: usize,
}

/// Generic LRU cache bounded by entry count and estimated size.
#[derive(Debug)]
pub struct LruCache<K, V> {
    /// Cache entries.
    entries: HashMap<K, CacheEntry<V>>,
    /// Global access counter for LRU tracking.
    access_counter: u64,
    /// Maximum number of entries.
    max_entries: usize,
    /// Maximum total size in bytes.
    max_size: usize,
    /// Current estimated size.
    current_size: usize,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    /// Create a new cache with the specified limits.
    pub fn new(max_entries: usize, max_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            access_counter: 0,
            max_entries,
            max_size,
            current_size: 0,
        }
    }

    /// Get an entry, marking it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let entry = self.entries.get_mut(key)?;
        self.access_counter += 1;
        entry.access_order = self.access_counter;
        Some(&entry.value)
    }

    /// Insert a value into the cache.
    ///
    /// Values larger than the whole cache are not stored.
    pub fn insert(&mut self, key: K, value: V, size_estimate: usize) {
        if self.max_entries == 0 || size_estimate > self.max_size {
            return;
        }

        self.remove(&key);
        self.evict_if_needed(size_estimate);

        self.access_counter += 1;
        self.entries.insert(
            key,
            CacheEntry {
                value,
                access_order: self.access_counter,
                size_estimate,
            },
        );
        self.current_size += size_estimate;
    }

    /// Evict entries if cache is over limits.
    fn evict_if_needed(&mut self, incoming_size: usize) {
        // Evict by count
        while self.entries.len() >= self.max_entries && !self.entries.is_empty() {
            self.evict_lru();
        }

        // Evict by size
        while self.current_size + incoming_size > self.max_size && !self.entries.is_empty() {
            self.evict_lru();
        }
    }

    /// Evict the least recently used entry.
    fn evict_lru(&mut self) {
        let lru_key = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.access_order)
            .map(|(key, _)| key.clone());

        if let Some(key) = lru_key {
            self.remove(&key);
        }
    }

    /// Remove an entry.
    pub fn remove(&mut self, key: &K) {
        if let Some(entry) = self.entries.remove(key) {
            self.current_size = self.current_size.saturating_sub(entry.size_estimate);
        }
    }

    /// Clear all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_size = 0;
        self.access_counter = 0;
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.entries.len(),
            max_entries: self.max_entries,
            current_size: self.current_size,
            max_size: self.max_size,
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries.
    pub entry_count: usize,
    /// Maximum entries allowed.
    pub max_entries: usize,
    /// Current estimated size in bytes.
    pub current_size: usize,
    /// Maximum size allowed in bytes.
    pub max_size: usize,
}

impl CacheStats {
    /// Get usage as percentage.
    pub fn usage_percent(&self) -> f64 {
        if self.max_entries == 0 {
            return 0.0;
        }
        (self.entry_count as f64 / self.max_entries as f64) * 100.0
    }

    /// Get size usage as percentage.
    pub fn size_usage_percent(&self) -> f64 {
        if self.max_size == 0 {
            return 0.0;
        }
        (self.current_size as f64 / self.max_size as f64) * 100.0
    }
}

/// Rough heap footprint of a render result.
fn estimate_size(result: &RenderResult) -> usize {
    std::mem::size_of::<RenderResult>()
        + result.styled_spans.len() * std::mem::size_of::<StyledSpan>()
        + result.line_break_offsets.len() * std::mem::size_of::<usize>()
        + result.per_line_numbers.len() * std::mem::size_of::<LineNumbers>()
        + result.line_kinds.len()
}

/// Thread-safe cache of render results.
pub struct RenderCache {
    enabled: bool,
    inner: RwLock<LruCache<RenderKey, Arc<RenderResult>>>,
}

impl RenderCache {
    /// Create a cache from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            enabled: config.enabled,
            inner: RwLock::new(LruCache::new(config.max_entries, config.max_size as usize)),
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            inner: RwLock::new(LruCache::new(0, 0)),
        }
    }

    /// Whether lookups can ever hit.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get the cached result for `doc`.
    pub fn get(&self, doc: &Document) -> Option<Arc<RenderResult>> {
        if !self.enabled {
            return None;
        }
        self.inner.write().get(&RenderKey::for_document(doc)).cloned()
    }

    /// Cache a result for `doc`.
    pub fn insert(&self, doc: &Document, result: RenderResult) -> Arc<RenderResult> {
        let result = Arc::new(result);
        if self.enabled {
            let size = estimate_size(&result);
            self.inner
                .write()
                .insert(RenderKey::for_document(doc), Arc::clone(&result), size);
        }
        result
    }

    /// Get the cached result or render and cache it.
    ///
    /// The boolean is `true` on a cache hit.
    pub fn get_or_render<F>(&self, doc: &Document, render_fn: F) -> (Arc<RenderResult>, bool)
    where
        F: FnOnce(&Document) -> RenderResult,
    {
        if let Some(hit) = self.get(doc) {
            return (hit, true);
        }
        (self.insert(doc, render_fn(doc)), false)
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Get statistics.
    pub fn stats(&self) -> CacheStats {
        self.inner.read().stats()
    }
}

impl std::fmt::Debug for RenderCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderCache")
            .field("enabled", &self.enabled)
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render;

    #[test]
    fn test_lru_eviction_by_count() {
        let mut cache: LruCache<&str, u32> = LruCache::new(2, 1000);
        cache.insert("a", 1, 10);
        cache.insert("b", 2, 10);
        assert_eq!(cache.get(&"a"), Some(&1));
        cache.insert("c", 3, 10);

        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"c"), Some(&3));
    }

    #[test]
    fn test_lru_eviction_by_size() {
        let mut cache: LruCache<u8, ()> = LruCache::new(10, 100);
        cache.insert(1, (), 60);
        cache.insert(2, (), 60);
        assert_eq!(cache.stats().entry_count, 1);
        assert_eq!(cache.stats().current_size, 60);

        cache.insert(3, (), 500);
        assert_eq!(cache.get(&3), None);
    }

    #[test]
    fn test_cache_stats() {
        let mut cache: LruCache<u8, ()> = LruCache::new(4, 100);
        cache.insert(1, (), 25);
        let stats = cache.stats();
        assert!((stats.usage_percent() - 25.0).abs() < f64::EPSILON);
        assert!((stats.size_usage_percent() - 25.0).abs() < f64::EPSILON);
        cache.clear();
        assert_eq!(cache.stats().entry_count, 0);
    }

    #[test]
    fn test_key_covers_every_input() {
        let base = Document::new("text");
        let key = RenderKey::for_document(&base);
        assert_ne!(key, RenderKey::for_document(&base.clone().with_diff_mode(true)));
        assert_ne!(key, RenderKey::for_document(&base.clone().with_wrap(true)));
        assert_ne!(key, RenderKey::for_document(&base.clone().with_font_size(14.0)));
        assert_ne!(key, RenderKey::for_document(&base.clone().with_search("x")));
        assert_ne!(key, RenderKey::for_document(&Document::new("other")));
        assert_eq!(key, RenderKey::for_document(&base.clone().with_search("  ")));
    }

    #[test]
    fn test_get_or_render_hits_second_time() {
        let cache = RenderCache::new(&CacheConfig::default());
        let doc = Document::new("let x = 1;");
        let (first, hit) = cache.get_or_render(&doc, render);
        assert!(!hit);
        let (second, hit) = cache.get_or_render(&doc, |_| unreachable!("should hit"));
        assert!(hit);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_disabled_cache_always_misses() {
        let cache = RenderCache::disabled();
        let doc = Document::new("x");
        let (_, hit) = cache.get_or_render(&doc, render);
        assert!(!hit);
        let (_, hit) = cache.get_or_render(&doc, render);
        assert!(!hit);
        assert!(!cache.is_enabled());
    }
}
