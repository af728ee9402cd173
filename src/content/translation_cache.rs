//! Bounded, age-limited cache of translation results
//!
//! Keys are xxh3 hashes of the input HTML seeded with the sanitization mode,
//! so the permissive and strict translations of one clip are separate
//! entries. Entries expire `max_age` after insertion; capacity is enforced by
//! LRU eviction.
//!
//! The cache itself is not synchronized. `HtmlTranslator` shares one behind
//! `Arc<parking_lot::Mutex<_>>` and performs each lookup or insert inside a
//! single lock acquisition.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use log::{debug, trace};
use lru::LruCache;
use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::config::PipelineConfig;

use super::translator::ProcessingResult;

/// One cached translation
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub result: ProcessingResult,
    pub created_at: Instant,
    /// Lookups served from this entry
    pub hit_count: u64,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant, max_age: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= max_age
    }
}

/// Point-in-time cache counters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

#[derive(Debug)]
pub struct TranslationCache {
    entries: LruCache<u64, CacheEntry>,
    max_age: Duration,
    hits: u64,
    misses: u64,
}

impl TranslationCache {
    #[must_use]
    pub fn new(capacity: NonZeroUsize, max_age: Duration) -> Self {
        Self {
            entries: LruCache::new(capacity),
            max_age,
            hits: 0,
            misses: 0,
        }
    }

    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.cache_capacity_nonzero(), config.cache_max_age())
    }

    /// Cache key for `html` translated in the given mode
    #[must_use]
    pub fn cache_key(html: &str, strict: bool) -> u64 {
        xxh3_64_with_seed(html.as_bytes(), u64::from(strict))
    }

    /// Look up a live entry, counting a hit or a miss
    pub fn get(&mut self, key: u64) -> Option<ProcessingResult> {
        self.get_at(key, Instant::now())
    }

    /// `get` evaluated at `now`
    ///
    /// An entry whose age has reached `max_age` is removed and reported as a
    /// miss.
    pub fn get_at(&mut self, key: u64, now: Instant) -> Option<ProcessingResult> {
        let expired = match self.entries.peek(&key) {
            Some(entry) => entry.is_expired(now, self.max_age),
            None => {
                self.misses += 1;
                return None;
            }
        };

        if expired {
            self.entries.pop(&key);
            self.misses += 1;
            trace!("Translation cache entry {key:016x} expired");
            return None;
        }

        let entry = self.entries.get_mut(&key)?;
        entry.hit_count += 1;
        self.hits += 1;
        Some(entry.result.clone())
    }

    /// Store a result, evicting the least recently used entry at capacity
    pub fn set(&mut self, key: u64, result: ProcessingResult) {
        self.set_at(key, result, Instant::now());
    }

    pub fn set_at(&mut self, key: u64, result: ProcessingResult, now: Instant) {
        let entry = CacheEntry {
            result,
            created_at: now,
            hit_count: 0,
        };
        // push returns the displaced pair: the old value for the same key,
        // or the evicted LRU entry
        match self.entries.push(key, entry) {
            Some((evicted, _)) if evicted != key => trace!(
                "Translation cache evicted {evicted:016x} (capacity {})",
                self.entries.cap()
            ),
            _ => {}
        }
    }

    /// Remove every expired entry, returning how many were removed
    pub fn cleanup(&mut self) -> usize {
        self.cleanup_at(Instant::now())
    }

    pub fn cleanup_at(&mut self, now: Instant) -> usize {
        let expired: Vec<u64> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, self.max_age))
            .map(|(key, _)| *key)
            .collect();

        for key in &expired {
            self.entries.pop(key);
        }

        if !expired.is_empty() {
            debug!(
                "Cleaned up {} expired translations (current size: {})",
                expired.len(),
                self.entries.len()
            );
        }
        expired.len()
    }

    /// Fraction of lookups served from the cache; 0.0 before any lookup
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            capacity: self.entries.cap().get(),
            hits: self.hits,
            misses: self.misses,
            hit_rate: self.hit_rate(),
        }
    }

    /// Hit count of a live entry, without promoting it
    #[must_use]
    pub fn entry_hits(&self, key: u64) -> Option<u64> {
        self.entries.peek(&key).map(|entry| entry.hit_count)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry and reset the counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}
