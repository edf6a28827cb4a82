//! Strict lookups and the bounded, insertion-ordered size cache.

use std::collections::{HashMap, VecDeque};
use std::fmt::Display;
use std::hash::Hash;

use dgrid_core::index::ModelIndex;

/// Fetch a value that must be present.
///
/// Use when absence indicates the caller is out of its expected lifecycle,
/// not a runtime condition.
///
/// # Panics
///
/// Panics when `key` is missing.
pub fn must_get<K, V>(map: &HashMap<K, V>, key: K) -> V
where
    K: Hash + Eq + Display,
    V: Copy,
{
    match map.get(&key) {
        Some(&value) => value,
        None => panic!("missing value for key {key}"),
    }
}

/// Fetch a value, substituting `default` when the key is absent.
#[must_use]
pub fn get_or<K, V>(map: &HashMap<K, V>, key: K, default: V) -> V
where
    K: Hash + Eq,
    V: Copy,
{
    map.get(&key).copied().unwrap_or(default)
}

/// A model-index-to-size cache that remembers insertion order.
///
/// Bulk trimming drops the oldest-inserted entries first. Hash maps do not
/// guarantee iteration order, so insertion order is logged separately.
/// Updating an existing key keeps its original position in the log, which
/// matches the engine's set-then-read usage: entries are never re-inserted
/// to refresh their age.
#[derive(Debug, Clone, Default)]
pub struct SizeCache {
    entries: HashMap<ModelIndex, f64>,
    order: VecDeque<ModelIndex>,
    generation: u64,
}

impl SizeCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: ModelIndex) -> Option<f64> {
        self.entries.get(&key).copied()
    }

    #[must_use]
    pub fn contains_key(&self, key: ModelIndex) -> bool {
        self.entries.contains_key(&key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A counter bumped by every mutation, for cheap change detection.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ModelIndex, f64)> + '_ {
        self.order.iter().map(|&key| (key, self.entries[&key]))
    }

    pub fn insert(&mut self, key: ModelIndex, size: f64) {
        if self.entries.insert(key, size).is_none() {
            self.order.push_back(key);
        }
        self.generation += 1;
    }

    /// Remove an entry. Returns the previous size, if any.
    pub fn remove(&mut self, key: ModelIndex) -> Option<f64> {
        let removed = self.entries.remove(&key);
        if removed.is_some() {
            self.order.retain(|&k| k != key);
            self.generation += 1;
        }
        removed
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.generation += 1;
        }
        self.entries.clear();
        self.order.clear();
    }

    /// Trim to half of `cache_size` when `cache_size` is exceeded.
    ///
    /// Halving instead of evicting one entry per insert amortizes eviction
    /// and avoids a steady state of trimming on every new entry.
    pub fn trim(&mut self, cache_size: usize) {
        self.trim_to(cache_size, cache_size / 2);
    }

    /// Drop oldest-inserted entries down to `target_size`, but only when
    /// `cache_size` is exceeded. A map at or under `cache_size` is untouched.
    pub fn trim_to(&mut self, cache_size: usize, target_size: usize) {
        if self.entries.len() <= cache_size {
            return;
        }
        while self.entries.len() > target_size {
            let Some(key) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&key);
        }
        self.generation += 1;
    }
}

impl FromIterator<(ModelIndex, f64)> for SizeCache {
    fn from_iter<I: IntoIterator<Item = (ModelIndex, f64)>>(iter: I) -> Self {
        let mut cache = SizeCache::new();
        for (key, size) in iter {
            cache.insert(key, size);
        }
        cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cache_with_keys(range: std::ops::Range<usize>) -> SizeCache {
        range.map(|i| (i, i as f64)).collect()
    }

    #[test]
    fn must_get_returns_present_value() {
        let mut map = HashMap::new();
        map.insert(3usize, 7.0);
        assert_eq!(must_get(&map, 3), 7.0);
        assert_eq!(get_or(&map, 3, 0.0), 7.0);
    }

    #[test]
    #[should_panic(expected = "missing value for key 9")]
    fn must_get_panics_on_missing_key() {
        let map: HashMap<usize, f64> = HashMap::new();
        must_get(&map, 9usize);
    }

    #[test]
    fn get_or_substitutes_default() {
        let map: HashMap<usize, f64> = HashMap::new();
        assert_eq!(get_or(&map, 9, 4.5), 4.5);
    }

    #[test]
    fn trim_is_noop_below_threshold() {
        let mut cache = cache_with_keys(0..10);
        let generation = cache.generation();
        cache.trim_to(10, 5);
        assert_eq!(cache.len(), 10);
        assert_eq!(cache.generation(), generation);
        let keys: Vec<_> = cache.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn trim_drops_oldest_to_target() {
        // 11 entries with cache size 10 trims down to the newest 5.
        let mut cache = cache_with_keys(0..11);
        cache.trim_to(10, 5);
        assert_eq!(cache.len(), 5);
        let keys: Vec<_> = cache.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn trim_removes_oldest_inserted_first() {
        let mut cache = cache_with_keys(0..101);
        cache.trim_to(100, 50);
        assert_eq!(cache.len(), 50);
        for key in 0..=50 {
            assert!(!cache.contains_key(key), "key {key} should be evicted");
        }
        for key in 51..=100 {
            assert!(cache.contains_key(key), "key {key} should survive");
        }
    }

    #[test]
    fn trim_is_idempotent() {
        let mut cache = cache_with_keys(0..200);
        cache.trim_to(100, 50);
        assert_eq!(cache.len(), 50);
        let before: Vec<_> = cache.iter().collect();
        cache.trim_to(100, 50);
        assert_eq!(cache.iter().collect::<Vec<_>>(), before);
    }

    #[test]
    fn update_does_not_refresh_age() {
        let mut cache = cache_with_keys(0..4);
        cache.insert(0, 99.0);
        cache.trim_to(3, 2);
        // Key 0 keeps its original (oldest) position and is evicted.
        assert!(!cache.contains_key(0));
        assert!(cache.contains_key(2));
        assert!(cache.contains_key(3));
    }

    #[test]
    fn remove_keeps_order_consistent() {
        let mut cache = cache_with_keys(0..5);
        assert_eq!(cache.remove(2), Some(2.0));
        assert_eq!(cache.remove(2), None);
        let keys: Vec<_> = cache.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![0, 1, 3, 4]);
    }

    #[test]
    fn mutations_bump_generation() {
        let mut cache = SizeCache::new();
        let g0 = cache.generation();
        cache.insert(1, 10.0);
        let g1 = cache.generation();
        assert!(g1 > g0);
        cache.remove(1);
        assert!(cache.generation() > g1);
    }

    proptest! {
        #[test]
        fn trim_never_exceeds_target(
            count in 0usize..400,
            cache_size in 1usize..100,
        ) {
            let mut cache = cache_with_keys(0..count);
            let target = cache_size / 2;
            cache.trim_to(cache_size, target);
            if count > cache_size {
                prop_assert_eq!(cache.len(), target);
            } else {
                prop_assert_eq!(cache.len(), count);
            }
        }
    }
}
