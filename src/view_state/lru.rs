//! Fixed-capacity least-recently-used map.
//!
//! Recency is tracked with a monotonic access stamp per entry and a queue of
//! `(key, stamp)` access records. Eviction pops records from the front of the
//! queue and only removes an entry when the popped stamp is still that entry's
//! latest access, so the entry removed is always the least recently used one.
//!
//! Hits only append to the queue; it is rebuilt from the live entries once it
//! grows past a multiple of the capacity so memory stays bounded.

use std::borrow::Borrow;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Access records kept per live entry before the queue is compacted.
const QUEUE_SLACK: usize = 4;

#[derive(Debug, Clone)]
struct Slot<V> {
    value: V,
    last_used: u64,
}

/// Bounded map evicting the least recently used entry on overflow.
#[derive(Debug, Clone)]
pub struct LruMap<K, V> {
    capacity: usize,
    clock: u64,
    entries: HashMap<K, Slot<V>>,
    queue: VecDeque<(K, u64)>,
}

impl<K: Hash + Eq + Clone, V> LruMap<K, V> {
    /// Create an empty map holding at most `capacity` entries.
    ///
    /// A capacity of zero disables storage: inserts are dropped immediately.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            clock: 0,
            entries: HashMap::with_capacity(capacity.min(1024)),
            queue: VecDeque::new(),
        }
    }

    /// Maximum number of entries retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `key` is present. Does not count as a use.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Look up `key`, marking it most recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let stamp = self.bump_clock();
        self.entries.get_mut(key)?.last_used = stamp;
        let stored_key = self.entries.get_key_value(key)?.0.clone();
        self.queue.push_back((stored_key, stamp));
        self.compact_if_needed();
        self.entries.get(key).map(|slot| &slot.value)
    }

    /// Insert or replace `key`, marking it most recently used.
    ///
    /// Evicts least recently used entries while over capacity.
    pub fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        let stamp = self.bump_clock();
        self.queue.push_back((key.clone(), stamp));
        self.entries.insert(
            key,
            Slot {
                value,
                last_used: stamp,
            },
        );
        self.evict_if_needed();
        self.compact_if_needed();
    }

    /// Return the cached value for `key`, computing and inserting it on a miss.
    ///
    /// Errors from `load` are returned and nothing is inserted.
    pub fn get_or_try_insert_with<E>(&mut self, key: &K, load: impl FnOnce() -> Result<V, E>) -> Result<V, E>
    where
        V: Clone,
    {
        if let Some(value) = self.get(key) {
            return Ok(value.clone());
        }
        let value = load()?;
        self.insert(key.clone(), value.clone());
        Ok(value)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.queue.clear();
        self.clock = 0;
    }

    fn bump_clock(&mut self) -> u64 {
        let stamp = self.clock;
        self.clock = self.clock.wrapping_add(1);
        stamp
    }

    fn evict_if_needed(&mut self) {
        while self.entries.len() > self.capacity {
            let Some((key, stamp)) = self.queue.pop_front() else {
                break;
            };
            if self
                .entries
                .get(&key)
                .is_some_and(|slot| slot.last_used == stamp)
            {
                self.entries.remove(&key);
            }
        }
    }

    fn compact_if_needed(&mut self) {
        if self.queue.len() <= self.capacity.max(1) * QUEUE_SLACK {
            return;
        }
        let mut live: Vec<(K, u64)> = self
            .entries
            .iter()
            .map(|(key, slot)| (key.clone(), slot.last_used))
            .collect();
        live.sort_by_key(|(_, stamp)| *stamp);
        self.queue = live.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_map_is_empty() {
        let map: LruMap<String, f64> = LruMap::new(4);
        assert!(map.is_empty());
        assert_eq!(map.capacity(), 4);
    }

    #[test]
    fn insert_and_get() {
        let mut map = LruMap::new(4);
        map.insert("a".to_string(), 1.0);
        assert_eq!(map.get("a"), Some(&1.0));
        assert_eq!(map.get("b"), None);
    }

    #[test]
    fn insert_overwrites_existing_key() {
        let mut map = LruMap::new(4);
        map.insert("a".to_string(), 1);
        map.insert("a".to_string(), 2);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a"), Some(&2));
    }

    #[test]
    fn eviction_removes_least_recently_inserted() {
        let mut map = LruMap::new(3);
        map.insert(1, "one");
        map.insert(2, "two");
        map.insert(3, "three");
        map.insert(4, "four");

        assert_eq!(map.len(), 3, "Map should stay at capacity");
        assert!(!map.contains(&1), "1 should be evicted");
        assert!(map.contains(&2));
        assert!(map.contains(&3));
        assert!(map.contains(&4));
    }

    #[test]
    fn get_refreshes_recency() {
        let mut map = LruMap::new(3);
        map.insert(1, "one");
        map.insert(2, "two");
        map.insert(3, "three");

        // Touch 1 so 2 becomes the oldest.
        map.get(&1);
        map.insert(4, "four");

        assert!(map.contains(&1), "1 was recently used");
        assert!(!map.contains(&2), "2 should be evicted");
        assert!(map.contains(&3));
        assert!(map.contains(&4));
    }

    #[test]
    fn reinsert_refreshes_recency() {
        let mut map = LruMap::new(2);
        map.insert(1, 'a');
        map.insert(2, 'b');
        map.insert(1, 'c');
        map.insert(3, 'd');
        assert!(map.contains(&1));
        assert!(!map.contains(&2));
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let mut map = LruMap::new(0);
        map.insert(1, 1);
        assert!(map.is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let mut map = LruMap::new(4);
        map.insert(1, 1);
        map.insert(2, 2);
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.get(&1), None);
    }

    #[test]
    fn repeated_hits_keep_queue_bounded() {
        let mut map = LruMap::new(2);
        map.insert(1, 1);
        map.insert(2, 2);
        for _ in 0..1000 {
            map.get(&1);
        }
        assert!(map.queue.len() <= 2 * QUEUE_SLACK);
        // Recency survives compaction.
        map.insert(3, 3);
        assert!(map.contains(&1));
        assert!(!map.contains(&2));
    }

    #[test]
    fn get_or_try_insert_with_loads_once() {
        let mut map = LruMap::new(4);
        let mut loads = 0;
        for _ in 0..3 {
            let v: Result<i32, ()> = map.get_or_try_insert_with(&"k", || {
                loads += 1;
                Ok(7)
            });
            assert_eq!(v, Ok(7));
        }
        assert_eq!(loads, 1);
    }

    #[test]
    fn get_or_try_insert_with_does_not_cache_errors() {
        let mut map: LruMap<&str, i32> = LruMap::new(4);
        let v = map.get_or_try_insert_with(&"k", || Err("boom"));
        assert_eq!(v, Err("boom"));
        assert!(!map.contains("k"));
    }
}
