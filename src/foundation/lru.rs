use std::{
    collections::{HashMap, VecDeque},
    hash::Hash,
};

/// Bounded map that evicts the least recently used key once `capacity` is exceeded.
///
/// Recency is updated by [`LruCache::get`] and [`LruCache::insert`]; `peek`-style reads do not
/// count as a use.
#[derive(Clone, Debug)]
pub(crate) struct LruCache<K, V> {
    entries: HashMap<K, V>,
    lru: VecDeque<K>,
    capacity: usize,
}

impl<K: Clone + Eq + Hash, V> LruCache<K, V> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn get(&mut self, key: &K) -> Option<&V> {
        if self.entries.contains_key(key) {
            self.touch(key.clone());
        }
        self.entries.get(key)
    }

    pub(crate) fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Insert or replace `key`, returning whatever was evicted to stay within capacity.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Vec<(K, V)> {
        self.entries.insert(key.clone(), value);
        self.touch(key);

        let mut evicted = Vec::new();
        while self.lru.len() > self.capacity {
            if let Some(old) = self.lru.pop_front()
                && let Some(v) = self.entries.remove(&old)
            {
                evicted.push((old, v));
            }
        }
        evicted
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        if let Some(pos) = self.lru.iter().position(|x| x == key) {
            self.lru.remove(pos);
        }
        self.entries.remove(key)
    }

    /// Keys from least to most recently used.
    pub(crate) fn keys_lru_order(&self) -> Vec<K> {
        self.lru.iter().cloned().collect()
    }

    fn touch(&mut self, key: K) {
        if let Some(pos) = self.lru.iter().position(|x| *x == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/lru.rs"]
mod tests;
