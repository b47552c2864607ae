//! Bounded least-recently-used store.
//!
//! Entries live in a slot arena threaded by a doubly-linked recency list
//! (head = most recent, tail = least recent) and are indexed by a
//! `HashMap<String, usize>`. Every operation is O(1). Slots are never
//! freed: once the cache is full, the tail slot is recycled in place for
//! the incoming key.

use std::collections::HashMap;

use super::CacheError;

struct Slot<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Fixed-capacity LRU map from string keys to values.
///
/// ```rust
/// # use huginn::cache::LruCache;
/// let mut cache = LruCache::new(2);
/// cache.put("a", 1);
/// cache.put("b", 2);
/// cache.get("a").unwrap();
/// cache.put("c", 3); // evicts "b", the least recently used
/// assert!(cache.has("a"));
/// assert!(!cache.has("b"));
/// ```
pub struct LruCache<V> {
    capacity: usize,
    index: HashMap<String, usize>,
    slots: Vec<Slot<V>>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<V> LruCache<V> {
    /// Create an empty cache holding at most `capacity` entries.
    ///
    /// A zero-capacity cache accepts `put` calls but never stores anything.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            index: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Whether `key` is present. Does not affect recency.
    pub fn has(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Look up `key` and promote it to most-recently-used.
    pub fn get(&mut self, key: &str) -> Result<&V, CacheError> {
        let idx = *self
            .index
            .get(key)
            .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
        self.promote(idx);
        Ok(&self.slots[idx].value)
    }

    /// Insert or overwrite `key`, making it the most-recently-used entry.
    ///
    /// When a new key arrives at capacity, the least-recently-used entry is
    /// evicted and its key returned.
    pub fn put(&mut self, key: impl Into<String>, value: V) -> Option<String> {
        let key = key.into();
        if self.capacity == 0 {
            return None;
        }

        if let Some(&idx) = self.index.get(&key) {
            self.slots[idx].value = value;
            self.promote(idx);
            return None;
        }

        if self.index.len() >= self.capacity {
            if let Some(idx) = self.tail {
                self.detach(idx);
                let evicted = std::mem::replace(&mut self.slots[idx].key, key.clone());
                self.slots[idx].value = value;
                self.index.remove(&evicted);
                self.index.insert(key, idx);
                self.attach_front(idx);
                return Some(evicted);
            }
        }

        let idx = self.slots.len();
        self.slots.push(Slot {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        self.index.insert(key, idx);
        self.attach_front(idx);
        None
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.head = None;
        self.tail = None;
    }

    /// Keys ordered from most- to least-recently used.
    pub fn keys_by_recency(&self) -> Vec<&str> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            keys.push(self.slots[idx].key.as_str());
            cursor = self.slots[idx].next;
        }
        keys
    }

    fn promote(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.detach(idx);
        self.attach_front(idx);
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }
        self.slots[idx].prev = None;
        self.slots[idx].next = None;
    }

    fn attach_front(&mut self, idx: usize) {
        self.slots[idx].prev = None;
        self.slots[idx].next = self.head;
        if let Some(h) = self.head {
            self.slots[h].prev = Some(idx);
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }
}
