//! Process-wide memory cache of outbox containers.
//!
//! The cache holds the last-known container snapshot per persistence key so
//! sequential operations on the same user skip the disk. It is purely an
//! optimization layer: every value crossing the boundary is cloned, so callers
//! can never mutate a cached snapshot in place.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::types::{OutboxContainer, OutboxKey};

static GLOBAL_CACHE: Lazy<Arc<MemoryCache>> = Lazy::new(|| Arc::new(MemoryCache::new()));

/// Keyed snapshot cache, safe for concurrent use.
///
/// Concurrent `put`s for the same key are last-writer-wins.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, OutboxContainer>>,
}

impl MemoryCache {
    /// Create an independent, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared instance that lives for the whole process.
    pub fn global() -> Arc<MemoryCache> {
        Arc::clone(&GLOBAL_CACHE)
    }

    /// Copy of the cached container for `key`, if any.
    pub fn get(&self, key: &OutboxKey) -> Option<OutboxContainer> {
        // A poisoned lock still guards a consistent map of owned snapshots.
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key.as_str()).cloned()
    }

    /// Store a copy of `container`, replacing any previous entry.
    pub fn put(&self, key: &OutboxKey, container: &OutboxContainer) {
        let snapshot = container.clone();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.as_str().to_string(), snapshot);
    }

    /// Drop the entry for `key`. Returns whether one was present.
    pub fn invalidate(&self, key: &OutboxKey) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key.as_str()).is_some()
    }

    /// Drop every entry, e.g. after the backing database was wiped.
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OutboxRecord, UserId};
    use std::thread;

    fn key(user: &str) -> OutboxKey {
        OutboxKey::for_user(&UserId::new(user).unwrap())
    }

    #[test]
    fn test_get_on_empty_cache() {
        let cache = MemoryCache::new();
        assert!(cache.get(&key("alice")).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_put_then_get() {
        let cache = MemoryCache::new();
        let container =
            OutboxContainer::with_records(vec![OutboxRecord::new("c", serde_json::json!("x"))]);
        cache.put(&key("alice"), &container);

        assert_eq!(cache.get(&key("alice")), Some(container));
        assert!(cache.get(&key("bob")).is_none());
    }

    #[test]
    fn test_caller_mutation_does_not_leak_into_cache() {
        let cache = MemoryCache::new();
        let mut container = OutboxContainer::empty();
        cache.put(&key("alice"), &container);

        // Mutate the value handed to put.
        container.records.push(OutboxRecord::new("c", serde_json::json!(1)));
        assert!(cache.get(&key("alice")).unwrap().is_empty());

        // Mutate the value handed back by get.
        let mut fetched = cache.get(&key("alice")).unwrap();
        fetched.records.push(OutboxRecord::new("c", serde_json::json!(2)));
        assert!(cache.get(&key("alice")).unwrap().is_empty());
    }

    #[test]
    fn test_last_writer_wins() {
        let cache = MemoryCache::new();
        let first = OutboxContainer::empty();
        let second =
            OutboxContainer::with_records(vec![OutboxRecord::new("c", serde_json::json!("y"))]);

        cache.put(&key("alice"), &first);
        cache.put(&key("alice"), &second);
        assert_eq!(cache.get(&key("alice")), Some(second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = MemoryCache::new();
        cache.put(&key("alice"), &OutboxContainer::empty());
        cache.put(&key("bob"), &OutboxContainer::empty());

        assert!(cache.invalidate(&key("alice")));
        assert!(!cache.invalidate(&key("alice")));
        assert!(cache.get(&key("alice")).is_none());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_global_is_shared() {
        let a = MemoryCache::global();
        let b = MemoryCache::global();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(MemoryCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let k = key(&format!("user-{}", i));
                    for n in 0..100 {
                        let records = vec![OutboxRecord::new("c", serde_json::json!(n))];
                        cache.put(&k, &OutboxContainer::with_records(records));
                        assert!(cache.get(&k).is_some());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 8);
        for i in 0..8 {
            let container = cache.get(&key(&format!("user-{}", i))).unwrap();
            assert_eq!(container.records[0].payload, serde_json::json!(99));
        }
    }
}
