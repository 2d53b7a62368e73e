use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use mdag_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::traits::KvStore;

/// In-memory, HashMap-based key-value store.
///
/// Intended for tests and embedding. Values are held behind a `RwLock` and
/// cloned on read. Every `put` call is counted, including overwrites, so
/// callers can observe whether a `has` guard suppressed a write.
pub struct InMemoryKvStore {
    values: RwLock<HashMap<ObjectId, Vec<u8>>>,
    puts: AtomicUsize,
}

impl InMemoryKvStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            puts: AtomicUsize::new(0),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.values.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.values.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored values.
    pub fn total_bytes(&self) -> u64 {
        self.values
            .read()
            .expect("lock poisoned")
            .values()
            .map(|v| v.len() as u64)
            .sum()
    }

    /// Number of `put` calls received so far.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Sorted list of all keys in the store.
    pub fn keys(&self) -> Vec<ObjectId> {
        let map = self.values.read().expect("lock poisoned");
        let mut keys: Vec<ObjectId> = map.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for InMemoryKvStore {
    fn has(&self, key: &ObjectId) -> StoreResult<bool> {
        let map = self.values.read().expect("lock poisoned");
        Ok(map.contains_key(key))
    }

    fn get(&self, key: &ObjectId) -> StoreResult<Vec<u8>> {
        let map = self.values.read().expect("lock poisoned");
        map.get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.clone()))
    }

    fn put(&self, key: &ObjectId, value: &[u8]) -> StoreResult<()> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        self.puts.fetch_add(1, Ordering::SeqCst);
        let mut map = self.values.write().expect("lock poisoned");
        // Same key means same content, last writer wins.
        map.insert(key.clone(), value.to_vec());
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKvStore")
            .field("key_count", &self.len())
            .field("put_count", &self.put_count())
            .finish()
    }
}
