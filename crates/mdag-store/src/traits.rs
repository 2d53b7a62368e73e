use mdag_types::ObjectId;

use crate::error::StoreResult;

/// Synchronous key-value store keyed by content address.
///
/// All implementations must satisfy these invariants:
/// - A value written under a key is never mutated afterwards.
/// - `put` of an existing key with the same value is harmless.
/// - `get` of a missing key fails with `StoreError::NotFound`.
/// - Once `put` returns, `has` and `get` observe the key.
pub trait KvStore: Send + Sync {
    /// Check whether a value is stored under `key`.
    fn has(&self, key: &ObjectId) -> StoreResult<bool>;

    /// Fetch the value stored under `key`.
    fn get(&self, key: &ObjectId) -> StoreResult<Vec<u8>>;

    /// Store `value` under `key`.
    fn put(&self, key: &ObjectId, value: &[u8]) -> StoreResult<()>;
}

/// Write `value` under `key` unless the key is already present.
///
/// Returns `true` when a write happened.
pub fn put_if_absent(store: &dyn KvStore, key: &ObjectId, value: &[u8]) -> StoreResult<bool> {
    if store.has(key)? {
        return Ok(false);
    }
    store.put(key, value)?;
    Ok(true)
}
