//! Store implementation
//!
//! HashMap-based table with RwLock for concurrency.

use std::collections::HashMap;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::error::{FlintError, Result};
use super::Item;

/// Concurrent key-value table
///
/// ## Concurrency:
/// - `get` takes the read lock; readers never block each other
/// - `set` takes the write lock once and holds it across the CAS check and
///   the mutation, so two writers can never both pass the check against
///   the same version
pub struct Store {
    items: RwLock<HashMap<Vec<u8>, Item>>,
}

impl Store {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    /// Get a copy of the item stored under `key` (read lock)
    pub fn get(&self, key: &[u8]) -> Option<Item> {
        self.items.read().get(key).cloned()
    }

    /// Insert or update `key` (write lock)
    ///
    /// With `cas == 0` the write is unconditional. Otherwise it only
    /// succeeds if `cas` equals the stored item's current version.
    /// A zero `expiry` keeps the stored expiry on update.
    ///
    /// Returns the item's new CAS value.
    pub fn set(
        &self,
        key: &[u8],
        value: Bytes,
        flags: u32,
        expiry: u32,
        cas: u64,
    ) -> Result<u64> {
        let mut items = self.items.write();

        match items.get_mut(key) {
            Some(item) => {
                if cas != 0 && item.cas != cas {
                    return Err(FlintError::CasMismatch);
                }
                item.value = value;
                item.flags = flags;
                if expiry > 0 {
                    item.expiry = expiry;
                }
                item.cas += 1;
                Ok(item.cas)
            }
            None => {
                if cas != 0 {
                    return Err(FlintError::KeyNotFound);
                }
                let item = Item::new(value, flags, expiry);
                let new_cas = item.cas;
                items.insert(key.to_vec(), item);
                Ok(new_cas)
            }
        }
    }

    /// Get the number of stored keys
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Check if the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
