use crate::error::{KvError, Result};
use crate::types::Entry;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// In-memory key/value map guarded by a reader/writer lock.
///
/// Writers (`put`) take the lock exclusively; readers (`get`, `snapshot`)
/// share it. Every operation releases the lock before returning, so callers
/// never hold it across a network call.
#[derive(Debug, Default)]
pub struct Store {
    data: RwLock<HashMap<String, String>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`. Empty keys are rejected without touching
    /// the map.
    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() {
            return Err(KvError::InvalidKey);
        }
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Current value for `key`, or `""` when the key was never written.
    ///
    /// An absent key and a key explicitly set to `""` look the same here.
    pub fn get(&self, key: &str) -> String {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        data.get(key).cloned().unwrap_or_default()
    }

    /// Copy of every entry as of the moment the read lock was granted.
    /// Order is unspecified.
    pub fn snapshot(&self) -> Vec<Entry> {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        data.iter()
            .map(|(k, v)| Entry::new(k.clone(), v.clone()))
            .collect()
    }

    /// Lazy iterator over a point-in-time copy; the lock is already released
    /// when the first item is yielded.
    pub fn list_all(&self) -> impl Iterator<Item = Entry> {
        self.snapshot().into_iter()
    }

    pub fn len(&self) -> usize {
        self.data.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
