//! Replicated key-value store, mutated only by decided operations.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::operation::{OpKind, Operation};

/// One node's copy of the replicated map.
///
/// Reads go straight to the map and may be stale relative to in-flight
/// decisions; writes arrive only through the learner's decide path.
#[derive(Debug, Default)]
pub struct Store {
    map: RwLock<HashMap<String, String>>,
}

impl Store {
    /// Value for `key`, if present locally.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.map.read().unwrap().get(key).cloned()
    }

    /// Local membership check.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.read().unwrap().contains_key(key)
    }

    /// Apply a decided operation. A delete of an absent key is a no-op
    /// that still counts as a successful decision.
    ///
    /// # Panics
    /// Panics on a put without a value, which cannot be constructed
    /// through [`Operation::put`].
    pub fn apply(&self, operation: &Operation) {
        let mut map = self.map.write().unwrap();
        match operation.kind {
            OpKind::Put => {
                let value = operation
                    .value
                    .clone()
                    .expect("put operation carries a value");
                map.insert(operation.key.clone(), value);
            }
            OpKind::Delete => {
                map.remove(&operation.key);
            }
        }
    }
}
