use std::collections::HashMap;
use std::sync::RwLock;

use spots_types::Component;

use crate::error::StoreResult;
use crate::traits::{validate_key, ComponentCache};

/// In-memory, HashMap-based component cache.
///
/// Components are cloned on load and save.
pub struct InMemoryComponentCache {
    entries: RwLock<HashMap<String, Component>>,
}

impl InMemoryComponentCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached components.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().expect("lock poisoned").clear();
    }

    /// Sorted list of cached keys.
    pub fn keys(&self) -> Vec<String> {
        let map = self.entries.read().expect("lock poisoned");
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for InMemoryComponentCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentCache for InMemoryComponentCache {
    fn load(&self, key: &str) -> StoreResult<Option<Component>> {
        validate_key(key)?;
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    fn save(&self, key: &str, component: &Component) -> StoreResult<()> {
        validate_key(key)?;
        let mut map = self.entries.write().expect("lock poisoned");
        map.insert(key.to_owned(), component.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        validate_key(key)?;
        let mut map = self.entries.write().expect("lock poisoned");
        Ok(map.remove(key).is_some())
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        validate_key(key)?;
        Ok(self.entries.read().expect("lock poisoned").contains_key(key))
    }
}

impl std::fmt::Debug for InMemoryComponentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryComponentCache")
            .field("entries", &self.len())
            .finish()
    }
}
