use spots_types::Component;

use crate::error::{StoreError, StoreResult};

/// Keyed persistence for components.
///
/// Implementations must be safe to share between threads. Saving under an
/// existing key replaces the previous entry.
pub trait ComponentCache: Send + Sync {
    /// Load the component stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored there.
    fn load(&self, key: &str) -> StoreResult<Option<Component>>;

    /// Store `component` under `key`.
    fn save(&self, key: &str, component: &Component) -> StoreResult<()>;

    /// Remove the entry under `key`. Returns `true` if it existed.
    fn remove(&self, key: &str) -> StoreResult<bool>;

    /// Check whether an entry exists under `key`.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.load(key)?.is_some())
    }
}

/// Accept ASCII letters, digits, `-`, `_`, and `.`, but not a leading dot.
pub fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_owned()))
    }
}
