use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use spots_types::Component;
use tracing::{debug, warn};

use crate::error::StoreResult;
use crate::traits::{validate_key, ComponentCache};

const EXTENSION: &str = "json";

/// Component cache that keeps one pretty-printed JSON file per key.
///
/// Writes go to a sibling temporary file that is renamed into place, so a
/// reader never sees a half-written entry.
#[derive(Clone, Debug)]
pub struct FileComponentCache {
    root: PathBuf,
}

impl FileComponentCache {
    /// Open a cache rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "opened component cache");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file that backs `key`.
    pub fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.{EXTENSION}")))
    }

    /// Sorted list of cached keys.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_key(stem).is_ok() {
                    keys.push(stem.to_owned());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

impl ComponentCache for FileComponentCache {
    fn load(&self, key: &str) -> StoreResult<Option<Component>> {
        let path = self.path_for(key)?;
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let component = Component::from_json(&json).inspect_err(|err| {
            warn!(key, error = %err, "cached component is unreadable");
        })?;
        debug!(key, items = component.len(), "loaded cached component");
        Ok(Some(component))
    }

    fn save(&self, key: &str, component: &Component) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
        fs::write(&tmp, component.to_json()?)?;
        fs::rename(&tmp, &path)?;
        debug!(key, items = component.len(), "saved component");
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.path_for(key)?.is_file())
    }
}
