use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use spots_apply::{ApplyConfig, RendererRegistry};
use spots_store::FileComponentCache;

use crate::error::{SdkError, SdkResult};

/// Settings shared by every [`Spot`](crate::Spot) a host creates.
///
/// ```toml
/// default_kind = "text"
/// match_key = "id"
/// cache_dir = "/var/cache/spots"
///
/// [apply]
/// stale_policy = "revalidate"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotsConfig {
    /// Renderer kind used for items whose kind has no registered renderer.
    pub default_kind: Option<String>,
    /// Meta key carrying a stable item identity. When unset, items are
    /// correlated by content.
    pub match_key: Option<String>,
    /// Directory for cached components. No caching when unset.
    pub cache_dir: Option<PathBuf>,
    pub apply: ApplyConfig,
}

impl SpotsConfig {
    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Read a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// An empty renderer registry carrying the configured default kind.
    pub fn registry(&self) -> RendererRegistry {
        let mut registry = RendererRegistry::new();
        if let Some(kind) = &self.default_kind {
            registry.set_default_kind(kind.as_str());
        }
        registry
    }

    /// Open the file cache, if a cache directory is configured.
    pub fn open_cache(&self) -> SdkResult<Option<FileComponentCache>> {
        match &self.cache_dir {
            Some(dir) => Ok(Some(FileComponentCache::open(dir)?)),
            None => Ok(None),
        }
    }
}
