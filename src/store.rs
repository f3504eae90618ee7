//! Key-value stores for resolved icon URLs
//!
//! `KeyValueStore` is the seam: `MemoryStore` for tests and throwaway runs,
//! `JsonFileStore` for a cache that survives between runs. `IconCache` layers
//! the slug namespace on top of any store.

use crate::error::{HydrateError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Synchronous string-to-string store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store, lost when dropped
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Persistent store backed by a single JSON object file.
///
/// The file is read once on open and rewritten after every mutation.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl JsonFileStore {
    /// Default store location: ~/.cache/icon_hydrator/icon_cache.json
    pub fn default_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("icon_hydrator")
            .join("icon_cache.json")
    }

    /// Open the store at `path`, or start empty if the file is missing or unreadable
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(entries) => entries,
                    Err(e) => {
                        log::warn!("Failed to parse icon cache file, starting fresh: {}", e);
                        HashMap::new()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read icon cache file, starting fresh: {}", e);
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        log::info!(
            "Icon cache {} loaded with {} entries",
            path.display(),
            entries.len()
        );
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content)?;

        log::debug!("Saved icon cache with {} entries", self.entries.len());
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
            .map_err(|e| HydrateError::Store(format!("set {}: {}", key, e)))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_none() {
            return Ok(());
        }
        self.save()
            .map_err(|e| HydrateError::Store(format!("remove {}: {}", key, e)))
    }
}

/// Slug-keyed view over a store, every key prefixed with a namespace
#[derive(Debug)]
pub struct IconCache<S> {
    store: S,
    namespace: String,
}

impl<S: KeyValueStore> IconCache<S> {
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    /// Full store key for a slug
    pub fn key(&self, slug: &str) -> String {
        format!("{}{}", self.namespace, slug)
    }

    /// Cached icon URL for `slug`. Empty values count as missing.
    pub fn get(&self, slug: &str) -> Option<String> {
        self.store
            .get(&self.key(slug))
            .filter(|url| !url.is_empty())
    }

    pub fn insert(&mut self, slug: &str, icon_url: &str) -> Result<()> {
        let key = self.key(slug);
        self.store.set(&key, icon_url)
    }

    pub fn evict(&mut self, slug: &str) -> Result<()> {
        let key = self.key(slug);
        self.store.remove(&key)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
