/*!
 * Translation caching functionality.
 *
 * This module provides the persistent translation cache that keeps the
 * pipeline idempotent: a line that was already translated in a previous run
 * (or earlier in this one) is never sent to the backend again.
 *
 * The cache is keyed by the *protected* line, i.e. the text after placeholder
 * tokens were substituted and before the backend saw it.
 */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;

use crate::file_utils::FileManager;

/// Cache key for a protected line of text
pub fn cache_key(protected: &str) -> String {
    protected.to_string()
}

/// Translation cache for storing and retrieving translations
#[derive(Debug, Clone, Default)]
pub struct TranslationCache {
    /// Protected source text -> translated text (tokens still in place)
    entries: BTreeMap<String, String>,

    /// Durable location, if any
    path: Option<PathBuf>,
}

impl TranslationCache {
    /// Create an empty in-memory cache with no backing file
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a cache from disk.
    ///
    /// Never fails: a missing path, a missing file or a file that is not a
    /// JSON object all yield an empty cache bound to `path`.
    pub fn load(path: Option<&Path>) -> Self {
        let mut cache = Self {
            entries: BTreeMap::new(),
            path: path.map(Path::to_path_buf),
        };

        let Some(path) = path else {
            return cache;
        };

        if !path.exists() {
            debug!("No cache file at {:?}, starting cold", path);
            return cache;
        }

        let parsed = std::fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str::<Value>(&content).ok());

        match parsed {
            Some(Value::Object(map)) => {
                for (key, value) in map {
                    let value = match value {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    cache.entries.insert(key, value);
                }
                debug!("Loaded {} cached translations from {:?}", cache.entries.len(), path);
            }
            _ => debug!("Ignoring unreadable cache file {:?}", path),
        }

        cache
    }

    /// Get a translation from the cache
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Store a translation in the cache
    pub fn insert(&mut self, key: impl Into<String>, translation: impl Into<String>) {
        self.entries.insert(key.into(), translation.into());
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Backing file, if configured
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Persist to the configured file. No-op when the cache has no backing file.
    pub fn save(&self) -> std::io::Result<()> {
        match &self.path {
            Some(path) => self.save_to(path),
            None => Ok(()),
        }
    }

    /// Persist to `path` atomically: a sibling temp file is written, flushed
    /// and renamed over the destination.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        FileManager::write_atomic(path, &json)?;

        debug!("Saved {} cached translations to {:?}", self.entries.len(), path);
        Ok(())
    }
}
