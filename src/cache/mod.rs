//! Client-side response cache keyed by resource path.
//!
//! Reads fill the cache; mutations invalidate the affected keys so the next
//! read goes back to the server of record. Entries are never merged.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;
use std::time::Instant;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(path: impl Into<String>) -> Self {
        CacheKey(path.into())
    }

    pub fn job_files(job_id: Uuid) -> Self {
        CacheKey(format!("/api/jobs/{}/files", job_id))
    }

    pub fn contact(contact_id: Uuid) -> Self {
        CacheKey(format!("/api/contacts/{}", contact_id))
    }

    pub fn contact_messages(contact_id: Uuid) -> Self {
        CacheKey(format!("/api/contacts/{}/messages", contact_id))
    }

    pub fn messages() -> Self {
        CacheKey("/api/messages".to_string())
    }

    pub fn quote(quote_id: Uuid) -> Self {
        CacheKey(format!("/api/quotes/{}", quote_id))
    }

    pub fn quote_items(quote_id: Uuid) -> Self {
        CacheKey(format!("/api/quotes/{}/items", quote_id))
    }

    /// Resource path this key caches
    pub fn path(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    stored_at: Instant,
}

#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw cached value for `key`, if any
    pub fn read(&self, key: &CacheKey) -> Option<Value> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let hit = entries.get(key).map(|entry| {
            tracing::debug!("cache hit {} (age {:?})", key, entry.stored_at.elapsed());
            entry.value.clone()
        });
        if hit.is_none() {
            tracing::debug!("cache miss {}", key);
        }
        hit
    }

    /// Cached value decoded as `T`. An entry that no longer decodes is treated as a miss.
    pub fn read_as<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        self.read(key).and_then(|value| serde_json::from_value(value).ok())
    }

    pub fn store<T: Serialize>(&self, key: CacheKey, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("not caching {}: {}", key, e);
                return;
            }
        };
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop the entry for `key`. Returns whether anything was cached.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let removed = entries.remove(key).is_some();
        tracing::debug!("invalidate {} (cached: {})", key, removed);
        removed
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
