//! Storage port for the access layer.
//!
//! Every collection lives under one key as a JSON array. Callers always
//! round-trip the whole collection: read it, mutate it, write it back. There
//! is no locking, so two writers racing on the same key lose updates (last
//! write wins).

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend failed: {0}")]
    Backend(#[from] rusqlite::Error),
    #[error("collection {key} is corrupt: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
    #[error("failed to encode collection {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
    #[error("storage quota exceeded writing {key} ({needed} bytes, {available} available)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Named collections. The key strings are the persisted namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Students,
    Attendance,
    Exams,
    Marks,
    Notices,
    Fees,
}

impl Collection {
    pub fn key(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Students => "students",
            Collection::Attendance => "attendance",
            Collection::Exams => "exams",
            Collection::Marks => "marks",
            Collection::Notices => "notices",
            Collection::Fees => "fees",
        }
    }
}

pub const SESSION_TOKEN_KEY: &str = "session-token";

/// Missing key reads as an empty collection.
pub fn read_collection<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    collection: Collection,
) -> Result<Vec<T>, StoreError> {
    let key = collection.key();
    let Some(raw) = store.get(key)? else {
        tracing::debug!(key, "collection absent; reading as empty");
        return Ok(Vec::new());
    };
    let items: Vec<T> = serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
        key: key.to_string(),
        source,
    })?;
    tracing::debug!(key, len = items.len(), "collection read");
    Ok(items)
}

pub fn write_collection<T: Serialize>(
    store: &mut dyn KeyValueStore,
    collection: Collection,
    items: &[T],
) -> Result<(), StoreError> {
    let key = collection.key();
    let raw = serde_json::to_string(items).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)?;
    tracing::debug!(key, len = items.len(), "collection written");
    Ok(())
}

/// Process-local backend for tests and `SCHOOLD_IN_MEMORY` runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that refuses writes once the stored values would exceed
    /// `bytes` in total, the way a browser's local storage does.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(bytes),
        }
    }

    fn used_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(_, v)| v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let available = quota.saturating_sub(self.used_excluding(key));
            if value.len() > available {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed: value.len(),
                    available,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
