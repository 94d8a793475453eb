//! Key-value persistence for preferences and the applied bundle.
//!
//! [`KeyValueStore`] is the seam to the host's storage. Values are strings;
//! structured values go through [`load_json`] / [`save_json`]. [`MemoryStore`]
//! is an in-memory backend for tests and hosts without storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

/// Key for the persisted [`AutoUpdatePreference`](crate::update::AutoUpdatePreference).
pub const AUTO_UPDATE_PREFERENCE_KEY: &str = "auto-update-preference";
/// Key for the persisted [`CurrentBundle`](crate::update::CurrentBundle).
pub const CURRENT_BUNDLE_KEY: &str = "current-bundle";
/// Key for the persisted theme preference.
pub const THEME_KEY: &str = "theme";

/// Storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend failed: {0}")]
    Backend(String),
    #[error("stored value for {key:?} is malformed: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode value for {key:?}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Asynchronous string key-value storage.
#[async_trait(?Send)]
pub trait KeyValueStore {
    /// Read a value; `None` if the key was never set or was cleared.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value; `None` clears the key.
    async fn set(&self, key: &str, value: Option<String>) -> Result<(), StoreError>;
}

#[async_trait(?Send)]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Option<String>) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }
}

/// Read and decode a JSON value.
pub async fn load_json<T: DeserializeOwned>(
    store: &(impl KeyValueStore + ?Sized),
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Malformed {
                key: key.to_owned(),
                source,
            }),
        None => Ok(None),
    }
}

/// Encode and write a JSON value; `None` clears the key.
pub async fn save_json<T: Serialize>(
    store: &(impl KeyValueStore + ?Sized),
    key: &str,
    value: Option<&T>,
) -> Result<(), StoreError> {
    let raw = value
        .map(|v| {
            serde_json::to_string(v).map_err(|source| StoreError::Encode {
                key: key.to_owned(),
                source,
            })
        })
        .transpose()?;
    store.set(key, raw).await
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value (builder).
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.get_mut().insert(key.into(), value.into());
        self
    }

    /// Snapshot a value without awaiting.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.values.try_read().ok()?.get(key).cloned()
    }
}

#[async_trait(?Send)]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Option<String>) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        match value {
            Some(v) => values.insert(key.to_owned(), v),
            None => values.remove(key),
        };
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
