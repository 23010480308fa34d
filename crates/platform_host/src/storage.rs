//! Key/value preference storage backing the catalog and settings services.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Storage key holding the installed application list.
pub const APPS_PREFS_KEY: &str = "desktop.apps.v1";
/// Storage key holding the shell settings.
pub const SETTINGS_PREFS_KEY: &str = "desktop.settings.v1";

/// Object-safe boxed future returned by [`PrefsStore`] methods.
pub type PrefsStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures raised while reading or writing stored preferences.
pub enum StorageError {
    /// The underlying backend rejected the operation.
    #[error("storage backend failed: {0}")]
    Backend(String),
    /// A stored value could not be encoded or decoded.
    #[error("stored value is malformed: {0}")]
    Codec(String),
}

/// Host storage for JSON text values addressed by key.
pub trait PrefsStore {
    /// Loads the raw JSON stored under `key`.
    fn load_raw<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, StorageError>>;

    /// Replaces the raw JSON stored under `key`.
    fn save_raw<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), StorageError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Store that remembers nothing. Used on hosts without local storage.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_raw<'a>(
        &'a self,
        _key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, StorageError>> {
        Box::pin(async { Ok(None) })
    }

    fn save_raw<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store. Clones share the same backing map.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryPrefsStore {
    /// Seeds `key` with a raw value, bypassing encoding.
    pub fn seed(&self, key: &str, raw_json: &str) {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), raw_json.to_string());
    }

    /// Returns the raw value stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_raw<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, StorageError>> {
        Box::pin(async move { Ok(self.raw(key)) })
    }

    fn save_raw<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.seed(key, raw_json);
            Ok(())
        })
    }
}

/// Loads and decodes a typed value.
///
/// # Errors
///
/// Returns [`StorageError::Codec`] when the stored JSON does not decode into `T`.
pub async fn load_typed<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.load_raw(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| StorageError::Codec(e.to_string()))
}

/// Encodes and saves a typed value.
///
/// # Errors
///
/// Returns an error when encoding or the backend write fails.
pub async fn save_typed<S: PrefsStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Codec(e.to_string()))?;
    store.save_raw(key, &raw).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn memory_store_clones_share_values() {
        let store = MemoryPrefsStore::default();
        let alias = store.clone();
        block_on(save_typed(&store, "k", &vec![1, 2, 3])).expect("save");
        let loaded: Option<Vec<i32>> = block_on(load_typed(&alias, "k")).expect("load");
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }

    #[test]
    fn malformed_value_reports_codec_error() {
        let store = MemoryPrefsStore::default();
        store.seed("k", "{not json");
        let err = block_on(load_typed::<_, Vec<i32>>(&store, "k")).unwrap_err();
        assert!(matches!(err, StorageError::Codec(_)));
    }

    #[test]
    fn noop_store_forgets_writes() {
        let store = NoopPrefsStore;
        let store_obj: &dyn PrefsStore = &store;
        block_on(store_obj.save_raw("k", "[]")).expect("save");
        assert_eq!(block_on(store_obj.load_raw("k")).expect("load"), None);
    }
}
