//! Browser storage for the session
//!
//! `window.localStorage` behind the core [`KeyValueStore`] trait. Holds no
//! JS handles, so it satisfies the trait's `Send + Sync` bound; the window
//! is looked up on every call.

use wasm_bindgen::JsValue;

use agentica::storage::{KeyValueStore, StorageError, StorageResult};

fn unavailable(err: JsValue) -> StorageError {
    StorageError::Unavailable(format!("{:?}", err))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> StorageResult<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(unavailable)?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(unavailable)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(unavailable)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        Self::storage()?
            .remove_item(key)
            .map_err(unavailable)
    }
}
