//! Persistent Key-Value Storage
//!
//! The session store persists three string keys. Where they live depends on
//! the platform:
//!
//! - [`MemoryStore`]: process memory (tests, throwaway sessions)
//! - [`FileStore`]: a JSON file under the user's data directory (native)
//! - `LocalStorage` in the browser crate: `window.localStorage`
//!
//! All backends are synchronous; callers never hold a lock across an await.

mod error;
#[cfg(feature = "native")]
mod file;
mod memory;

pub use error::{StorageError, StorageResult};
#[cfg(feature = "native")]
pub use file::FileStore;
pub use memory::MemoryStore;

/// A string-keyed, string-valued persistent store
pub trait KeyValueStore: Send + Sync {
    /// Read a key, `None` when absent
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a key, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}
