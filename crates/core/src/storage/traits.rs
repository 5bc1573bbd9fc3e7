//! Storage traits
//!
//! The stores only ever need whole-snapshot load and save by key, so any
//! backend that can hold a string per key (SQLite, memory, a future
//! platform keychain) can sit behind [`BlobStore`].

use std::rc::Rc;

use crate::error::Result;

/// Key-value store of serialized snapshots
pub trait BlobStore {
    /// Load the blob stored under `key`
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the blob stored under `key`
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

// Sharing one backend between the session store and the invitation repository

impl<T: BlobStore + ?Sized> BlobStore for &T {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }
}

impl<T: BlobStore + ?Sized> BlobStore for Rc<T> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }
}
