//! In-memory blob store
//!
//! Not durable. Used by tests and by runs that should leave nothing on disk.

use std::collections::HashMap;
use std::sync::RwLock;

use super::BlobStore;
use crate::error::Result;

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing blobs
    pub fn with_blobs<I, K, V>(blobs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            blobs: RwLock::new(
                blobs
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.blobs.read().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobStore for MemoryBlobStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let blobs = self.blobs.read().unwrap_or_else(|e| e.into_inner());
        Ok(blobs.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut blobs = self.blobs.write().unwrap_or_else(|e| e.into_inner());
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store that serves seeded blobs but refuses every write
#[cfg(test)]
pub(crate) struct ReadOnlyStore(pub MemoryBlobStore);

#[cfg(test)]
impl BlobStore for ReadOnlyStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.0.load(key)
    }

    fn save(&self, key: &str, _value: &str) -> Result<()> {
        Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            format!("blob {key} is read-only"),
        )
        .into())
    }
}
