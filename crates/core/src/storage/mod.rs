//! Persistence layer for Gatepass
//!
//! State is kept as whole JSON snapshots under fixed keys. [`Database`]
//! keeps them in SQLite; [`MemoryBlobStore`] keeps them in memory.

mod blobs;
mod memory;
mod migrations;
mod traits;

use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, instrument};

use crate::error::Result;

pub use blobs::BlobTable;
pub use memory::MemoryBlobStore;
#[cfg(test)]
pub(crate) use memory::ReadOnlyStore;
pub use traits::BlobStore;

/// Blob key of the session snapshot
pub const SESSION_KEY: &str = "visitor-auth";

/// Blob key of the invitation collection snapshot
pub const INVITATIONS_KEY: &str = "visitor-invitations";

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(mut conn: Connection) -> Result<Self> {
        migrations::run_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    pub fn schema_version(&self) -> Result<u32> {
        migrations::current_version(&self.conn)
    }

    /// Get the blob table
    pub fn blobs(&self) -> BlobTable<'_> {
        BlobTable::new(&self.conn)
    }
}

impl BlobStore for Database {
    #[instrument(skip(self))]
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.blobs().get(key)
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.blobs().put(key, value)?;
        debug!("Blob saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_schema_version() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.schema_version().unwrap(), 1);
    }

    #[test]
    fn test_blobs_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gatepass.db");

        {
            let db = Database::open(&path).unwrap();
            db.save(INVITATIONS_KEY, r#"{"invitations":[]}"#).unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(
            db.load(INVITATIONS_KEY).unwrap().as_deref(),
            Some(r#"{"invitations":[]}"#)
        );
        assert!(db.load(SESSION_KEY).unwrap().is_none());
    }
}
