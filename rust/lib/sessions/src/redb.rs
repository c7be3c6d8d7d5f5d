use std::path::Path;
use std::sync::Arc;

use redb::{Database, TableDefinition};

use crate::error::SessionStoreError;
use crate::traits::{decode_record, encode_record, SessionStore};

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");

/// RedbSessionStore is a SessionStore implementation backed by redb — a
/// pure-Rust embedded key-value database.
///
/// Expiry is lazy: `get` compares the record's expiry against the clock
/// and reaps stale entries on the way out.
pub struct RedbSessionStore {
    db: Arc<Database>,
}

impl RedbSessionStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, SessionStoreError> {
        let db = Database::create(path).map_err(|e| SessionStoreError::Storage(e.to_string()))?;

        // Ensure the table exists by doing a write transaction.
        let write_txn = db
            .begin_write()
            .map_err(|e| SessionStoreError::Storage(e.to_string()))?;
        {
            let _table = write_txn
                .open_table(TABLE)
                .map_err(|e| SessionStoreError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| SessionStoreError::Storage(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Read a record, treating anything expired at `now` as absent.
    /// Exposed for deterministic expiry tests; `get` passes the clock.
    pub fn get_at(&self, key: &str, now: i64) -> Result<Option<Vec<u8>>, SessionStoreError> {
        let raw = {
            let read_txn = self
                .db
                .begin_read()
                .map_err(|e| SessionStoreError::Storage(e.to_string()))?;
            let table = read_txn
                .open_table(TABLE)
                .map_err(|e| SessionStoreError::Storage(e.to_string()))?;

            match table.get(key) {
                Ok(Some(val)) => val.value().to_vec(),
                Ok(None) => return Ok(None),
                Err(e) => return Err(SessionStoreError::Storage(e.to_string())),
            }
        };

        let (expires_at, payload) = decode_record(&raw)?;
        if expires_at <= now {
            // Reap the stale record; a failure here only delays cleanup.
            if let Err(e) = self.delete(key) {
                tracing::warn!("failed to reap expired session {}: {}", key, e);
            }
            return Ok(None);
        }
        Ok(Some(payload))
    }
}

impl SessionStore for RedbSessionStore {
    fn put(&self, key: &str, value: &[u8], ttl_secs: u64) -> Result<(), SessionStoreError> {
        let expires_at = chrono::Utc::now().timestamp() + ttl_secs as i64;
        let record = encode_record(expires_at, value);

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| SessionStoreError::Storage(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| SessionStoreError::Storage(e.to_string()))?;
            table
                .insert(key, record.as_slice())
                .map_err(|e| SessionStoreError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| SessionStoreError::Storage(e.to_string()))?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, SessionStoreError> {
        self.get_at(key, chrono::Utc::now().timestamp())
    }

    fn delete(&self, key: &str) -> Result<(), SessionStoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| SessionStoreError::Storage(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| SessionStoreError::Storage(e.to_string()))?;
            table
                .remove(key)
                .map_err(|e| SessionStoreError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| SessionStoreError::Storage(e.to_string()))?;
        Ok(())
    }
}
