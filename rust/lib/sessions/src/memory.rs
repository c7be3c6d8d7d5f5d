use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::SessionStoreError;
use crate::traits::{decode_record, encode_record, SessionStore};

/// MemorySessionStore keeps records in a HashMap behind a Mutex.
///
/// Same envelope and expiry semantics as the redb backend; intended for
/// tests and single-process development runs.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a record, treating anything expired at `now` as absent.
    pub fn get_at(&self, key: &str, now: i64) -> Result<Option<Vec<u8>>, SessionStoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| SessionStoreError::Storage(e.to_string()))?;

        let Some(raw) = entries.get(key) else {
            return Ok(None);
        };

        let (expires_at, payload) = decode_record(raw)?;
        if expires_at <= now {
            entries.remove(key);
            return Ok(None);
        }
        Ok(Some(payload))
    }
}

impl SessionStore for MemorySessionStore {
    fn put(&self, key: &str, value: &[u8], ttl_secs: u64) -> Result<(), SessionStoreError> {
        let expires_at = chrono::Utc::now().timestamp() + ttl_secs as i64;
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| SessionStoreError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), encode_record(expires_at, value));
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, SessionStoreError> {
        self.get_at(key, chrono::Utc::now().timestamp())
    }

    fn delete(&self, key: &str) -> Result<(), SessionStoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| SessionStoreError::Storage(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_and_delete() {
        let store = MemorySessionStore::new();

        store.put("sess:abc", b"payload", 60).unwrap();
        assert_eq!(store.get("sess:abc").unwrap().unwrap(), b"payload");

        store.delete("sess:abc").unwrap();
        assert!(store.get("sess:abc").unwrap().is_none());
        store.delete("sess:abc").unwrap();
    }

    #[test]
    fn test_expiry_matches_redb_semantics() {
        let store = MemorySessionStore::new();

        store.put("sess:abc", b"payload", 60).unwrap();
        let far_future = chrono::Utc::now().timestamp() + 3600;
        assert!(store.get_at("sess:abc", far_future).unwrap().is_none());
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let store = MemorySessionStore::new();

        store.put("sess:abc", b"payload", 0).unwrap();
        assert!(store.get("sess:abc").unwrap().is_none());
    }
}
