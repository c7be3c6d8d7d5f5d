use crate::error::SessionStoreError;

/// SessionStore is a shared keyed cache holding serialized session
/// payloads with a per-record TTL.
///
/// Keys follow a namespaced convention (`sess:<id>`). An expired record
/// is indistinguishable from a missing one: `get` returns `None` for
/// both, so callers never observe a stale session.
pub trait SessionStore: Send + Sync {
    /// Write a record that expires `ttl_secs` seconds from now,
    /// replacing any previous value for the key.
    fn put(&self, key: &str, value: &[u8], ttl_secs: u64) -> Result<(), SessionStoreError>;

    /// Get the value for a key. Returns None if the key does not exist
    /// or its TTL has elapsed.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, SessionStoreError>;

    /// Delete a key. Deleting an absent key is not an error.
    fn delete(&self, key: &str) -> Result<(), SessionStoreError>;
}

// ── Record envelope ─────────────────────────────────────────────────
//
// Stored value layout: 8-byte big-endian unix expiry, then the payload.
// Both backends share this so records stay portable between them.

pub(crate) fn encode_record(expires_at: i64, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + payload.len());
    buf.extend_from_slice(&expires_at.to_be_bytes());
    buf.extend_from_slice(payload);
    buf
}

pub(crate) fn decode_record(raw: &[u8]) -> Result<(i64, Vec<u8>), SessionStoreError> {
    if raw.len() < 8 {
        return Err(SessionStoreError::Corrupt(format!(
            "record too short: {} bytes",
            raw.len()
        )));
    }
    let mut header = [0u8; 8];
    header.copy_from_slice(&raw[..8]);
    Ok((i64::from_be_bytes(header), raw[8..].to_vec()))
}
