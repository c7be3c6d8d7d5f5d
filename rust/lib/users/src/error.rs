use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserStoreError {
    /// A UNIQUE constraint rejected the write (duplicate email or name).
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
