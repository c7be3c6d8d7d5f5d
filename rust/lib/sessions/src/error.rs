use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionStoreError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("corrupt session record: {0}")]
    Corrupt(String),
}
