use crate::error::UserStoreError;
use crate::model::{NewUser, User};

/// UserStore persists user records in a relational backend.
///
/// Uniqueness of `email` and `name` is a store-level guarantee:
/// [`UserStore::create`] returns [`UserStoreError::Conflict`] when either
/// collides, which makes it the single source of truth under concurrent
/// registration. Existence pre-checks are an optimization only.
pub trait UserStore: Send + Sync {
    /// Insert a new user, assigning id and timestamps.
    fn create(&self, input: NewUser) -> Result<User, UserStoreError>;

    /// Look up a user by id. Returns None if the id does not exist.
    fn find_by_id(&self, id: &str) -> Result<Option<User>, UserStoreError>;

    /// Look up a user by email.
    fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError>;

    /// Look up a user by display name.
    fn find_by_name(&self, name: &str) -> Result<Option<User>, UserStoreError>;

    /// Look up a user matching either email or name. Used as the
    /// registration existence pre-check.
    fn find_by_email_or_name(
        &self,
        email: &str,
        name: &str,
    ) -> Result<Option<User>, UserStoreError>;
}
