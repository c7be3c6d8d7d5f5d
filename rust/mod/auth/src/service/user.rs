//! Registration and user lookups.

use authgate_users::{NewUser, User, UserStoreError};

use crate::model::RegisterRequest;
use crate::service::password::hash_password;
use crate::service::{AuthError, AuthService};

impl AuthService {
    /// Register a new user.
    ///
    /// The existence pre-check gives the common duplicate case its
    /// answer without paying for a hash; the UNIQUE constraint on the
    /// user table is the source of truth, so a racing insert that slips
    /// past the pre-check still comes back as the same conflict.
    pub fn register(&self, input: RegisterRequest) -> Result<User, AuthError> {
        if self
            .users
            .find_by_email_or_name(&input.email, &input.name)?
            .is_some()
        {
            return Err(AuthError::Conflict("user name/email taken".to_string()));
        }

        let password_hash = hash_password(&input.password)
            .map_err(|e| AuthError::Internal(format!("password hashing failed: {}", e)))?;

        let user = self
            .users
            .create(NewUser {
                email: input.email,
                name: input.name,
                first_name: input.first_name,
                last_name: input.last_name,
                password_hash: Some(password_hash),
                role: input.role.unwrap_or_default(),
            })
            .map_err(|e| match e {
                UserStoreError::Conflict(_) => {
                    AuthError::Conflict("user name/email taken".to_string())
                }
                other => other.into(),
            })?;

        Ok(user)
    }

    /// Load the full user record for a principal id.
    pub fn get_user(&self, id: &str) -> Result<User, AuthError> {
        self.users
            .find_by_id(id)?
            .ok_or_else(|| AuthError::NotFound("user not found".to_string()))
    }
}
