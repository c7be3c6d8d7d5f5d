//! Local strategy — verifies an identifier/password pair against the
//! user store.

use crate::model::Principal;
use crate::service::password::verify_password;
use crate::service::{AuthError, AuthService, IdentifierField};

impl AuthService {
    /// Verify local credentials, resolving to a Principal.
    ///
    /// A missing user and a wrong password produce distinct failures
    /// ("no such user" vs "invalid credentials"), so the response leaks
    /// whether the identifier exists. That matches the deployed
    /// behavior; collapsing the two is a hardening change that must be
    /// made deliberately, together with its tests.
    pub fn authenticate_local(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<Principal, AuthError> {
        let user = match self.config.identifier_field {
            IdentifierField::Email => self.users.find_by_email(identifier)?,
            IdentifierField::Name => self.users.find_by_name(identifier)?,
        };

        let Some(user) = user else {
            return Err(AuthError::NotFound("no such user".to_string()));
        };

        let verified = user
            .password_hash
            .as_deref()
            .is_some_and(|hash| verify_password(password, hash));
        if !verified {
            return Err(AuthError::Unauthorized("invalid credentials".to_string()));
        }

        Ok(Principal::from(&user))
    }
}
