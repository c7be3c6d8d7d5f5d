pub mod local;
pub mod oauth;
pub mod password;
pub mod session;
pub mod user;

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use authgate_sessions::{SessionStore, SessionStoreError};
use authgate_users::{UserStore, UserStoreError};

use crate::model::ProviderConfig;

/// Auth service error type.
///
/// Strategies and the session manager return these; the API layer maps
/// them onto HTTP statuses via `authgate_core::ServiceError`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Storage(String),

    #[error("{0}")]
    Internal(String),
}

impl From<AuthError> for authgate_core::ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::NotFound(m) => authgate_core::ServiceError::NotFound(m),
            AuthError::Conflict(m) => authgate_core::ServiceError::Conflict(m),
            AuthError::Validation(m) => authgate_core::ServiceError::Validation(m),
            AuthError::Unauthorized(m) => authgate_core::ServiceError::Unauthorized(m),
            AuthError::Storage(m) => authgate_core::ServiceError::Storage(m),
            AuthError::Internal(m) => authgate_core::ServiceError::Internal(m),
        }
    }
}

impl From<UserStoreError> for AuthError {
    fn from(e: UserStoreError) -> Self {
        match e {
            UserStoreError::Conflict(m) => AuthError::Conflict(m),
            UserStoreError::Storage(m) => AuthError::Storage(m),
            UserStoreError::Serialization(m) => AuthError::Internal(m),
        }
    }
}

impl From<SessionStoreError> for AuthError {
    fn from(e: SessionStoreError) -> Self {
        match e {
            SessionStoreError::Storage(m) => AuthError::Storage(m),
            SessionStoreError::Corrupt(m) => AuthError::Internal(m),
        }
    }
}

/// Which user field the local strategy matches the login identifier
/// against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierField {
    #[default]
    Email,
    Name,
}

/// Cookie SameSite attribute. `None` in the config means the attribute
/// is omitted entirely (the permissive default).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieSameSite {
    Strict,
    Lax,
    None,
}

/// Configuration for the auth service, built once at startup.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret used to sign the session cookie value.
    pub session_secret: String,

    /// Session lifetime in seconds (default: 24h).
    pub session_ttl_secs: u64,

    /// Session cookie name.
    pub cookie_name: String,

    /// Whether the cookie is restricted to TLS. Off by default.
    pub cookie_secure: bool,

    /// SameSite attribute; omitted when unset.
    pub cookie_same_site: Option<CookieSameSite>,

    /// Where the browser is sent after a successful OAuth callback.
    pub client_origin: String,

    /// Which user field `login` matches its identifier against.
    pub identifier_field: IdentifierField,

    /// OAuth providers by id.
    pub providers: HashMap<String, ProviderConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_secret: "authgate-dev-secret-change-me".to_string(),
            session_ttl_secs: 86400, // 24h
            cookie_name: "qid".to_string(),
            cookie_secure: false,
            cookie_same_site: None,
            client_origin: "http://localhost:3000".to_string(),
            identifier_field: IdentifierField::Email,
            providers: HashMap::new(),
        }
    }
}

/// The Auth service. Holds the store collaborators and configuration.
pub struct AuthService {
    pub(crate) users: Arc<dyn UserStore>,
    pub(crate) sessions: Arc<dyn SessionStore>,
    pub(crate) config: AuthConfig,
}

impl AuthService {
    /// Create a new AuthService.
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        config: AuthConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            users,
            sessions,
            config,
        })
    }

    /// The configured client origin (OAuth post-login redirect target).
    pub fn client_origin(&self) -> &str {
        &self.config.client_origin
    }
}
