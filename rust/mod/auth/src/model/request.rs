use serde::Deserialize;

use authgate_users::Role;

/// Request body for POST /auth/register.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Optional role override; defaults to USER.
    #[serde(default)]
    pub role: Option<Role>,
}

/// Request body for POST /auth/login.
///
/// `identifier` is matched against the field the service is configured
/// with (email by default, display name optionally).
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}
