use serde::{Deserialize, Serialize};

use authgate_users::{Role, User};

/// The minimal authenticated identity carried in a session.
///
/// Derived from a User at login time; everything else about the user is
/// re-read from the user store when needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// User id.
    pub id: String,

    /// Role at the time the session was established.
    pub role: Role,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            role: user.role,
        }
    }
}

/// The server-side session record, serialized into the session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub principal: Principal,

    /// RFC 3339 timestamp when this session expires. The store enforces
    /// the actual TTL; this field documents it for inspection.
    pub expires_at: String,
}
