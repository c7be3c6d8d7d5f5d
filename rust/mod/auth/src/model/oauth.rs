use serde::Deserialize;

/// An OAuth provider configuration, supplied by server configuration at
/// startup (no runtime mutation).
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Provider id (e.g. "google", "github").
    pub id: String,

    /// OAuth client id.
    pub client_id: String,

    /// OAuth client secret. Never serialized back out.
    pub client_secret: String,

    /// Authorization URL the browser is redirected to.
    pub auth_url: String,

    /// Token exchange URL.
    pub token_url: String,

    /// User info URL (to fetch the profile after token exchange).
    pub userinfo_url: String,

    /// OAuth scopes requested during the redirect phase.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    /// Redirect URL the provider sends the browser back to.
    pub redirect_url: String,
}

fn default_scopes() -> Vec<String> {
    vec!["profile".to_string(), "email".to_string()]
}

/// User info extracted from an OAuth provider's userinfo document.
#[derive(Debug, Clone)]
pub struct OAuthUserInfo {
    /// Provider-side user id ("sub" or "id" depending on the provider).
    pub provider_user_id: String,

    /// Display name reported by the provider.
    pub name: String,

    /// Email, if the provider shares one. Required to map the profile
    /// onto a local user record.
    pub email: Option<String>,

    pub given_name: Option<String>,
    pub family_name: Option<String>,

    /// The raw userinfo document, for logging and diagnostics.
    pub raw: serde_json::Value,
}
