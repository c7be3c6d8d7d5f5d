//! Federated strategy — OAuth authorization-code flow against the
//! configured providers.
//!
//! Two phases: build the authorization redirect (no local state), then
//! on callback exchange the code for a token, fetch the userinfo
//! document, and map the profile onto a local user record by email.

use authgate_users::{NewUser, Role, User};

use crate::model::{OAuthUserInfo, ProviderConfig};
use crate::service::{AuthError, AuthService};

impl AuthService {
    fn provider(&self, provider_id: &str) -> Result<&ProviderConfig, AuthError> {
        self.config
            .providers
            .get(provider_id)
            .ok_or_else(|| AuthError::NotFound(format!("unknown provider '{}'", provider_id)))
    }

    /// Build the OAuth authorization URL for a provider.
    /// The caller redirects the user's browser to this URL.
    pub fn authorize_url(&self, provider_id: &str, state: &str) -> Result<String, AuthError> {
        let provider = self.provider(provider_id)?;

        let scopes = provider.scopes.join(" ");
        let url = format!(
            "{}?client_id={}&redirect_uri={}&scope={}&state={}&response_type=code",
            provider.auth_url,
            urlencoded(&provider.client_id),
            urlencoded(&provider.redirect_url),
            urlencoded(&scopes),
            urlencoded(state),
        );

        Ok(url)
    }

    /// Exchange an OAuth authorization code for the provider's userinfo.
    ///
    /// This performs:
    /// 1. POST to token_url to exchange code for access_token
    /// 2. GET to userinfo_url to fetch the user profile
    pub async fn oauth_callback(
        &self,
        provider_id: &str,
        code: &str,
    ) -> Result<OAuthUserInfo, AuthError> {
        let provider = self.provider(provider_id)?.clone();

        // Step 1: Exchange code for token
        let client = reqwest::Client::new();
        let token_resp = client
            .post(&provider.token_url)
            .header("accept", "application/json")
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", &provider.client_id),
                ("client_secret", &provider.client_secret),
                ("redirect_uri", &provider.redirect_url),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Internal(format!("token exchange failed: {}", e)))?;

        if !token_resp.status().is_success() {
            let status = token_resp.status();
            let body = token_resp.text().await.unwrap_or_default();
            return Err(AuthError::Unauthorized(format!(
                "token exchange returned {}: {}",
                status, body
            )));
        }

        let token_json: serde_json::Value = token_resp
            .json()
            .await
            .map_err(|e| AuthError::Internal(format!("token response parse failed: {}", e)))?;

        let access_token = token_json["access_token"]
            .as_str()
            .ok_or_else(|| AuthError::Unauthorized("missing access_token in response".into()))?;

        // Step 2: Fetch user info
        let userinfo_resp = client
            .get(&provider.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Internal(format!("userinfo fetch failed: {}", e)))?;

        if !userinfo_resp.status().is_success() {
            let status = userinfo_resp.status();
            let body = userinfo_resp.text().await.unwrap_or_default();
            return Err(AuthError::Unauthorized(format!(
                "userinfo returned {}: {}",
                status, body
            )));
        }

        let userinfo: serde_json::Value = userinfo_resp
            .json()
            .await
            .map_err(|e| AuthError::Internal(format!("userinfo parse failed: {}", e)))?;

        Ok(extract_user_info(&userinfo))
    }

    /// Map a federated profile onto a local user record.
    ///
    /// Find-or-create keyed by email: a returning user resolves to the
    /// existing record, a first-time user gets one created with no
    /// local password. A profile the provider shares no email for
    /// cannot be mapped and fails.
    pub fn find_or_create_oauth_user(
        &self,
        provider_id: &str,
        info: &OAuthUserInfo,
    ) -> Result<User, AuthError> {
        let Some(email) = info.email.as_deref().filter(|e| !e.is_empty()) else {
            return Err(AuthError::Unauthorized(format!(
                "{} account has no email to link",
                provider_id
            )));
        };

        if let Some(user) = self.users.find_by_email(email)? {
            return Ok(user);
        }

        let name = if info.name.is_empty() {
            // Fall back to the mailbox name so the unique name column
            // gets a usable value.
            email.split('@').next().unwrap_or(email).to_string()
        } else {
            info.name.clone()
        };

        let user = self.users.create(NewUser {
            email: email.to_string(),
            name,
            first_name: info.given_name.clone().unwrap_or_default(),
            last_name: info.family_name.clone().unwrap_or_default(),
            password_hash: None,
            role: Role::User,
        })?;

        tracing::info!("created user {} from {} profile", user.id, provider_id);
        Ok(user)
    }
}

/// Extract the fields we care about from a userinfo document.
/// Providers disagree on field names, so probe the common spellings.
fn extract_user_info(userinfo: &serde_json::Value) -> OAuthUserInfo {
    let provider_user_id = userinfo["sub"]
        .as_str()
        .map(|s| s.to_string())
        .or_else(|| userinfo["id"].as_str().map(|s| s.to_string()))
        .or_else(|| userinfo["id"].as_i64().map(|id| id.to_string()))
        .unwrap_or_else(|| "unknown".to_string());

    let name = userinfo["name"]
        .as_str()
        .or_else(|| userinfo["login"].as_str())
        .or_else(|| userinfo["display_name"].as_str())
        .unwrap_or_default()
        .to_string();

    OAuthUserInfo {
        provider_user_id,
        name,
        email: userinfo["email"].as_str().map(|s| s.to_string()),
        given_name: userinfo["given_name"].as_str().map(|s| s.to_string()),
        family_name: userinfo["family_name"].as_str().map(|s| s.to_string()),
        raw: userinfo.clone(),
    }
}

/// Percent-encoding for query parameters.
fn urlencoded(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => result.push(ch),
            ' ' => result.push('+'),
            _ => {
                let mut buf = [0u8; 4];
                let encoded = ch.encode_utf8(&mut buf);
                for byte in encoded.bytes() {
                    result.push('%');
                    result.push_str(&format!("{:02X}", byte));
                }
            }
        }
    }
    result
}
