//! Session manager — opaque session ids in the session store, carried
//! by a signed http-only cookie.
//!
//! Cookie value layout: `<session id>.<base64url hmac-sha256>`. The
//! signature binds the id to the configured secret; a cookie that fails
//! verification is treated as if it were absent.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use authgate_core::new_id;

use crate::model::{Principal, SessionRecord};
use crate::service::{AuthError, AuthService, CookieSameSite};

type HmacSha256 = Hmac<Sha256>;

fn session_key(sid: &str) -> String {
    format!("sess:{}", sid)
}

impl AuthService {
    /// Establish a new session for a principal.
    ///
    /// Writes the session record with the configured TTL and returns
    /// the cookie to set on the response.
    pub fn establish_session(&self, principal: &Principal) -> Result<Cookie<'static>, AuthError> {
        let sid = new_id();
        let ttl = self.config.session_ttl_secs;
        let expires_at = chrono::Utc::now() + chrono::Duration::seconds(ttl as i64);

        let record = SessionRecord {
            principal: principal.clone(),
            expires_at: expires_at.to_rfc3339(),
        };
        let payload = serde_json::to_vec(&record)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        self.sessions.put(&session_key(&sid), &payload, ttl)?;

        let value = format!("{}.{}", sid, self.sign(&sid)?);
        Ok(self.build_cookie(value, time::Duration::seconds(ttl as i64)))
    }

    /// Resolve the principal for a request, if any.
    ///
    /// A missing cookie, a bad signature, and a missing or expired
    /// record all resolve to anonymous. Store failures are logged and
    /// also resolve to anonymous — downstream handlers decide whether
    /// anonymity is acceptable.
    pub fn resolve_session(&self, jar: &CookieJar) -> Option<Principal> {
        let cookie = jar.get(&self.config.cookie_name)?;
        let sid = self.unsign(cookie.value())?;

        let payload = match self.sessions.get(&session_key(&sid)) {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("session lookup failed: {}", e);
                return None;
            }
        };

        match serde_json::from_slice::<SessionRecord>(&payload) {
            Ok(record) => Some(record.principal),
            Err(e) => {
                tracing::warn!("discarding unreadable session record: {}", e);
                None
            }
        }
    }

    /// Destroy the session referenced by the request, if any.
    ///
    /// Idempotent: an absent cookie or an already-deleted record is
    /// still success.
    pub fn destroy_session(&self, jar: &CookieJar) -> Result<(), AuthError> {
        let Some(cookie) = jar.get(&self.config.cookie_name) else {
            return Ok(());
        };
        let Some(sid) = self.unsign(cookie.value()) else {
            return Ok(());
        };
        self.sessions.delete(&session_key(&sid))?;
        Ok(())
    }

    /// A cookie that instructs the browser to drop the session cookie.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        self.build_cookie(String::new(), time::Duration::ZERO)
    }

    fn build_cookie(&self, value: String, max_age: time::Duration) -> Cookie<'static> {
        let mut builder = Cookie::build((self.config.cookie_name.clone(), value))
            .path("/")
            .http_only(true)
            .max_age(max_age);
        if self.config.cookie_secure {
            builder = builder.secure(true);
        }
        if let Some(same_site) = self.config.cookie_same_site {
            builder = builder.same_site(match same_site {
                CookieSameSite::Strict => SameSite::Strict,
                CookieSameSite::Lax => SameSite::Lax,
                CookieSameSite::None => SameSite::None,
            });
        }
        builder.build()
    }

    fn sign(&self, sid: &str) -> Result<String, AuthError> {
        let mut mac = HmacSha256::new_from_slice(self.config.session_secret.as_bytes())
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        mac.update(sid.as_bytes());
        Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
    }

    /// Split and verify a signed cookie value. None on any mismatch.
    fn unsign(&self, value: &str) -> Option<String> {
        let (sid, signature) = value.split_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;

        let mut mac = HmacSha256::new_from_slice(self.config.session_secret.as_bytes()).ok()?;
        mac.update(sid.as_bytes());
        mac.verify_slice(&signature).ok()?;

        Some(sid.to_string())
    }
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::cookie::{Cookie, CookieJar};

    use authgate_users::Role;

    use crate::model::Principal;
    use crate::service::testutil::{test_service, test_service_with};
    use crate::service::AuthConfig;

    fn principal() -> Principal {
        Principal {
            id: "user-1".to_string(),
            role: Role::User,
        }
    }

    fn jar_with(cookie: Cookie<'static>) -> CookieJar {
        CookieJar::new().add(cookie)
    }

    #[test]
    fn test_establish_then_resolve() {
        let svc = test_service();

        let cookie = svc.establish_session(&principal()).unwrap();
        assert_eq!(cookie.name(), "qid");
        assert!(cookie.http_only().unwrap_or(false));
        assert_eq!(cookie.path(), Some("/"));

        let resolved = svc.resolve_session(&jar_with(cookie)).unwrap();
        assert_eq!(resolved.id, "user-1");
        assert_eq!(resolved.role, Role::User);
    }

    #[test]
    fn test_missing_cookie_is_anonymous() {
        let svc = test_service();
        assert!(svc.resolve_session(&CookieJar::new()).is_none());
    }

    #[test]
    fn test_tampered_cookie_is_anonymous() {
        let svc = test_service();
        let cookie = svc.establish_session(&principal()).unwrap();

        let forged = Cookie::new("qid", format!("{}x", cookie.value()));
        assert!(svc.resolve_session(&jar_with(forged)).is_none());

        let unsigned = Cookie::new("qid", "some-session-id");
        assert!(svc.resolve_session(&jar_with(unsigned)).is_none());
    }

    #[test]
    fn test_destroy_terminates_session() {
        let svc = test_service();
        let cookie = svc.establish_session(&principal()).unwrap();
        let jar = jar_with(cookie);

        svc.destroy_session(&jar).unwrap();
        assert!(svc.resolve_session(&jar).is_none());
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let svc = test_service();
        let cookie = svc.establish_session(&principal()).unwrap();
        let jar = jar_with(cookie);

        svc.destroy_session(&jar).unwrap();
        svc.destroy_session(&jar).unwrap();
        svc.destroy_session(&CookieJar::new()).unwrap();
    }

    #[test]
    fn test_expired_session_resolves_like_no_session() {
        let config = AuthConfig {
            session_ttl_secs: 0,
            ..Default::default()
        };
        let svc = test_service_with(config);

        let cookie = svc.establish_session(&principal()).unwrap();
        assert!(svc.resolve_session(&jar_with(cookie)).is_none());
    }

    #[test]
    fn test_secret_mismatch_rejects_cookie() {
        let svc_a = test_service_with(AuthConfig {
            session_secret: "secret-a".to_string(),
            ..Default::default()
        });
        let svc_b = test_service_with(AuthConfig {
            session_secret: "secret-b".to_string(),
            ..Default::default()
        });

        let cookie = svc_a.establish_session(&principal()).unwrap();
        assert!(svc_b.resolve_session(&jar_with(cookie)).is_none());
    }

    #[test]
    fn test_removal_cookie_clears_value() {
        let svc = test_service();
        let removal = svc.removal_cookie();
        assert_eq!(removal.name(), "qid");
        assert_eq!(removal.value(), "");
        assert_eq!(removal.max_age(), Some(time::Duration::ZERO));
    }
}
