//! Server configuration — one TOML file, loaded and verified at
//! startup, then handed to the stores and the auth module by reference.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use auth::model::ProviderConfig;
use auth::service::{AuthConfig, CookieSameSite, IdentifierField};

/// Server configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address for the HTTP server.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Where the browser is sent after a successful OAuth callback.
    #[serde(default = "default_client_origin")]
    pub client_origin: String,

    pub storage: StorageConfig,

    pub session: SessionConfig,

    /// OAuth providers.
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Base directory for the user database and session cache.
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Secret used to sign session cookies.
    pub secret: String,

    /// Session lifetime in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    #[serde(default)]
    pub cookie_secure: bool,

    /// "strict", "lax" or "none"; unset omits the attribute.
    #[serde(default)]
    pub cookie_same_site: Option<String>,

    /// Which user field login matches: "email" or "name".
    #[serde(default = "default_identifier_field")]
    pub identifier_field: String,
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_client_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_ttl_secs() -> u64 {
    86400
}

fn default_cookie_name() -> String {
    "qid".to_string()
}

fn default_identifier_field() -> String {
    "email".to_string()
}

impl ServerConfig {
    /// Resolve a context name to a config path.
    ///
    /// A bare name resolves to `/etc/authgate/<name>.toml`; anything
    /// containing a `/` or `.` is used as a path directly.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(format!("/etc/authgate/{}.toml", name_or_path))
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Verify the configuration is ready for use. Refuses to start the
    /// server on an empty secret or data dir.
    pub fn verify(&self) -> anyhow::Result<()> {
        if self.session.secret.is_empty() {
            anyhow::bail!("session secret is empty in configuration");
        }
        if self.storage.data_dir.is_empty() {
            anyhow::bail!("storage data_dir is empty in configuration");
        }
        for provider in &self.providers {
            if provider.id.is_empty() || provider.client_id.is_empty() {
                anyhow::bail!("provider entry missing id or client_id");
            }
        }
        // Fail fast on values to_auth_config would reject.
        self.parse_same_site()?;
        self.parse_identifier_field()?;
        Ok(())
    }

    /// Build the auth module's configuration.
    pub fn to_auth_config(&self) -> anyhow::Result<AuthConfig> {
        let providers = self
            .providers
            .iter()
            .map(|p| (p.id.clone(), p.clone()))
            .collect();

        Ok(AuthConfig {
            session_secret: self.session.secret.clone(),
            session_ttl_secs: self.session.ttl_secs,
            cookie_name: self.session.cookie_name.clone(),
            cookie_secure: self.session.cookie_secure,
            cookie_same_site: self.parse_same_site()?,
            client_origin: self.client_origin.clone(),
            identifier_field: self.parse_identifier_field()?,
            providers,
        })
    }

    fn parse_same_site(&self) -> anyhow::Result<Option<CookieSameSite>> {
        match self.session.cookie_same_site.as_deref() {
            None => Ok(None),
            Some("strict") => Ok(Some(CookieSameSite::Strict)),
            Some("lax") => Ok(Some(CookieSameSite::Lax)),
            Some("none") => Ok(Some(CookieSameSite::None)),
            Some(other) => anyhow::bail!("invalid cookie_same_site '{}'", other),
        }
    }

    fn parse_identifier_field(&self) -> anyhow::Result<IdentifierField> {
        match self.session.identifier_field.as_str() {
            "email" => Ok(IdentifierField::Email),
            "name" => Ok(IdentifierField::Name),
            other => anyhow::bail!("invalid identifier_field '{}'", other),
        }
    }
}
