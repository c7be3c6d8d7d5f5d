//! Auth module — session-based authentication with local credentials
//! and federated (OAuth) login.
//!
//! # Components
//!
//! - **Local strategy** — email/password verification against the user
//!   store's argon2id hashes
//! - **Federated strategy** — OAuth authorization-code exchange against
//!   configured providers, mapped onto local user records
//! - **Session manager** — opaque session ids in a TTL'd cache, carried
//!   by a signed http-only cookie
//!
//! # Usage
//!
//! ```ignore
//! use auth::{AuthModule, service::AuthConfig};
//!
//! let module = AuthModule::new(users, sessions, AuthConfig::default());
//! let router = module.routes(); // serves /auth/*
//! ```

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use authgate_core::Module;
use authgate_sessions::SessionStore;
use authgate_users::UserStore;

use crate::service::{AuthConfig, AuthService};

/// Auth module implementing the Module trait.
///
/// Holds the AuthService and provides HTTP routes for all auth endpoints.
pub struct AuthModule {
    service: Arc<AuthService>,
}

impl AuthModule {
    /// Create a new AuthModule.
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        config: AuthConfig,
    ) -> Self {
        Self {
            service: AuthService::new(users, sessions, config),
        }
    }

    /// Get a reference to the underlying AuthService.
    pub fn service(&self) -> &Arc<AuthService> {
        &self.service
    }
}

impl Module for AuthModule {
    fn name(&self) -> &str {
        "auth"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
