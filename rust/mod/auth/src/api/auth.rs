use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::CookieJar;

use authgate_core::ServiceError;

use crate::api::AppState;
use crate::model::{LoginRequest, Principal, RegisterRequest};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/login/failed", get(login_failed))
        .route("/logout", post(logout))
}

/// POST /auth/register — create an account and log it in.
async fn register(
    State(svc): State<AppState>,
    jar: CookieJar,
    Json(input): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<serde_json::Value>), ServiceError> {
    let user = svc.register(input).map_err(ServiceError::from)?;
    let cookie = svc
        .establish_session(&Principal::from(&user))
        .map_err(ServiceError::from)?;
    Ok((jar.add(cookie), Json(serde_json::json!({"success": true}))))
}

/// POST /auth/login — local credential login.
async fn login(
    State(svc): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginRequest>,
) -> Result<(CookieJar, Json<serde_json::Value>), ServiceError> {
    let principal = svc
        .authenticate_local(&input.identifier, &input.password)
        .map_err(ServiceError::from)?;
    let cookie = svc
        .establish_session(&principal)
        .map_err(ServiceError::from)?;
    Ok((jar.add(cookie), Json(serde_json::json!({"success": true}))))
}

/// POST /auth/logout — destroy the session.
///
/// Succeeds whether or not a session exists; only an operational store
/// failure surfaces, as a 400.
async fn logout(
    State(svc): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<serde_json::Value>), ServiceError> {
    svc.destroy_session(&jar)
        .map_err(|_| ServiceError::Validation("error while logging out".to_string()))?;
    Ok((
        jar.add(svc.removal_cookie()),
        Json(serde_json::json!({"success": true})),
    ))
}

/// GET /auth/login/failed — failure sink for aborted login redirects.
async fn login_failed() -> ServiceError {
    ServiceError::Unauthorized("error while logging".to_string())
}
