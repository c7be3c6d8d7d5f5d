use axum::extract::{Extension, State};
use axum::routing::get;
use axum::{Json, Router};

use authgate_core::ServiceError;

use crate::api::AppState;
use crate::model::Principal;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/session", get(current_session))
        .route("/me", get(me))
}

/// GET /auth/session — the authenticated principal, if any.
///
/// The middleware answers 401 before this handler when no session
/// resolves.
async fn current_session(Extension(principal): Extension<Principal>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "user": principal,
    }))
}

/// GET /auth/me — the full user record for the current session.
///
/// 404 when the principal's user id no longer exists in the store.
/// The record is returned as stored, password hash and all.
async fn me(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user = svc.get_user(&principal.id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({"data": user})))
}
