use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use axum_extra::extract::cookie::CookieJar;

use authgate_core::ServiceError;

use crate::api::AppState;
use crate::model::Principal;
use crate::service::AuthError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/oauth/{provider}", get(start))
        .route("/oauth/{provider}/callback", get(callback))
}

/// Redirect to the provider's authorization URL.
/// GET /auth/oauth/{provider}
async fn start(
    State(svc): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Redirect, ServiceError> {
    let state = authgate_core::new_id();
    let url = svc
        .authorize_url(&provider, &state)
        .map_err(ServiceError::from)?;
    Ok(Redirect::temporary(&url))
}

#[derive(serde::Deserialize)]
struct CallbackParams {
    code: String,
    #[allow(dead_code)]
    #[serde(default)]
    state: String,
}

/// OAuth callback — exchange the code, map the profile, log in.
/// GET /auth/oauth/{provider}/callback?code=...&state=...
///
/// On success the browser is sent back to the client origin with the
/// session cookie set. Any failure answers 401 with a bare HTML
/// snippet — a long-standing quirk of this endpoint; the rest of the
/// API speaks JSON.
async fn callback(
    State(svc): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
    jar: CookieJar,
) -> Response {
    match run_callback(&svc, &provider, &params.code).await {
        Ok(cookie) => {
            let origin = svc.client_origin().to_string();
            (jar.add(cookie), Redirect::to(&origin)).into_response()
        }
        Err(e) => {
            tracing::warn!("oauth callback via {} failed: {}", provider, e);
            (
                StatusCode::UNAUTHORIZED,
                Html(format!("<h1>{}</h1>", e)),
            )
                .into_response()
        }
    }
}

async fn run_callback(
    svc: &AppState,
    provider: &str,
    code: &str,
) -> Result<axum_extra::extract::cookie::Cookie<'static>, AuthError> {
    let info = svc.oauth_callback(provider, code).await?;
    let user = svc.find_or_create_oauth_user(provider, &info)?;
    svc.establish_session(&Principal::from(&user))
}
