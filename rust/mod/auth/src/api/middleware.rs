use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;

use authgate_core::ServiceError;

use crate::api::AppState;

/// Paths that refuse anonymous requests outright. Everything else
/// passes through — logout in particular must work without a session.
const PROTECTED_PATHS: &[&str] = &["/auth/me", "/auth/session"];

/// Session-resolution middleware.
///
/// Reads the session cookie and, when it resolves, stores the Principal
/// as a request extension for handlers to pick up via
/// `Extension<Principal>`. Anonymous requests to protected paths are
/// answered 401 here so handlers can rely on the extension existing.
pub async fn session_middleware(
    State(svc): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(req.headers());

    match svc.resolve_session(&jar) {
        Some(principal) => {
            req.extensions_mut().insert(principal);
        }
        None => {
            if is_protected(req.uri().path()) {
                return ServiceError::Unauthorized("not authenticated".to_string())
                    .into_response();
            }
        }
    }

    next.run(req).await
}

fn is_protected(path: &str) -> bool {
    PROTECTED_PATHS.contains(&path)
}
