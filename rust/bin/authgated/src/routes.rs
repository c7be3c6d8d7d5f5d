//! Route registration — module routes + system endpoints + CORS.

use axum::http::{header, HeaderValue, Method};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

/// Build the complete router with all routes.
///
/// Module routes are already `Router<()>` (they called `.with_state()`
/// internally) and already rooted at their final paths.
pub fn build_router(module_routes: Vec<(&str, Router)>, cors: CorsLayer) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    for (name, router) in module_routes {
        tracing::debug!("mounting {} module routes", name);
        app = app.merge(router);
    }

    app.layer(cors)
}

/// CORS for the browser client: one allowed origin, with credentials so
/// the session cookie rides along.
pub fn cors_layer(client_origin: &str) -> anyhow::Result<CorsLayer> {
    let origin: HeaderValue = client_origin
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid client_origin '{}': {}", client_origin, e))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true))
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "authgated",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
