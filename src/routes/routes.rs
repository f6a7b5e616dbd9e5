//! Defines the single proxy route.
//!
//! ## Structure
//! - `GET|HEAD /{*key}?token=...` — stream the object stored under `key`
//! - `OPTIONS  /{*key}` — CORS preflight
//! - anything else — 405
//!
//! Every path, including `/`, goes to the same handler so that method, auth
//! and empty-key rejections all carry CORS headers.

use crate::{handlers::proxy_handlers::serve_object, state::AppState};
use axum::{Router, body::Body, http::Request};
use tower_http::trace::TraceLayer;
use tracing::info_span;
use uuid::Uuid;

/// Build the router with shared state and request tracing.
pub fn app(state: AppState) -> Router {
    routes().with_state(state).layer(
        // The query string carries the token; only the path goes into spans.
        TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            info_span!(
                "request",
                id = %Uuid::new_v4(),
                method = %request.method(),
                path = %request.uri().path(),
            )
        }),
    )
}

/// Build and return the router carrying `AppState` to the proxy handler.
pub fn routes() -> Router<AppState> {
    Router::new().fallback(serve_object)
}
