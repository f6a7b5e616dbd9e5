//! HTTP handler for `/{*key}?token=...`.
//! Gates the request, looks the object up once, and streams the body back
//! without buffering it in memory.

use crate::{
    config::ProxyConfig,
    errors::ProxyError,
    handlers::headers::{apply_cors, set_object_headers},
    models::request::ProxyRequest,
    services::store::ObjectStore,
    state::AppState,
};
use axum::{
    body::Body,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

/// First value of the `token` query parameter; later repeats are ignored.
fn first_token(pairs: Vec<(String, String)>) -> Option<String> {
    pairs
        .into_iter()
        .find_map(|(name, value)| (name == "token").then_some(value))
}

/// Every method on every path lands here; the method gate lives in `handle`.
pub async fn serve_object(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
    headers: HeaderMap,
) -> Response {
    let request = ProxyRequest {
        method,
        path: uri.path().to_string(),
        token: query.ok().and_then(|Query(pairs)| first_token(pairs)),
        if_none_match: headers.get(header::IF_NONE_MATCH).cloned(),
    };

    match handle(request, &state.config, state.store.as_ref()).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Turn one request into one response. Each gate returns early.
pub async fn handle(
    request: ProxyRequest,
    config: &ProxyConfig,
    store: &dyn ObjectStore,
) -> Result<Response, ProxyError> {
    if request.method == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors(response.headers_mut());
        return Ok(response);
    }
    if request.method != Method::GET && request.method != Method::HEAD {
        return Err(ProxyError::MethodNotAllowed(request.method));
    }

    let authorized = request
        .token
        .as_deref()
        .is_some_and(|token| config.auth_token.matches(token));
    if !authorized {
        debug!(path = %request.path, "rejected request with missing or invalid token");
        return Err(ProxyError::Unauthorized);
    }

    let key = request.object_key();
    if key.is_empty() {
        return Err(ProxyError::EmptyKey);
    }

    let object = match store.get(key).await {
        Ok(Some(object)) => object,
        Ok(None) => return Err(ProxyError::NotFound(key.to_string())),
        Err(source) => {
            let err = ProxyError::Store {
                key: key.to_string(),
                source,
            };
            error!(error = %err, "object store lookup failed");
            return Err(err);
        }
    };

    let mut headers = HeaderMap::new();
    set_object_headers(&mut headers, key, &object);

    let not_modified = request
        .if_none_match
        .as_ref()
        .is_some_and(|candidate| candidate.as_bytes() == object.etag.as_bytes());

    let (status, body) = if not_modified {
        (StatusCode::NOT_MODIFIED, Body::empty())
    } else if request.method == Method::HEAD {
        (StatusCode::OK, Body::empty())
    } else {
        (StatusCode::OK, Body::from_stream(object.body))
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
