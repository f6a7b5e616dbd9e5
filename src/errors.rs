use crate::{handlers::headers::apply_cors, services::store::StoreError};
use axum::{
    body::Body,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Every way a proxy request can end without serving the object.
///
/// All variants render as a bare status with CORS headers and no body, so
/// nothing about the failure reaches the client.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("method `{0}` is not allowed")]
    MethodNotAllowed(Method),
    #[error("missing or invalid token")]
    Unauthorized,
    #[error("request path does not name an object")]
    EmptyKey,
    #[error("object `{0}` not found")]
    NotFound(String),
    #[error("object store lookup for `{key}` failed: {source}")]
    Store {
        key: String,
        #[source]
        source: StoreError,
    },
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::Unauthorized => StatusCode::UNAUTHORIZED,
            ProxyError::EmptyKey | ProxyError::NotFound(_) => StatusCode::NOT_FOUND,
            ProxyError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = self.status();
        apply_cors(response.headers_mut());
        response
    }
}
