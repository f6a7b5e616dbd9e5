//! The parts of an inbound request the proxy decides on.

use axum::http::{HeaderValue, Method};

#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: Method,

    /// Raw request path, still percent-encoded.
    pub path: String,

    /// Value of the `token` query parameter.
    pub token: Option<String>,

    /// Value of the `If-None-Match` header.
    pub if_none_match: Option<HeaderValue>,
}

impl ProxyRequest {
    /// Object key addressed by this request: the path minus one leading `/`.
    pub fn object_key(&self) -> &str {
        self.path.strip_prefix('/').unwrap_or(&self.path)
    }
}
