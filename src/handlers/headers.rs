//! Response headers shared by every proxy response.

use crate::{models::object::StoredObject, services::content_type::infer_content_type};
use axum::http::{HeaderMap, HeaderValue, header};

pub const CACHE_CONTROL_IMMUTABLE: &str = "public, max-age=31536000, immutable";
pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type";

/// Insert the CORS headers every response carries, including errors.
pub fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
}

/// Headers for a found object: content type, caching, validator, length, CORS.
///
/// `Content-Length` is sent whenever the store reports a size, so an empty
/// object gets `Content-Length: 0` rather than no header at all.
pub fn set_object_headers(headers: &mut HeaderMap, key: &str, object: &StoredObject) {
    let content_type = object
        .content_type
        .as_deref()
        .and_then(|declared| HeaderValue::from_str(declared).ok())
        .unwrap_or_else(|| HeaderValue::from_static(infer_content_type(key)));
    headers.insert(header::CONTENT_TYPE, content_type);

    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(CACHE_CONTROL_IMMUTABLE),
    );

    if let Ok(value) = HeaderValue::from_str(&object.etag) {
        headers.insert(header::ETAG, value);
    }

    if let Some(size) = object.size {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(size));
    }

    apply_cors(headers);
}
