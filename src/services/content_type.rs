//! Content type inference for objects stored without one.

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

const MIME_TYPES: [(&str, &str); 8] = [
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("bmp", "image/bmp"),
];

/// Map the extension after the last `.` of `key` to a MIME type.
///
/// Case-insensitive. Keys without a `.` or with an unknown extension resolve
/// to `application/octet-stream`.
pub fn infer_content_type(key: &str) -> &'static str {
    let Some((_, ext)) = key.rsplit_once('.') else {
        return DEFAULT_CONTENT_TYPE;
    };
    MIME_TYPES
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}
