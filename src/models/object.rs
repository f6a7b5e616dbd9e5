//! Represents an object handed back by an object store lookup.

use bytes::Bytes;
use futures::stream::BoxStream;
use std::{fmt, io};

/// Lazily-read object payload. Nothing is read until the stream is polled.
pub type ObjectBody = BoxStream<'static, io::Result<Bytes>>;

/// A single object (blob) found in the store.
///
/// The store owns the payload; the proxy only borrows it for the lifetime of
/// one response and never caches it.
pub struct StoredObject {
    /// Payload stream.
    pub body: ObjectBody,

    /// Size in bytes, when the backend reports it.
    pub size: Option<u64>,

    /// Opaque strong validator, sent verbatim as the `ETag` header.
    pub etag: String,

    /// Content type (MIME type) declared when the object was written.
    pub content_type: Option<String>,
}

impl fmt::Debug for StoredObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredObject")
            .field("size", &self.size)
            .field("etag", &self.etag)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}
