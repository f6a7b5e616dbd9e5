//! The object store capability the proxy reads from.
//!
//! A lookup has three outcomes: the object, its absence (`Ok(None)`), or a
//! backend failure (`Err`). Absence is not an error.

use crate::models::object::StoredObject;
use async_trait::async_trait;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Backend(#[from] object_store::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Look up `key`, returning its metadata and an unread body stream.
    async fn get(&self, key: &str) -> StoreResult<Option<StoredObject>>;
}

/// Wrap `etag` in double quotes unless it is already a quoted or weak validator.
pub fn quote_etag(etag: &str) -> String {
    if etag.starts_with('"') || etag.starts_with("W/") {
        etag.to_string()
    } else {
        format!("\"{}\"", etag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_etag_is_idempotent() {
        assert_eq!(quote_etag("abc"), "\"abc\"");
        assert_eq!(quote_etag("\"abc\""), "\"abc\"");
        assert_eq!(quote_etag("W/\"abc\""), "W/\"abc\"");
    }
}
