//! In-memory store used by tests. Counts lookups and can be told to fail.

use crate::{
    models::object::StoredObject,
    services::store::{ObjectStore, StoreError, StoreResult},
};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, stream};
use std::{
    collections::HashMap,
    io,
    sync::atomic::{AtomicUsize, Ordering},
};

struct MemoryObject {
    bytes: Bytes,
    etag: String,
    content_type: Option<String>,
}

#[derive(Default)]
pub struct MemoryStore {
    objects: HashMap<String, MemoryObject>,
    lookups: AtomicUsize,
    failures_left: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(
        mut self,
        key: &str,
        bytes: &[u8],
        etag: &str,
        content_type: Option<&str>,
    ) -> Self {
        self.objects.insert(
            key.to_string(),
            MemoryObject {
                bytes: Bytes::copy_from_slice(bytes),
                etag: etag.to_string(),
                content_type: content_type.map(str::to_string),
            },
        );
        self
    }

    /// Make the next `count` lookups fail with an I/O error.
    pub fn fail_next(&self, count: usize) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    /// Number of `get` calls received so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<StoredObject>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "backend unavailable",
            )));
        }

        Ok(self.objects.get(key).map(|object| StoredObject {
            body: stream::iter([Ok(object.bytes.clone())]).boxed(),
            size: Some(object.bytes.len() as u64),
            etag: object.etag.clone(),
            content_type: object.content_type.clone(),
        }))
    }
}
