//! src/services/disk_store.rs
//!
//! DiskStore — serves object payloads straight from a local directory.
//! The object key is the file path relative to `base_path`; there is no
//! metadata database, so the declared content type is always absent and the
//! ETag is derived from the file's modification time and length.

use crate::{
    models::object::StoredObject,
    services::store::{ObjectStore, StoreResult},
};
use async_trait::async_trait;
use futures::StreamExt;
use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
    time::UNIX_EPOCH,
};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::debug;

const MAX_OBJECT_KEY_LEN: usize = 1024;

#[derive(Clone, Debug)]
pub struct DiskStore {
    /// Directory that object keys are resolved against.
    pub base_path: PathBuf,
}

impl DiskStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Resolve `key` beneath `base_path`, or `None` when the key could escape
    /// the directory or is not a plain relative path.
    fn object_path(&self, key: &str) -> Option<PathBuf> {
        if key.is_empty() || key.len() > MAX_OBJECT_KEY_LEN {
            return None;
        }
        if key
            .bytes()
            .any(|b| b.is_ascii_control() || b == b'\\' || b == b'\0')
        {
            return None;
        }
        let relative = Path::new(key);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.base_path.join(relative))
    }
}

#[async_trait]
impl ObjectStore for DiskStore {
    async fn get(&self, key: &str) -> StoreResult<Option<StoredObject>> {
        let Some(file_path) = self.object_path(key) else {
            debug!(key, "rejected unsafe object key");
            return Ok(None);
        };

        let file = match File::open(&file_path).await {
            Ok(file) => file,
            Err(err)
                if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) =>
            {
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let meta = file.metadata().await?;
        if !meta.is_file() {
            debug!("{} is not a regular file", file_path.display());
            return Ok(None);
        }

        let modified = meta
            .modified()?
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let etag = format!("\"{:x}-{:x}\"", modified.as_nanos(), meta.len());

        Ok(Some(StoredObject {
            body: ReaderStream::new(file).boxed(),
            size: Some(meta.len()),
            etag,
            content_type: None,
        }))
    }
}
