//! BucketStore — reads objects from any `object_store` backend.
//!
//! Production deployments point it at an S3-compatible bucket (AWS S3 or
//! Cloudflare R2 via a custom endpoint); tests use the in-memory backend.

use crate::{
    config::S3Settings,
    models::object::StoredObject,
    services::store::{ObjectStore, StoreResult, quote_etag},
};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use object_store::{
    Attribute, ObjectStore as RemoteStore, aws::AmazonS3Builder, path::Path as ObjectPath,
};
use std::{io, sync::Arc};
use tracing::debug;

#[derive(Clone)]
pub struct BucketStore {
    inner: Arc<dyn RemoteStore>,
}

impl BucketStore {
    pub fn new(inner: Arc<dyn RemoteStore>) -> Self {
        Self { inner }
    }

    /// Build an S3 client from `settings`; credentials come from the standard
    /// `AWS_*` environment variables.
    pub fn s3(settings: &S3Settings) -> StoreResult<Self> {
        let mut builder = AmazonS3Builder::from_env().with_region(&settings.region);
        if let Some(bucket) = &settings.bucket {
            builder = builder.with_bucket_name(bucket);
        }
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.with_endpoint(endpoint);
        }
        Ok(Self::new(Arc::new(builder.build()?)))
    }
}

#[async_trait]
impl ObjectStore for BucketStore {
    async fn get(&self, key: &str) -> StoreResult<Option<StoredObject>> {
        let location = match ObjectPath::parse(key) {
            Ok(location) => location,
            Err(err) => {
                debug!(key, error = %err, "key is not a valid object path");
                return Ok(None);
            }
        };
        // Parsing trims one leading and one trailing `/`; such keys would
        // alias a different object.
        if AsRef::<str>::as_ref(&location) != key {
            debug!(key, normalized = %location, "key is not stored verbatim");
            return Ok(None);
        }

        let result = match self.inner.get(&location).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let size = result.meta.size as u64;
        let etag = match result.meta.e_tag.as_deref() {
            Some(etag) => quote_etag(etag),
            None => format!(
                "\"{:x}-{:x}\"",
                result.meta.last_modified.timestamp_millis(),
                size
            ),
        };
        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|value| value.to_string());

        Ok(Some(StoredObject {
            body: result.into_stream().map_err(io::Error::other).boxed(),
            size: Some(size),
            etag,
            content_type,
        }))
    }
}
