//! AWS S3 backed object store.
//!
//! # Design
//! - One store per bucket; keys are used verbatim as S3 object keys.
//! - `NoSuchKey` maps to [`StorageError::ObjectMissing`]; every other SDK
//!   failure is flattened into a backend error with the rendered message.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::debug;

use crate::client::{ObjectPage, ObjectStore};
use crate::error::{StorageError, StorageResult};

/// Object store backed by one S3 bucket.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Wrap an already-configured S3 client around `bucket`.
    #[must_use]
    pub const fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    /// Bucket this store reads and writes.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, key: &str, body: Bytes) -> StorageResult<()> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|error| StorageError::backend("PutObject", key, &error))?;
        debug!(%key, bytes = size, "object uploaded");
        Ok(())
    }

    async fn get_object(&self, key: &str) -> StorageResult<Bytes> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|error| {
                if error
                    .as_service_error()
                    .is_some_and(aws_sdk_s3::operation::get_object::GetObjectError::is_no_such_key)
                {
                    StorageError::ObjectMissing {
                        key: key.to_owned(),
                    }
                } else {
                    StorageError::backend("GetObject", key, &error)
                }
            })?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|error| StorageError::backend("GetObject", key, &error))?
            .into_bytes();
        debug!(%key, bytes = bytes.len(), "object downloaded");
        Ok(bytes)
    }

    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<String>,
    ) -> StorageResult<ObjectPage> {
        let mut request = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix);
        if let Some(token) = continuation {
            request = request.continuation_token(token);
        }

        let response = request.send().await.map_err(|error| StorageError::Listing {
            prefix: prefix.to_owned(),
            message: error.to_string(),
        })?;

        let keys = response
            .contents
            .unwrap_or_default()
            .into_iter()
            .filter_map(|object| object.key)
            .collect();
        Ok(ObjectPage {
            keys,
            continuation: response.next_continuation_token,
        })
    }
}
