//! S3 implementation of the archive bucket port

use std::sync::Arc;

use aws_sdk_s3::{
    primitives::DateTimeFormat,
    types::{Delete, ObjectIdentifier},
    Client as S3Client,
};
use tracing::{debug, error};

use super::{ArchiveBucket, BucketError, BucketResult, ListedObject, ObjectPage};

/// Access log archive bucket backed by S3
pub struct S3ArchiveBucket {
    s3_client: Arc<S3Client>,
    bucket_name: String,
}

impl S3ArchiveBucket {
    /// Creates a new S3 archive bucket
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - Name of the bucket holding the access log archives
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>, bucket_name: String) -> Self {
        Self {
            s3_client,
            bucket_name,
        }
    }

    /// The bucket name
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Checks that the bucket exists and is accessible with the configured credentials
    ///
    /// # Errors
    ///
    /// Returns `BucketError::BucketNotAccessible` if the bucket is missing or access is denied
    /// Returns `BucketError::UpstreamError` for 5xx errors
    pub async fn verify_access(&self) -> BucketResult<()> {
        self.s3_client
            .head_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to open bucket {}: {}", self.bucket_name, e);
                BucketError::from(e)
            })?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl ArchiveBucket for S3ArchiveBucket {
    async fn list_page(
        &self,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> BucketResult<ObjectPage> {
        let output = self
            .s3_client
            .list_objects_v2()
            .bucket(&self.bucket_name)
            .set_prefix((!prefix.is_empty()).then(|| prefix.to_string()))
            .set_continuation_token(continuation_token)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to list objects in bucket {}: {}", self.bucket_name, e);
                BucketError::from(e)
            })?;

        let objects: Vec<ListedObject> = output
            .contents()
            .iter()
            .filter_map(|object| {
                let key = object.key()?.to_string();
                let last_modified = object
                    .last_modified()
                    .and_then(|ts| ts.fmt(DateTimeFormat::DateTime).ok())
                    .unwrap_or_default();

                Some(ListedObject { key, last_modified })
            })
            .collect();

        let next_continuation_token = if output.is_truncated().unwrap_or(false) {
            output.next_continuation_token().map(ToString::to_string)
        } else {
            None
        };

        debug!(
            "Listed {} objects from {} (more pages: {})",
            objects.len(),
            self.bucket_name,
            next_continuation_token.is_some()
        );

        Ok(ObjectPage {
            objects,
            next_continuation_token,
        })
    }

    async fn delete_batch(&self, keys: &[String]) -> BucketResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let objects = keys
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key).build())
            .collect::<Result<Vec<_>, _>>()?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .quiet(true)
            .build()?;

        let output = self
            .s3_client
            .delete_objects()
            .bucket(&self.bucket_name)
            .delete(delete)
            .send()
            .await
            .map_err(|e| {
                error!(
                    "Failed to delete {} objects from bucket {}: {}",
                    keys.len(),
                    self.bucket_name,
                    e
                );
                BucketError::from(e)
            })?;

        // Quiet mode only reports the keys that could not be deleted
        let failures = output.errors();
        if let Some(first) = failures.first() {
            let first_failure = format!(
                "{} ({})",
                first.key().unwrap_or("<unknown key>"),
                first.code().or_else(|| first.message()).unwrap_or("no reason given")
            );
            error!(
                "S3 refused {} of {} deletions in bucket {}",
                failures.len(),
                keys.len(),
                self.bucket_name
            );

            return Err(BucketError::PartialDelete {
                failed: failures.len(),
                requested: keys.len(),
                first_failure,
            });
        }

        debug!("Deleted {} objects from {}", keys.len(), self.bucket_name);
        Ok(())
    }
}
