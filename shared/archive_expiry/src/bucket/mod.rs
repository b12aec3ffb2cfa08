//! Storage port consumed by the bucket scanner

mod error;
mod s3;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::{BucketError, BucketResult};
pub use s3::S3ArchiveBucket;

/// An object as returned by a bucket listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedObject {
    /// Object key
    pub key: String,
    /// ISO-8601 last-modified timestamp, empty when the storage reported none
    pub last_modified: String,
}

/// One page of a bucket listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPage {
    /// Objects on this page, in storage-defined order
    pub objects: Vec<ListedObject>,
    /// Token for the next page, `None` once the listing is exhausted
    pub next_continuation_token: Option<String>,
}

/// Bucket holding access log archives
#[async_trait::async_trait]
pub trait ArchiveBucket: Send + Sync {
    /// Lists one page of objects under `prefix`
    ///
    /// An empty prefix lists the whole bucket. Passing the previous page's
    /// `next_continuation_token` continues the listing.
    async fn list_page(
        &self,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> BucketResult<ObjectPage>;

    /// Deletes all `keys` in a single request
    ///
    /// Callers never pass more than [`crate::DELETE_BATCH_LIMIT`] keys. A call that
    /// fails to delete any of the keys is reported as a failure of the whole call.
    async fn delete_batch(&self, keys: &[String]) -> BucketResult<()>;
}
