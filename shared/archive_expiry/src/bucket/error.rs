//! Error types for bucket operations

use std::fmt::Debug;

use aws_sdk_s3::{
    error::{BuildError, SdkError},
    operation::{
        delete_objects::DeleteObjectsError, head_bucket::HeadBucketError,
        list_objects_v2::ListObjectsV2Error,
    },
};
use thiserror::Error;

/// Result type for bucket operations
pub type BucketResult<T> = Result<T, BucketError>;

/// Errors that can occur during bucket operations
#[derive(Error, Debug)]
pub enum BucketError {
    /// S3 service error
    #[error("S3 service error: {0}")]
    S3Error(String),

    /// AWS SDK error
    #[error("AWS SDK error: {0}")]
    AwsError(String),

    /// Upstream service error (5xx from S3)
    #[error("Upstream service error: {0}")]
    UpstreamError(String),

    /// Bucket does not exist or the caller may not access it
    #[error("Bucket not accessible: {0}")]
    BucketNotAccessible(String),

    /// S3 accepted the delete request but refused some of its keys
    #[error("Failed to delete {failed} of {requested} objects, first failure: {first_failure}")]
    PartialDelete {
        /// Number of keys S3 reported as not deleted
        failed: usize,
        /// Number of keys in the request
        requested: usize,
        /// Key and reason of the first reported failure
        first_failure: String,
    },

    /// Request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl BucketError {
    fn from_sdk_error<E: Debug>(error: SdkError<E>) -> Self {
        match error {
            SdkError::ServiceError(service_err) if service_err.raw().status().as_u16() >= 500 => {
                Self::UpstreamError(format!("{:?}", service_err.err()))
            }
            SdkError::ServiceError(service_err) => {
                Self::S3Error(format!("{:?}", service_err.err()))
            }
            _ => Self::AwsError(error.to_string()),
        }
    }
}

impl From<SdkError<ListObjectsV2Error>> for BucketError {
    fn from(error: SdkError<ListObjectsV2Error>) -> Self {
        Self::from_sdk_error(error)
    }
}

impl From<SdkError<DeleteObjectsError>> for BucketError {
    fn from(error: SdkError<DeleteObjectsError>) -> Self {
        Self::from_sdk_error(error)
    }
}

impl From<SdkError<HeadBucketError>> for BucketError {
    fn from(error: SdkError<HeadBucketError>) -> Self {
        match error {
            SdkError::ServiceError(err) => match err.err() {
                HeadBucketError::NotFound(_) => {
                    Self::BucketNotAccessible("Bucket not found".to_string())
                }
                // HeadBucket carries no body, so access denied only shows up as a 403
                _ if err.raw().status().as_u16() == 403 => {
                    Self::BucketNotAccessible("Access denied".to_string())
                }
                _ if err.raw().status().as_u16() >= 500 => {
                    Self::UpstreamError(format!("{:?}", err.err()))
                }
                _ => Self::S3Error(format!("{:?}", err.err())),
            },
            _ => Self::AwsError(error.to_string()),
        }
    }
}

impl From<BuildError> for BucketError {
    fn from(error: BuildError) -> Self {
        Self::InvalidRequest(error.to_string())
    }
}
