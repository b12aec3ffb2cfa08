use thiserror::Error;

use super::RunCounters;
use crate::bucket::BucketError;

/// Errors that abort a bucket scan
///
/// Both variants carry the counters accumulated before the failure. Archives in a
/// batch whose delete request failed are not counted as deleted.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Listing the bucket failed
    #[error("Failed to list bucket objects")]
    List {
        /// Counters at the time of the failure
        counters: RunCounters,
        /// Underlying bucket error
        #[source]
        source: BucketError,
    },

    /// A delete request failed
    #[error("Failed to delete a batch of {pending} expired archives")]
    Delete {
        /// Counters at the time of the failure
        counters: RunCounters,
        /// Number of keys in the failed request
        pending: usize,
        /// Underlying bucket error
        #[source]
        source: BucketError,
    },
}

impl ScanError {
    /// Counters accumulated before the scan was aborted
    #[must_use]
    pub const fn counters(&self) -> RunCounters {
        match self {
            Self::List { counters, .. } | Self::Delete { counters, .. } => *counters,
        }
    }
}
