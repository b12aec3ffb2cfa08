//! Expiry of CloudFront access log archives stored in S3
//!
//! This crate holds the decision engine shared by the `log-expire` command line tool:
//! archive key matching, date extraction from object metadata, cutoff resolution and the
//! bucket scanner that batches deletions of expired archives.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Storage port and its S3 implementation
pub mod bucket;

/// Expiry cutoff resolution
pub mod cutoff;

/// Archive key matching and date extraction
pub mod matcher;

/// Bucket scanning and batched deletion
pub mod scanner;

pub use bucket::{
    ArchiveBucket, BucketError, BucketResult, ListedObject, ObjectPage, S3ArchiveBucket,
};
pub use cutoff::{CutoffError, ExpiryCriteria, ExpiryCutoff};
pub use matcher::{extract_date, is_candidate_archive, CandidateArchive};
pub use scanner::{
    ArchiveDecision, BucketScanner, DeleteBatch, RunCounters, ScanError, ScanRequest,
    DELETE_BATCH_LIMIT,
};
