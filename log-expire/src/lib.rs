//! Command line tool expiring CloudFront access log archives from S3

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Command line arguments
pub mod args;

/// Console output
pub mod report;

/// Runtime configuration
pub mod types;
