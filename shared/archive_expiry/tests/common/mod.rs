//! Scanner test setup utilities

#![allow(dead_code)]

use archive_expiry::bucket::mock::InMemoryBucket;
use archive_expiry::{ExpiryCutoff, ScanRequest};
use chrono::NaiveDate;

/// Last-modified timestamp of archives older than [`cutoff`]
pub const EXPIRED_TIMESTAMP: &str = "2021-03-15T09:00:00.000Z";

/// Last-modified timestamp of archives newer than [`cutoff`]
pub const FRESH_TIMESTAMP: &str = "2021-04-15T09:00:00.000Z";

/// Cutoff used by the scanner tests
pub fn cutoff() -> ExpiryCutoff {
    ExpiryCutoff::new(NaiveDate::from_ymd_opt(2021, 4, 1).unwrap())
}

/// Scan request over `prefix` with the test cutoff
pub fn scan_request(prefix: &str, dry_run: bool) -> ScanRequest {
    ScanRequest {
        prefix: prefix.to_string(),
        cutoff: cutoff(),
        dry_run,
    }
}

/// Distinct access log archive key under `prefix`
pub fn archive_key(prefix: &str, n: u32) -> String {
    format!("{prefix}E2QWRUHAPOMQZL.2021-03-15-09.{n:08x}.gz")
}

/// Fills a bucket with `expired` archives older than the cutoff and `fresh` newer ones
pub fn seeded_bucket(expired: u32, fresh: u32) -> InMemoryBucket {
    let bucket = InMemoryBucket::new();
    seed(&bucket, "", expired, fresh);
    bucket
}

/// Adds archives under `prefix` to an existing bucket
pub fn seed(bucket: &InMemoryBucket, prefix: &str, expired: u32, fresh: u32) {
    for n in 0..expired {
        bucket.put(archive_key(prefix, n), EXPIRED_TIMESTAMP);
    }
    for n in expired..expired + fresh {
        bucket.put(archive_key(prefix, n), FRESH_TIMESTAMP);
    }
}
