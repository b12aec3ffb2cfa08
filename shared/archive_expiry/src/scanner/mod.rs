//! Scans a bucket for expired access log archives and deletes them in batches

mod batch;
mod error;

use tracing::info;

use crate::bucket::ArchiveBucket;
use crate::cutoff::ExpiryCutoff;
use crate::matcher::CandidateArchive;

pub use batch::{DeleteBatch, DELETE_BATCH_LIMIT};
pub use error::ScanError;

type ProgressCallback<'a> = Box<dyn FnMut(&ArchiveDecision<'_>) + Send + 'a>;

/// Parameters of a single scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    /// Key prefix to list under, empty for the whole bucket
    pub prefix: String,
    /// Archives dated before this cutoff are expired
    pub cutoff: ExpiryCutoff,
    /// Compute and report decisions without deleting anything
    pub dry_run: bool,
}

/// Archive counts of a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    /// Archives whose date could be extracted
    pub archives_seen: u64,
    /// Expired archives, deleted or (in a dry run) due for deletion
    pub archives_deleted: u64,
}

impl RunCounters {
    /// Archives seen but not deleted
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.archives_seen.saturating_sub(self.archives_deleted)
    }
}

/// Expire or keep decision for one archive, reported to the progress callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveDecision<'a> {
    /// The archive considered
    pub archive: CandidateArchive<'a>,
    /// Whether the archive is older than the cutoff
    pub expired: bool,
    /// Whether the scan runs without deleting
    pub dry_run: bool,
}

/// Bucket scanner
pub struct BucketScanner<'a, B: ?Sized> {
    bucket: &'a B,
    progress: Option<ProgressCallback<'a>>,
}

impl<'a, B> BucketScanner<'a, B>
where
    B: ArchiveBucket + ?Sized,
{
    /// Creates a scanner over `bucket`
    #[must_use]
    pub const fn new(bucket: &'a B) -> Self {
        Self {
            bucket,
            progress: None,
        }
    }

    /// Registers a callback invoked once per considered archive
    ///
    /// The callback only observes decisions, it cannot change them.
    #[must_use]
    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: FnMut(&ArchiveDecision<'_>) + Send + 'a,
    {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Scans the bucket and deletes archives older than the cutoff
    ///
    /// Objects whose key is not an access log archive, or whose last-modified
    /// timestamp carries no date, are skipped without being counted. Deletions are
    /// sent in batches of [`DELETE_BATCH_LIMIT`] keys, with a final request for any
    /// remainder once the listing is exhausted. In a dry run no delete request is
    /// sent and expired archives are counted as deleted when they are seen.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::List` if a list request fails
    /// Returns `ScanError::Delete` if a delete request fails
    pub async fn scan(&mut self, request: &ScanRequest) -> Result<RunCounters, ScanError> {
        info!(
            "Scanning for archives before {} under prefix '{}' (dry run: {})",
            request.cutoff, request.prefix, request.dry_run
        );

        let mut counters = RunCounters::default();
        let mut batch = DeleteBatch::new();
        let mut continuation_token = None;

        loop {
            let page = self
                .bucket
                .list_page(&request.prefix, continuation_token.take())
                .await
                .map_err(|source| ScanError::List { counters, source })?;

            for object in &page.objects {
                let Some(archive) = CandidateArchive::from_listing(object) else {
                    continue;
                };

                counters.archives_seen += 1;
                let expired = request.cutoff.is_expired(archive.date);

                if let Some(progress) = self.progress.as_mut() {
                    progress(&ArchiveDecision {
                        archive,
                        expired,
                        dry_run: request.dry_run,
                    });
                }

                if !expired {
                    continue;
                }

                if request.dry_run {
                    counters.archives_deleted += 1;
                } else {
                    batch.push(object.key.clone());
                    self.flush(&mut batch, false, &mut counters).await?;
                }
            }

            match page.next_continuation_token {
                Some(token) => continuation_token = Some(token),
                None => break,
            }
        }

        self.flush(&mut batch, true, &mut counters).await?;

        info!(
            "Scan complete: {} archives seen, {} deleted",
            counters.archives_seen, counters.archives_deleted
        );

        Ok(counters)
    }

    async fn flush(
        &self,
        batch: &mut DeleteBatch,
        forced: bool,
        counters: &mut RunCounters,
    ) -> Result<(), ScanError> {
        let Some(keys) = batch.take_flushable(forced) else {
            return Ok(());
        };

        self.bucket
            .delete_batch(&keys)
            .await
            .map_err(|source| ScanError::Delete {
                counters: *counters,
                pending: keys.len(),
                source,
            })?;

        counters.archives_deleted += keys.len() as u64;
        info!("Deleted batch of {} archives", keys.len());

        Ok(())
    }
}
