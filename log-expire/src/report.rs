//! Console output of an expiry run

use std::fmt;

use archive_expiry::{ArchiveDecision, ExpiryCutoff, RunCounters};

const DRY_RUN_SUFFIX: &str = " (DRY RUN)";

fn dry_run_suffix(dry_run: bool) -> &'static str {
    if dry_run {
        DRY_RUN_SUFFIX
    } else {
        ""
    }
}

/// Progress line for one considered archive
#[must_use]
pub fn progress_line(decision: &ArchiveDecision<'_>) -> String {
    format!(
        "{} - {}{}",
        decision.archive.key,
        if decision.expired { "DELETE" } else { "KEEP" },
        dry_run_suffix(decision.dry_run)
    )
}

/// Header printed before the scan starts
#[derive(Debug)]
pub struct RunHeader<'a> {
    /// Bucket being scanned
    pub bucket_name: &'a str,
    /// Normalised log prefix, if any
    pub log_prefix: Option<&'a str>,
    /// Resolved expiry cutoff
    pub cutoff: ExpiryCutoff,
}

impl fmt::Display for RunHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Processing S3 bucket [{}]", self.bucket_name)?;
        if let Some(prefix) = self.log_prefix {
            writeln!(f, "Log prefix path [{prefix}]")?;
        }
        writeln!(f, "Deleting logs prior to [{}]", self.cutoff)
    }
}

/// Summary printed once the scan has finished or was aborted
#[derive(Debug)]
pub struct RunSummary {
    /// Final counters
    pub counters: RunCounters,
    /// Whether deletions were simulated
    pub dry_run: bool,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total archive count [{}]", self.counters.archives_seen)?;
        writeln!(
            f,
            "Archives deleted [{}]{}",
            self.counters.archives_deleted,
            dry_run_suffix(self.dry_run)
        )?;
        write!(f, "Remaining [{}]", self.counters.remaining())
    }
}
