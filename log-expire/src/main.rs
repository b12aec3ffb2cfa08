use std::sync::Arc;

use anyhow::Context;
use archive_expiry::{BucketScanner, S3ArchiveBucket, ScanRequest};
use aws_sdk_s3::Client as S3Client;
use chrono::Utc;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use log_expire::{
    args::Cli,
    report::{progress_line, RunHeader, RunSummary},
    types::Environment,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let environment = Environment::from_env();

    // Use JSON format for staging/production, regular format for development.
    // Logs go to stderr so they never interleave with the report on stdout.
    if environment.json_logs() {
        fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let job = cli.validate()?;
    let cutoff = job.criteria.resolve(Utc::now().date_naive())?;

    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
    let bucket = S3ArchiveBucket::new(s3_client, job.bucket_name.clone());

    bucket.verify_access().await.with_context(|| {
        format!(
            "Unable to open requested S3 bucket - does not exist or insufficient permissions [{}]",
            job.bucket_name
        )
    })?;

    println!(
        "{}",
        RunHeader {
            bucket_name: bucket.bucket_name(),
            log_prefix: job.log_prefix.as_deref(),
            cutoff,
        }
    );

    let request = ScanRequest {
        prefix: job.list_prefix(),
        cutoff,
        dry_run: !job.commit,
    };

    let mut scanner = BucketScanner::new(&bucket);
    if job.show_progress {
        scanner = scanner.with_progress(|decision| println!("{}", progress_line(decision)));
    }

    match scanner.scan(&request).await {
        Ok(counters) => {
            println!(
                "\n{}",
                RunSummary {
                    counters,
                    dry_run: request.dry_run,
                }
            );
            info!("Log archive expiry finished for bucket {}", job.bucket_name);
            Ok(())
        }
        Err(e) => {
            error!("Log archive expiry aborted: {}", e);
            println!(
                "\n{}",
                RunSummary {
                    counters: e.counters(),
                    dry_run: request.dry_run,
                }
            );
            Err(e.into())
        }
    }
}
