//! Command line arguments and their validation

use std::sync::LazyLock;

use archive_expiry::ExpiryCriteria;
use chrono::NaiveDate;
use clap::Parser;
use regex::Regex;
use thiserror::Error;

const MIN_EXPIRE_YEAR: i32 = 2006;
const MAX_EXPIRE_YEAR: i32 = 2048;

static BUCKET_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9-.]{1,61}[a-z0-9]$").expect("Invalid regex")
});

static LOG_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-./]+$").expect("Invalid regex"));

static EXPIRE_BEFORE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})$").expect("Invalid regex")
});

static EXPIRE_DAYS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{0,20}$").expect("Invalid regex"));

/// Argument validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgsError {
    /// Bucket name does not follow S3 naming rules
    #[error("Invalid source S3 bucket name [{0}]")]
    InvalidBucketName(String),

    /// Log prefix contains unsupported characters
    #[error("Invalid S3 bucket path log prefix [{0}]")]
    InvalidLogPrefix(String),

    /// Both expiry options given
    #[error("Please specify only one of expire before date / expire days")]
    ConflictingExpiry,

    /// Neither expiry option given
    #[error("Must specify log archive expiry as one of --expire-before or --expire-days")]
    MissingExpiry,

    /// Expire before date is not `YYYY-MM-DD`
    #[error("Invalid format for expire before date, expected YYYY-MM-DD")]
    InvalidDateFormat,

    /// Expire before year out of the supported range
    #[error("Invalid year for expire before date [{0}]")]
    InvalidYear(String),

    /// Expire before month out of range
    #[error("Invalid month for expire before date [{0}]")]
    InvalidMonth(String),

    /// Expire before day does not exist in the given month
    #[error("Invalid day of month for expire before date [{0}]")]
    InvalidDay(String),

    /// Expire days is not a positive integer
    #[error("Invalid value for expire days [{0}]")]
    InvalidDayCount(String),
}

/// Remove AWS CloudFront access log archives from an S3 bucket before a given date or number
/// of expiry days
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "log-expire", version)]
pub struct Cli {
    /// S3 bucket holding CloudFront access log archives
    #[arg(long, value_name = "NAME")]
    pub s3_bucket_name: String,

    /// S3 bucket path prefix to access log archives
    #[arg(long, value_name = "PREFIX")]
    pub s3_bucket_log_prefix: Option<String>,

    /// Expire log archives before given date
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub expire_before: Option<String>,

    /// Expire log archives older than X number of days
    #[arg(long, value_name = "DAY_COUNT")]
    pub expire_days: Option<String>,

    /// Display progress of access log archive processing
    #[arg(long)]
    pub progress: bool,

    /// Delete access log archives, otherwise simulation only
    #[arg(long)]
    pub commit: bool,
}

/// Validated expiry run settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryJob {
    /// Bucket to scan
    pub bucket_name: String,
    /// Normalised log prefix ending in `/`, if any
    pub log_prefix: Option<String>,
    /// Requested expiry criteria
    pub criteria: ExpiryCriteria,
    /// Print a line per considered archive
    pub show_progress: bool,
    /// Delete expired archives instead of simulating
    pub commit: bool,
}

impl ExpiryJob {
    /// Listing prefix for the scanner, empty for the whole bucket
    #[must_use]
    pub fn list_prefix(&self) -> String {
        self.log_prefix.clone().unwrap_or_default()
    }
}

impl Cli {
    /// Validates the arguments
    ///
    /// # Errors
    ///
    /// Returns the `ArgsError` of the first invalid argument
    pub fn validate(self) -> Result<ExpiryJob, ArgsError> {
        if !BUCKET_NAME_REGEX.is_match(&self.s3_bucket_name) {
            return Err(ArgsError::InvalidBucketName(self.s3_bucket_name));
        }

        let log_prefix = self
            .s3_bucket_log_prefix
            .map(|prefix| normalize_log_prefix(&prefix))
            .transpose()?;

        let criteria = match (self.expire_before, self.expire_days) {
            (Some(_), Some(_)) => return Err(ArgsError::ConflictingExpiry),
            (Some(date), None) => ExpiryCriteria::Before(parse_expire_before(&date)?),
            (None, Some(days)) => ExpiryCriteria::OlderThanDays(parse_expire_days(&days)?),
            (None, None) => return Err(ArgsError::MissingExpiry),
        };

        Ok(ExpiryJob {
            bucket_name: self.s3_bucket_name,
            log_prefix,
            criteria,
            show_progress: self.progress,
            commit: self.commit,
        })
    }
}

/// Strips leading and trailing slashes and appends a single trailing slash
fn normalize_log_prefix(prefix: &str) -> Result<String, ArgsError> {
    if !LOG_PREFIX_REGEX.is_match(prefix) {
        return Err(ArgsError::InvalidLogPrefix(prefix.to_string()));
    }

    Ok(format!("{}/", prefix.trim_matches('/')))
}

fn parse_expire_before(value: &str) -> Result<NaiveDate, ArgsError> {
    let captures = EXPIRE_BEFORE_REGEX
        .captures(value)
        .ok_or(ArgsError::InvalidDateFormat)?;

    let year = captures[1]
        .parse::<i32>()
        .ok()
        .filter(|year| (MIN_EXPIRE_YEAR..=MAX_EXPIRE_YEAR).contains(year))
        .ok_or_else(|| ArgsError::InvalidYear(captures[1].to_string()))?;

    let month = captures[2]
        .parse::<u32>()
        .ok()
        .filter(|month| (1..=12).contains(month))
        .ok_or_else(|| ArgsError::InvalidMonth(captures[2].to_string()))?;

    let day = captures[3]
        .parse::<u32>()
        .map_err(|_| ArgsError::InvalidDay(captures[3].to_string()))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ArgsError::InvalidDay(captures[3].to_string()))
}

fn parse_expire_days(value: &str) -> Result<u64, ArgsError> {
    if !EXPIRE_DAYS_REGEX.is_match(value) {
        return Err(ArgsError::InvalidDayCount(value.to_string()));
    }

    value
        .parse::<u64>()
        .map_err(|_| ArgsError::InvalidDayCount(value.to_string()))
}
