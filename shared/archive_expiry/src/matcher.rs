use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use crate::bucket::ListedObject;

/// CloudFront access log archive key, optionally nested under a `/` separated prefix.
///
/// `<DISTRIBUTION_ID>.<YYYY-MM-DD-HH>.<unique id>.gz`
static ACCESS_LOG_ARCHIVE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|/)[A-Z0-9]{13,14}\.[0-9]{4}-[0-1][0-9]-[0-3][0-9]-[0-9]{2}\.[a-f0-9]{8}\.gz$")
        .expect("Invalid regex")
});

static LAST_MODIFIED_DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})T").expect("Invalid regex")
});

/// A listed object whose key follows the access log archive naming convention
/// and whose last-modified date could be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateArchive<'a> {
    /// Object key as listed
    pub key: &'a str,
    /// Calendar date taken from the object's last-modified timestamp
    pub date: NaiveDate,
}

impl<'a> CandidateArchive<'a> {
    /// Builds a candidate from a listed object
    ///
    /// Returns `None` when the key is not an access log archive or the last-modified
    /// timestamp carries no extractable date.
    #[must_use]
    pub fn from_listing(object: &'a ListedObject) -> Option<Self> {
        if !is_candidate_archive(&object.key) {
            return None;
        }

        let Some(date) = extract_date(&object.last_modified) else {
            debug!(
                "Skipping {}: no date in last modified '{}'",
                object.key, object.last_modified
            );
            return None;
        };

        Some(Self {
            key: &object.key,
            date,
        })
    }
}

/// Checks whether an object key names a CloudFront access log archive
#[must_use]
pub fn is_candidate_archive(key: &str) -> bool {
    ACCESS_LOG_ARCHIVE_REGEX.is_match(key)
}

/// Extracts the calendar date from an ISO-8601 last-modified timestamp
///
/// Only the leading `YYYY-MM-DDT` prefix is inspected, anything after the `T`
/// is ignored.
///
/// # Returns
///
/// * `Some(date)` when the prefix is present and names a real calendar date
/// * `None` otherwise
#[must_use]
pub fn extract_date(last_modified: &str) -> Option<NaiveDate> {
    let captures = LAST_MODIFIED_DATE_REGEX.captures(last_modified)?;

    let year = captures[1].parse::<i32>().ok()?;
    let month = captures[2].parse::<u32>().ok()?;
    let day = captures[3].parse::<u32>().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_archive_keys() {
        let keys = [
            "AB12CD34EF567.2021-03-15-09.deadbeef.gz",
            "AB12CD34EF5678.2021-03-15-09.deadbeef.gz",
            "logs/AB12CD34EF567.2021-03-15-09.deadbeef.gz",
            "logs/cdn/E2QWRUHAPOMQZL.2019-12-31-23.0a1b2c3d.gz",
        ];

        for key in keys {
            assert!(is_candidate_archive(key), "expected match for {key}");
        }
    }

    #[test]
    fn test_rejects_non_archive_keys() {
        let keys = [
            "notanarchive.txt",
            "",
            // lowercase distribution id
            "ab12cd34ef567.2021-03-15-09.deadbeef.gz",
            // distribution id too short and too long
            "AB12CD34EF56.2021-03-15-09.deadbeef.gz",
            "AB12CD34EF56789.2021-03-15-09.deadbeef.gz",
            // uppercase hex segment
            "AB12CD34EF567.2021-03-15-09.DEADBEEF.gz",
            // hex segment of wrong length
            "AB12CD34EF567.2021-03-15-09.deadbee.gz",
            // missing hour
            "AB12CD34EF567.2021-03-15.deadbeef.gz",
            // month and day out of pattern
            "AB12CD34EF567.2021-23-15-09.deadbeef.gz",
            "AB12CD34EF567.2021-03-45-09.deadbeef.gz",
            // missing or extra suffix
            "AB12CD34EF567.2021-03-15-09.deadbeef",
            "AB12CD34EF567.2021-03-15-09.deadbeef.gz.tmp",
            // not preceded by a separator
            "xAB12CD34EF567.2021-03-15-09.deadbeef.gz",
            "logs-AB12CD34EF567.2021-03-15-09.deadbeef.gz",
        ];

        for key in keys {
            assert!(!is_candidate_archive(key), "expected no match for {key}");
        }
    }

    #[test]
    fn test_extract_date_discards_time_of_day() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 15).unwrap();

        assert_eq!(extract_date("2021-03-15T09:00:00.000Z"), Some(expected));
        assert_eq!(extract_date("2021-03-15T23:59:59Z"), Some(expected));
        assert_eq!(extract_date("2021-03-15Tanything at all"), Some(expected));
    }

    #[test]
    fn test_extract_date_requires_prefix() {
        assert_eq!(extract_date("garbage"), None);
        assert_eq!(extract_date(""), None);
        assert_eq!(extract_date("2021-03-15 09:00:00"), None);
        assert_eq!(extract_date("21-03-15T09:00:00Z"), None);
        assert_eq!(extract_date(" 2021-03-15T09:00:00Z"), None);
    }

    #[test]
    fn test_extract_date_rejects_impossible_dates() {
        assert_eq!(extract_date("2021-13-01T00:00:00Z"), None);
        assert_eq!(extract_date("2021-02-30T00:00:00Z"), None);
    }

    fn listed(key: &str, last_modified: &str) -> ListedObject {
        ListedObject {
            key: key.to_string(),
            last_modified: last_modified.to_string(),
        }
    }

    #[test]
    fn test_candidate_archive_from_listing() {
        let object = listed(
            "logs/AB12CD34EF567.2021-03-15-09.deadbeef.gz",
            "2021-03-15T09:00:00.000Z",
        );
        let candidate = CandidateArchive::from_listing(&object).unwrap();

        assert_eq!(candidate.key, "logs/AB12CD34EF567.2021-03-15-09.deadbeef.gz");
        assert_eq!(candidate.date, NaiveDate::from_ymd_opt(2021, 3, 15).unwrap());
    }

    #[test]
    fn test_candidate_archive_from_listing_rejects() {
        let not_archive = listed("notanarchive.txt", "2021-03-15T09:00:00Z");
        assert_eq!(CandidateArchive::from_listing(&not_archive), None);

        let no_date = listed("AB12CD34EF567.2021-03-15-09.deadbeef.gz", "garbage");
        assert_eq!(CandidateArchive::from_listing(&no_date), None);

        let missing_timestamp = listed("AB12CD34EF567.2021-03-15-09.deadbeef.gz", "");
        assert_eq!(CandidateArchive::from_listing(&missing_timestamp), None);
    }
}
