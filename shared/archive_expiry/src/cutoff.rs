use std::fmt;

use chrono::{Days, NaiveDate};
use thiserror::Error;

/// Errors that can occur while resolving an expiry cutoff
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CutoffError {
    /// Subtracting the day count from today leaves the supported calendar range
    #[error("Expire days out of range: {0}")]
    DaysOutOfRange(u64),
}

/// How the caller asked for archives to be expired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryCriteria {
    /// Expire archives dated before the given date
    Before(NaiveDate),
    /// Expire archives dated more than the given number of days before today
    OlderThanDays(u64),
}

impl ExpiryCriteria {
    /// Resolves the criteria to a concrete cutoff date
    ///
    /// # Arguments
    ///
    /// * `today` - The current date at invocation time
    ///
    /// # Errors
    ///
    /// Returns `CutoffError::DaysOutOfRange` if the day count reaches past the earliest
    /// representable date
    pub fn resolve(self, today: NaiveDate) -> Result<ExpiryCutoff, CutoffError> {
        match self {
            Self::Before(date) => Ok(ExpiryCutoff::new(date)),
            Self::OlderThanDays(days) => today
                .checked_sub_days(Days::new(days))
                .map(ExpiryCutoff::new)
                .ok_or(CutoffError::DaysOutOfRange(days)),
        }
    }
}

/// Calendar date boundary; archives dated strictly earlier are expired
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExpiryCutoff(NaiveDate);

impl ExpiryCutoff {
    /// Creates a cutoff at the given date
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The cutoff date
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }

    /// Whether an archive dated `date` is expired under this cutoff
    #[must_use]
    pub fn is_expired(&self, date: NaiveDate) -> bool {
        date < self.0
    }
}

impl fmt::Display for ExpiryCutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
