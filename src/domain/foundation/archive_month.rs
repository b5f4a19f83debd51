//! Calendar month used to bucket posts into archives.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// A `YYYY-MM` bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArchiveMonth {
    year: i32,
    month: u32,
}

impl ArchiveMonth {
    /// Builds a month from already-valid calendar parts (e.g. from chrono).
    pub(crate) fn from_parts(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Validates and builds a month.
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1..=9999).contains(&year) {
            return Err(ValidationError::out_of_range("year", 1, 9999, year as i64));
        }
        if !(1..=12).contains(&month) {
            return Err(ValidationError::out_of_range("month", 1, 12, month as i64));
        }
        Ok(Self { year, month })
    }

    /// Parses the separate year and month strings of an archive request.
    ///
    /// Single-digit months are accepted with or without a leading zero.
    pub fn parse(year: &str, month: &str) -> Result<Self, ValidationError> {
        let y: i32 = year.trim().parse().map_err(|_| {
            ValidationError::invalid_format("year", format!("'{}' is not a year", year))
        })?;
        let m: u32 = month.trim().parse().map_err(|_| {
            ValidationError::invalid_format("month", format!("'{}' is not a month", month))
        })?;
        Self::new(y, m)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for ArchiveMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for ArchiveMonth {
    type Err = ValidationError;

    /// Parses a `YYYY-MM` key as produced by the archive query.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s.split_once('-').ok_or_else(|| {
            ValidationError::invalid_format("archive_month", format!("'{}' is not YYYY-MM", s))
        })?;
        Self::parse(year, month)
    }
}
