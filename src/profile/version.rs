//! Date API Versions
//!
//! Comparable form of `YYYY-MM-DD` and `YYYY-MM-DD-preview` version strings.
//! A preview sorts strictly before the final release of the same date.

use crate::error::{ProfileError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

const PREVIEW_SUFFIX: &str = "preview";

/// A parsed API version
#[derive(Debug, Clone, Copy)]
pub struct DateApiVersion {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub preview: bool,
}

impl DateApiVersion {
    /// Parse a version string, failing on anything but the two dated shapes
    pub fn parse(api_version: &str) -> Result<Self> {
        let invalid = || ProfileError::InvalidApiVersion(api_version.to_string());

        let parts: Vec<&str> = api_version.split('-').collect();
        let (date, preview) = match parts.as_slice() {
            [yyyy, mm, dd, suffix] if *suffix == PREVIEW_SUFFIX => ([*yyyy, *mm, *dd], true),
            [yyyy, mm, dd] => ([*yyyy, *mm, *dd], false),
            _ => return Err(invalid()),
        };

        let field = |s: &str| -> Result<u32> {
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            s.parse::<u32>().map_err(|_| invalid())
        };

        Ok(Self {
            year: field(date[0])?,
            month: field(date[1])?,
            day: field(date[2])?,
            preview,
        })
    }

    /// Strict "earlier than": date first, then preview before release
    fn precedes(&self, other: &Self) -> bool {
        if self.year != other.year {
            return self.year < other.year;
        }
        if self.month != other.month {
            return self.month < other.month;
        }
        if self.day != other.day {
            return self.day < other.day;
        }
        self.preview && !other.preview
    }
}

impl PartialEq for DateApiVersion {
    fn eq(&self, other: &Self) -> bool {
        self.year == other.year
            && self.month == other.month
            && self.day == other.day
            && self.preview == other.preview
    }
}

impl Eq for DateApiVersion {}

impl Ord for DateApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.precedes(other) {
            Ordering::Less
        } else if self == other {
            Ordering::Equal
        } else {
            Ordering::Greater
        }
    }
}

impl PartialOrd for DateApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for DateApiVersion {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DateApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)?;
        if self.preview {
            write!(f, "-{}", PREVIEW_SUFFIX)?;
        }
        Ok(())
    }
}

/// Compare two version strings
pub fn compare_api_versions(a: &str, b: &str) -> Result<Ordering> {
    Ok(DateApiVersion::parse(a)?.cmp(&DateApiVersion::parse(b)?))
}
