//! Timestamps as they appear in the tester logs.
//!
//! The AutoZ log stamps events with a full date (`2025/06/06 15:31:05.104`) while the
//! ALL log uses a compact, yearless form (`06.06 15:31:05.104`). Every field of the
//! compact form is zero-padded to a fixed width, so ordering the raw strings
//! lexicographically orders them chronologically within a calendar year. All
//! comparisons on the ALL log are made on the strings themselves.
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::PrimitiveDateTime;

use super::error::TimestampError;

const FULL_FORMAT: &[FormatItem<'static>] = format_description!(
    "[year]/[month padding:none]/[day padding:none] [hour padding:none]:[minute padding:none]:[second padding:none].[subsecond]"
);

/// Longest fractional part accepted, microsecond precision.
const MAX_FRACTION_DIGITS: usize = 6;

/// A `MM.DD HH:MM:SS.mmm` timestamp, ordered as a string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompactTimestamp(String);

impl CompactTimestamp {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CompactTimestamp {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl PartialEq<str> for CompactTimestamp {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CompactTimestamp {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Display for CompactTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rewrite a `YYYY-MM-DD` date into the `YYYY/MM/DD` form. Only the date portion is touched.
pub fn normalize_full(full: &str) -> String {
    match full.split_once(' ') {
        Some((date, clock)) => format!("{} {}", date.replace('-', "/"), clock),
        None => full.replace('-', "/"),
    }
}

/// Convert a full AutoZ log timestamp into the compact ALL log form.
///
/// Fields may be given without zero padding. The fraction takes 1 to 6 digits and
/// sub-millisecond digits are truncated, never rounded.
pub fn to_compact(full: &str) -> Result<CompactTimestamp, TimestampError> {
    let normalized = normalize_full(full);
    if let Some((_, fraction)) = normalized.rsplit_once('.') {
        if fraction.len() > MAX_FRACTION_DIGITS {
            return Err(TimestampError::BadFormat(
                full.to_string(),
                format!("fraction longer than {MAX_FRACTION_DIGITS} digits"),
            ));
        }
    }
    let dt = PrimitiveDateTime::parse(&normalized, FULL_FORMAT)
        .map_err(|e| TimestampError::BadFormat(full.to_string(), e.to_string()))?;
    Ok(CompactTimestamp(format!(
        "{:02}.{:02} {:02}:{:02}:{:02}.{:03}",
        u8::from(dt.month()),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
        dt.millisecond()
    )))
}
