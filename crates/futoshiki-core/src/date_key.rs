//! Canonical `YYYYMMDD` date keys.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A calendar date in the `YYYYMMDD` form used as puzzle id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

/// A date string that is neither `YYYYMMDD` nor `YYYY-MM-DD`, or not a real day
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date `{0}`, expected YYYYMMDD or YYYY-MM-DD")]
pub struct InvalidDateKey(pub String);

impl DateKey {
    /// Key for a calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        Self(format!(
            "{:04}{:02}{:02}",
            date.year(),
            date.month(),
            date.day()
        ))
    }

    /// Key for today in the player's local timezone
    pub fn today() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// Parse `YYYYMMDD` or `YYYY-MM-DD`
    pub fn parse(input: &str) -> Result<Self, InvalidDateKey> {
        let trimmed = input.trim();
        let format = if trimmed.contains('-') {
            "%Y-%m-%d"
        } else {
            "%Y%m%d"
        };
        NaiveDate::parse_from_str(trimmed, format)
            .map(Self::from_date)
            .map_err(|_| InvalidDateKey(input.to_string()))
    }

    /// The calendar date this key names
    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, "%Y%m%d").ok()
    }

    /// The key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `puzzle_id` names this date
    pub fn matches(&self, puzzle_id: &str) -> bool {
        self.0 == puzzle_id
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_padding() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(DateKey::from_date(date).as_str(), "20250307");
    }

    #[test]
    fn test_parse_both_formats() {
        assert_eq!(DateKey::parse("20241231").unwrap().as_str(), "20241231");
        assert_eq!(DateKey::parse("2024-12-31").unwrap().as_str(), "20241231");
        assert_eq!(DateKey::parse(" 2024-01-05 ").unwrap().as_str(), "20240105");
    }

    #[test]
    fn test_parse_rejects_impossible_dates() {
        assert!(DateKey::parse("20230229").is_err());
        assert!(DateKey::parse("2024-13-01").is_err());
        assert!(DateKey::parse("yesterday").is_err());
        assert!(DateKey::parse("").is_err());
    }

    #[test]
    fn test_round_trip_to_date() {
        let key = DateKey::parse("2024-02-29").unwrap();
        assert_eq!(key.to_date(), NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn test_today_is_well_formed() {
        let today = DateKey::today();
        assert_eq!(today.as_str().len(), 8);
        assert!(today.to_date().is_some());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let key = DateKey::parse("20250101").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), r#""20250101""#);
    }
}
