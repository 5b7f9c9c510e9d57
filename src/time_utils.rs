// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.
//!
//! Monthly reports bucket trainings by calendar month, which depends on the
//! zone used to turn an instant into a calendar date. That zone is carried
//! explicitly as a [`ReportTimeZone`] instead of being read from the host.

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, Offset, TimeZone, Utc};
use std::fmt;
use std::str::FromStr;

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Time zone used to map instants to calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTimeZone {
    /// The host's configured local zone.
    Local,
    /// A fixed offset from UTC.
    Fixed(FixedOffset),
}

impl ReportTimeZone {
    /// UTC as a fixed zone.
    pub fn utc() -> Self {
        ReportTimeZone::Fixed(Utc.fix())
    }

    /// Calendar (year, month) of an instant in this zone.
    pub fn year_month(&self, instant: DateTime<Utc>) -> (i32, u32) {
        match self {
            ReportTimeZone::Local => {
                let local = instant.with_timezone(&Local);
                (local.year(), local.month())
            }
            ReportTimeZone::Fixed(offset) => {
                let local = instant.with_timezone(offset);
                (local.year(), local.month())
            }
        }
    }

    /// Today's calendar date in this zone.
    pub fn today(&self) -> NaiveDate {
        self.date_of(Utc::now())
    }

    /// Calendar date of an instant in this zone.
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            ReportTimeZone::Local => instant.with_timezone(&Local).date_naive(),
            ReportTimeZone::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }

    /// First instant of `date` in this zone.
    ///
    /// Returns `None` when local midnight does not exist (DST gap).
    pub fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        match self {
            ReportTimeZone::Local => Local
                .from_local_datetime(&midnight)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            ReportTimeZone::Fixed(offset) => offset
                .from_local_datetime(&midnight)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

impl fmt::Display for ReportTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportTimeZone::Local => f.write_str("local"),
            ReportTimeZone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

/// Error parsing a report time zone.
#[derive(Debug, thiserror::Error)]
#[error("Invalid time zone '{0}': expected 'local', 'utc' or an offset like '+02:00'")]
pub struct TimeZoneParseError(String);

impl FromStr for ReportTimeZone {
    type Err = TimeZoneParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "local" => return Ok(ReportTimeZone::Local),
            "utc" | "z" => return Ok(ReportTimeZone::utc()),
            _ => {}
        }

        trimmed
            .parse::<FixedOffset>()
            .map(ReportTimeZone::Fixed)
            .map_err(|_| TimeZoneParseError(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_year_month_in_utc() {
        let tz = ReportTimeZone::utc();
        assert_eq!(tz.year_month(instant("2025-06-15T10:00:00Z")), (2025, 6));
        assert_eq!(tz.year_month(instant("2025-06-30T23:59:59Z")), (2025, 6));
        assert_eq!(tz.year_month(instant("2025-07-01T00:00:00Z")), (2025, 7));
    }

    #[test]
    fn test_year_month_shifts_with_offset() {
        // 23:30 UTC on May 31st is already June in UTC+02:00
        let tz: ReportTimeZone = "+02:00".parse().unwrap();
        assert_eq!(tz.year_month(instant("2025-05-31T23:30:00Z")), (2025, 6));

        let tz: ReportTimeZone = "-05:00".parse().unwrap();
        assert_eq!(tz.year_month(instant("2025-06-01T03:00:00Z")), (2025, 5));
    }

    #[test]
    fn test_parse_time_zone() {
        assert_eq!(
            "local".parse::<ReportTimeZone>().unwrap(),
            ReportTimeZone::Local
        );
        assert_eq!(
            "UTC".parse::<ReportTimeZone>().unwrap(),
            ReportTimeZone::utc()
        );
        assert_eq!(
            "+05:30".parse::<ReportTimeZone>().unwrap(),
            ReportTimeZone::Fixed(FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap())
        );
        assert_eq!(
            "-0330".parse::<ReportTimeZone>().unwrap(),
            ReportTimeZone::Fixed(FixedOffset::west_opt(3 * 3600 + 30 * 60).unwrap())
        );
        assert!("Europe/Warsaw".parse::<ReportTimeZone>().is_err());
        assert!("+5:30".parse::<ReportTimeZone>().is_err());
        assert!("+02:75".parse::<ReportTimeZone>().is_err());
        assert!("".parse::<ReportTimeZone>().is_err());
    }

    #[test]
    fn test_start_of_day_fixed_offset() {
        let tz: ReportTimeZone = "+02:00".parse().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(
            tz.start_of_day(date).unwrap(),
            instant("2025-05-31T22:00:00Z")
        );
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-06-15"),
            NaiveDate::from_ymd_opt(2025, 6, 15)
        );
        assert!(parse_date("15-06-2025").is_none());
        assert!(parse_date("2025-13-01").is_none());
    }
}
