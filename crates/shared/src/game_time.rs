//! Game calendar instants.
//!
//! Weekly resets, expansion launches and raid releases are all announced in
//! US Pacific time. The calendar here pins each instant to the fixed offset
//! that was in effect on that date (PST or PDT) so conversions never depend
//! on a tz database.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

const PST_OFFSET_SECS: i32 = 8 * 3600;
const PDT_OFFSET_SECS: i32 = 7 * 3600;

/// Pacific offset in effect for a calendar instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacificZone {
    /// Pacific Standard Time (UTC-8).
    Standard,
    /// Pacific Daylight Time (UTC-7).
    Daylight,
}

impl PacificZone {
    /// Seconds west of UTC.
    pub fn offset_secs(&self) -> i32 {
        match self {
            PacificZone::Standard => PST_OFFSET_SECS,
            PacificZone::Daylight => PDT_OFFSET_SECS,
        }
    }
}

/// A wall-clock hour in Pacific time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacificInstant {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub zone: PacificZone,
}

impl PacificInstant {
    pub const fn new(year: i32, month: u32, day: u32, hour: u32, zone: PacificZone) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            zone,
        }
    }

    /// Resolves the wall-clock value to a UTC instant.
    ///
    /// Returns `None` when the date does not exist on the calendar.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        let offset = FixedOffset::west_opt(self.zone.offset_secs())?;
        offset
            .with_ymd_and_hms(self.year, self.month, self.day, self.hour, 0, 0)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Resolves a calendar literal known to be valid at compile time.
///
/// Only used for the static tables of launch and release dates, which are
/// covered by tests.
pub fn fixed_instant(instant: PacificInstant) -> DateTime<Utc> {
    instant
        .to_utc()
        .expect("game calendar literal must be a valid date")
}

/// Parses an RFC3339 timestamp and normalizes it to UTC.
pub fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_time_offset() {
        let instant = PacificInstant::new(2020, 11, 10, 9, PacificZone::Standard);
        let utc = instant.to_utc().unwrap();
        assert_eq!(utc.to_rfc3339(), "2020-11-10T17:00:00+00:00");
    }

    #[test]
    fn test_daylight_time_offset() {
        let instant = PacificInstant::new(2022, 5, 24, 10, PacificZone::Daylight);
        let utc = instant.to_utc().unwrap();
        assert_eq!(utc.to_rfc3339(), "2022-05-24T17:00:00+00:00");
    }

    #[test]
    fn test_invalid_calendar_date() {
        let instant = PacificInstant::new(2021, 2, 30, 9, PacificZone::Standard);
        assert!(instant.to_utc().is_none());
    }

    #[test]
    fn test_parse_rfc3339_normalizes_offset() {
        let parsed = parse_rfc3339("2022-05-24T10:00:00-07:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2022-05-24T17:00:00+00:00");
    }

    #[test]
    fn test_parse_rfc3339_rejects_garbage() {
        assert!(parse_rfc3339("yesterday").is_err());
        assert!(parse_rfc3339("2022-05-24 10:00:00").is_err());
    }
}
