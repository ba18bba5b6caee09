//! Common validation utilities.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use validator::ValidationError;

/// Largest UTC offset accepted for report bucketing (±14 hours).
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Parses a `YYYY-MM-DD` calendar date.
///
/// Rejects dates that do not exist on the calendar (e.g. `2024-02-30`).
pub fn parse_calendar_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let mut err = ValidationError::new("calendar_date");
        err.message = Some("Invalid date format, expected YYYY-MM-DD".into());
        err
    })
}

/// Validates that a device's rated wattage is a finite, non-negative number.
pub fn validate_wattage(watts: f64) -> Result<(), ValidationError> {
    if watts.is_finite() && watts >= 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("wattage_range");
        err.message = Some("Wattage must be a non-negative number".into());
        Err(err)
    }
}

/// Validates a UTC offset in minutes.
pub fn validate_utc_offset_minutes(minutes: i32) -> Result<(), ValidationError> {
    if (-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&minutes) {
        Ok(())
    } else {
        let mut err = ValidationError::new("utc_offset_range");
        err.message = Some("UTC offset must be between -840 and 840 minutes".into());
        Err(err)
    }
}

/// Builds a fixed offset from minutes east of UTC.
pub fn fixed_offset(minutes: i32) -> Result<FixedOffset, ValidationError> {
    validate_utc_offset_minutes(minutes)?;
    FixedOffset::east_opt(minutes * 60).ok_or_else(|| ValidationError::new("utc_offset_range"))
}

/// Converts an inclusive calendar-date range into an instant window.
///
/// The window starts at midnight of `start` and ends at midnight of the day
/// after `end`, both in `offset`. Ordering of the two dates is not checked.
pub fn day_window(
    start: NaiveDate,
    end: NaiveDate,
    offset: FixedOffset,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ValidationError> {
    let out_of_range = || {
        let mut err = ValidationError::new("date_range");
        err.message = Some("Date is outside the supported range".into());
        err
    };

    let day_after_end = end.succ_opt().ok_or_else(out_of_range)?;
    let window_start = offset
        .from_local_datetime(&start.and_time(NaiveTime::MIN))
        .single()
        .ok_or_else(out_of_range)?;
    let window_end = offset
        .from_local_datetime(&day_after_end.and_time(NaiveTime::MIN))
        .single()
        .ok_or_else(out_of_range)?;

    Ok((window_start.with_timezone(&Utc), window_end.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_calendar_date() {
        assert_eq!(
            parse_calendar_date("2024-03-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert!(parse_calendar_date("2024-02-29").is_ok());
    }

    #[test]
    fn test_parse_calendar_date_rejects_impossible_dates() {
        assert!(parse_calendar_date("2024-02-30").is_err());
        assert!(parse_calendar_date("2023-02-29").is_err());
        assert!(parse_calendar_date("2024-13-01").is_err());
        assert!(parse_calendar_date("2024-00-10").is_err());
    }

    #[test]
    fn test_parse_calendar_date_rejects_garbage() {
        assert!(parse_calendar_date("").is_err());
        assert!(parse_calendar_date("yesterday").is_err());
        assert!(parse_calendar_date("2024/03/15").is_err());
    }

    #[test]
    fn test_parse_calendar_date_error_message() {
        let err = parse_calendar_date("nope").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Invalid date format, expected YYYY-MM-DD"
        );
    }

    #[test]
    fn test_validate_wattage() {
        assert!(validate_wattage(0.0).is_ok());
        assert!(validate_wattage(1500.0).is_ok());
        assert!(validate_wattage(-1.0).is_err());
        assert!(validate_wattage(f64::NAN).is_err());
        assert!(validate_wattage(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_utc_offset_minutes() {
        assert!(validate_utc_offset_minutes(0).is_ok());
        assert!(validate_utc_offset_minutes(330).is_ok());
        assert!(validate_utc_offset_minutes(-840).is_ok());
        assert!(validate_utc_offset_minutes(841).is_err());
    }

    #[test]
    fn test_day_window_utc_includes_end_day() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        let (from, to) = day_window(start, end, fixed_offset(0).unwrap()).unwrap();

        assert_eq!(from.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2024-01-03T00:00:00+00:00");
    }

    #[test]
    fn test_day_window_shifts_with_offset() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();

        let (from, to) = day_window(day, day, fixed_offset(120).unwrap()).unwrap();

        assert_eq!(from.to_rfc3339(), "2024-06-09T22:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2024-06-10T22:00:00+00:00");
    }
}
