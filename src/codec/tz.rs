//! Europe/Helsinki civil time
//!
//! All event timestamps are interpreted and emitted in this single zone,
//! never in UTC or the host's local zone. Offsets: EET (+02:00) standard,
//! EEST (+03:00) daylight, with EU transition rules — daylight time runs
//! from the last Sunday of March to the last Sunday of October, switching
//! at 01:00 UTC.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::core::error::{KalenteriError, Result};

/// Timezone identifier used in emitted records
pub const TZID: &str = "Europe/Helsinki";

/// Timestamp format used in interchange records
const STAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Last Sunday of the given month. Only called for March and October,
/// both 31-day months.
fn last_sunday(year: i32, month: u32) -> NaiveDate {
    let last_day = NaiveDate::from_ymd_opt(year, month, 31).expect("31-day month");
    let back = last_day.weekday().num_days_from_sunday();
    last_day - Duration::days(back as i64)
}

/// Whether a UTC instant falls inside the daylight-saving window
fn in_dst_utc(utc: NaiveDateTime) -> bool {
    let year = utc.year();
    let start = last_sunday(year, 3).and_hms_opt(1, 0, 0).expect("valid time");
    let end = last_sunday(year, 10).and_hms_opt(1, 0, 0).expect("valid time");
    utc >= start && utc < end
}

/// Whether a Helsinki local timestamp falls inside the daylight-saving
/// window. In the repeated autumn hour the standard offset wins.
fn in_dst_local(local: NaiveDateTime) -> bool {
    let year = local.year();
    let start = last_sunday(year, 3).and_hms_opt(3, 0, 0).expect("valid time");
    let end = last_sunday(year, 10).and_hms_opt(3, 0, 0).expect("valid time");
    local >= start && local < end
}

/// Convert a UTC instant to Helsinki local time
pub fn from_utc(utc: DateTime<Utc>) -> NaiveDateTime {
    let naive = utc.naive_utc();
    let offset_hours = if in_dst_utc(naive) { 3 } else { 2 };
    naive + Duration::hours(offset_hours)
}

/// Convert a Helsinki local timestamp to UTC
pub fn to_utc(local: NaiveDateTime) -> NaiveDateTime {
    let offset_hours = if in_dst_local(local) { 3 } else { 2 };
    local - Duration::hours(offset_hours)
}

/// Current Helsinki local time
pub fn now() -> NaiveDateTime {
    from_utc(Utc::now())
}

/// Format a local timestamp for an interchange record
pub fn format_stamp(t: NaiveDateTime) -> String {
    t.format(STAMP_FORMAT).to_string()
}

/// Format a local timestamp as UTC for protocol elements that require it
pub fn format_utc_stamp(local: NaiveDateTime) -> String {
    format!("{}Z", to_utc(local).format(STAMP_FORMAT))
}

/// Parse an interchange-record timestamp into local time. A trailing `Z`
/// marks a UTC stamp, which is converted to Helsinki time.
pub fn parse_stamp(value: &str) -> Result<NaiveDateTime> {
    if let Some(utc_part) = value.strip_suffix('Z') {
        let utc = NaiveDateTime::parse_from_str(utc_part, STAMP_FORMAT)
            .map_err(|e| KalenteriError::codec(format!("bad UTC timestamp '{}': {}", value, e)))?;
        return Ok(from_utc(DateTime::from_naive_utc_and_offset(utc, Utc)));
    }

    NaiveDateTime::parse_from_str(value, STAMP_FORMAT)
        .map_err(|e| KalenteriError::codec(format!("bad timestamp '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap(),
            Utc,
        )
    }

    fn local(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn test_last_sundays_2026() {
        assert_eq!(last_sunday(2026, 3), NaiveDate::from_ymd_opt(2026, 3, 29).unwrap());
        assert_eq!(last_sunday(2026, 10), NaiveDate::from_ymd_opt(2026, 10, 25).unwrap());
    }

    #[test]
    fn test_winter_offset() {
        assert_eq!(from_utc(utc("2026-01-15T12:00:00")), local("2026-01-15T14:00:00"));
    }

    #[test]
    fn test_summer_offset() {
        assert_eq!(from_utc(utc("2026-07-01T12:00:00")), local("2026-07-01T15:00:00"));
    }

    #[test]
    fn test_spring_transition() {
        // Clocks jump 03:00 -> 04:00 local at 01:00 UTC
        assert_eq!(from_utc(utc("2026-03-29T00:59:00")), local("2026-03-29T02:59:00"));
        assert_eq!(from_utc(utc("2026-03-29T01:00:00")), local("2026-03-29T04:00:00"));
    }

    #[test]
    fn test_autumn_transition() {
        // Clocks fall back 04:00 -> 03:00 local at 01:00 UTC
        assert_eq!(from_utc(utc("2026-10-25T00:59:00")), local("2026-10-25T03:59:00"));
        assert_eq!(from_utc(utc("2026-10-25T01:00:00")), local("2026-10-25T03:00:00"));
    }

    #[test]
    fn test_to_utc_round_trip() {
        for s in ["2026-01-15T14:00:00", "2026-07-01T15:00:00", "2026-08-07T09:00:00"] {
            let l = local(s);
            let back = from_utc(DateTime::from_naive_utc_and_offset(to_utc(l), Utc));
            assert_eq!(back, l);
        }
    }

    #[test]
    fn test_repeated_hour_resolves_to_standard() {
        // 03:30 on the autumn transition day exists twice; EET wins
        assert_eq!(to_utc(local("2026-10-25T03:30:00")), local("2026-10-25T01:30:00"));
    }

    #[test]
    fn test_parse_stamp_local_and_utc() {
        assert_eq!(parse_stamp("20260807T090000").unwrap(), local("2026-08-07T09:00:00"));
        assert_eq!(parse_stamp("20260701T120000Z").unwrap(), local("2026-07-01T15:00:00"));
        assert!(parse_stamp("not-a-stamp").is_err());
    }
}
