//! Interchange record generation
//!
//! Emits complete VCALENDAR records with an embedded VTIMEZONE block so
//! any reader can resolve the local times without external timezone data.
//! Lines are CRLF-terminated per the format's requirement.

use crate::codec::event::CalendarEvent;
use crate::codec::tz;
use crate::core::error::{KalenteriError, Result};

const PRODID: &str = "-//kalenteri//kalenteri 0.1//EN";

/// Generate a complete interchange-format record for one event.
///
/// Fails when the event is missing required fields rather than emitting a
/// malformed record.
pub fn generate(event: &CalendarEvent) -> Result<String> {
    if event.title().trim().is_empty() {
        return Err(KalenteriError::codec("event title must not be empty"));
    }

    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, &format!("PRODID:{}", PRODID));
    push_line(&mut out, "CALSCALE:GREGORIAN");
    push_timezone(&mut out);

    push_line(&mut out, "BEGIN:VEVENT");
    push_line(
        &mut out,
        &format!("DTSTAMP;TZID={}:{}", tz::TZID, tz::format_stamp(event.created())),
    );
    push_line(&mut out, &format!("UID:{}", event.uid()));
    push_line(
        &mut out,
        &format!("DTSTART;TZID={}:{}", tz::TZID, tz::format_stamp(event.start())),
    );
    push_line(
        &mut out,
        &format!("DTEND;TZID={}:{}", tz::TZID, tz::format_stamp(event.end())),
    );
    push_line(&mut out, &format!("SUMMARY:{}", escape_text(event.title())));

    if let Some(description) = event.description() {
        push_line(&mut out, &format!("DESCRIPTION:{}", escape_text(description)));
    }

    if let Some(location) = event.location() {
        push_line(&mut out, &format!("LOCATION:{}", escape_text(location)));
    }

    push_line(&mut out, "END:VEVENT");
    push_line(&mut out, "END:VCALENDAR");

    Ok(out)
}

/// Escape free text for embedding in a record: backslash, comma, and
/// semicolon are backslash-prefixed; newlines become the two-character
/// sequence `\n`.
pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            '\r' => {
                // CRLF counts as one newline
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            _ => out.push(c),
        }
    }

    out
}

/// The fixed civil timezone block: standard and daylight offsets with
/// their annual recurrence rules.
fn push_timezone(out: &mut String) {
    push_line(out, "BEGIN:VTIMEZONE");
    push_line(out, &format!("TZID:{}", tz::TZID));
    push_line(out, "BEGIN:STANDARD");
    push_line(out, "DTSTART:19701025T040000");
    push_line(out, "RRULE:FREQ=YEARLY;BYMONTH=10;BYDAY=-1SU");
    push_line(out, "TZOFFSETFROM:+0300");
    push_line(out, "TZOFFSETTO:+0200");
    push_line(out, "TZNAME:EET");
    push_line(out, "END:STANDARD");
    push_line(out, "BEGIN:DAYLIGHT");
    push_line(out, "DTSTART:19700329T030000");
    push_line(out, "RRULE:FREQ=YEARLY;BYMONTH=3;BYDAY=-1SU");
    push_line(out, "TZOFFSETFROM:+0200");
    push_line(out, "TZOFFSETTO:+0300");
    push_line(out, "TZNAME:EEST");
    push_line(out, "END:DAYLIGHT");
    push_line(out, "END:VTIMEZONE");
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn local(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn sample_event() -> CalendarEvent {
        CalendarEvent::new("Team Sync; Q3", local("2026-08-07T09:00:00"))
            .with_description("Agenda:\n- roadmap\n- budget")
            .with_location("Room 4, HQ")
            .with_uid("test@kalenteri.fi")
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a,b;c\\d"), "a\\,b\\;c\\\\d");
        assert_eq!(escape_text("line1\nline2"), "line1\\nline2");
        assert_eq!(escape_text("line1\r\nline2"), "line1\\nline2");
        assert_eq!(escape_text("plain"), "plain");
    }

    #[test]
    fn test_escaped_output_has_no_unescaped_specials() {
        let escaped = escape_text("a,b;c\\d\ne");
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    // Every backslash introduces a valid escape
                    assert!(matches!(chars.next(), Some('\\' | ',' | ';' | 'n')));
                }
                ',' | ';' | '\n' => panic!("unescaped special character"),
                _ => {}
            }
        }
    }

    #[test]
    fn test_summary_escaping_verbatim() {
        let record = generate(&sample_event()).unwrap();
        assert!(record.contains("SUMMARY:Team Sync\\; Q3"));
    }

    #[test]
    fn test_description_has_no_raw_newline() {
        let record = generate(&sample_event()).unwrap();
        let description = record
            .lines()
            .find(|l| l.starts_with("DESCRIPTION:"))
            .unwrap();
        assert!(description.contains("\\n"));
        assert!(!description.contains('\n'));
    }

    #[test]
    fn test_crlf_line_termination() {
        let record = generate(&sample_event()).unwrap();
        assert!(record.ends_with("END:VCALENDAR\r\n"));
        for line in record.split_inclusive("\r\n") {
            assert!(line.ends_with("\r\n"));
            // No stray LF inside a line
            assert_eq!(line.matches('\n').count(), 1);
        }
    }

    #[test]
    fn test_timezone_block_embedded() {
        let record = generate(&sample_event()).unwrap();
        assert!(record.contains("BEGIN:VTIMEZONE"));
        assert!(record.contains("TZID:Europe/Helsinki"));
        assert!(record.contains("TZOFFSETTO:+0200"));
        assert!(record.contains("TZOFFSETTO:+0300"));
        assert!(record.contains("RRULE:FREQ=YEARLY;BYMONTH=3;BYDAY=-1SU"));
        assert!(record.contains("RRULE:FREQ=YEARLY;BYMONTH=10;BYDAY=-1SU"));
    }

    #[test]
    fn test_timestamps_are_timezone_qualified() {
        let record = generate(&sample_event()).unwrap();
        assert!(record.contains("DTSTART;TZID=Europe/Helsinki:20260807T090000"));
        assert!(record.contains("DTEND;TZID=Europe/Helsinki:20260807T100000"));
    }

    #[test]
    fn test_optional_fields_omitted_when_absent() {
        let event = CalendarEvent::new("Standup", local("2026-08-07T09:00:00"));
        let record = generate(&event).unwrap();
        assert!(!record.contains("DESCRIPTION:"));
        assert!(!record.contains("LOCATION:"));
    }

    #[test]
    fn test_empty_title_fails_fast() {
        let event = CalendarEvent::new("  ", local("2026-08-07T09:00:00"));
        assert!(matches!(generate(&event), Err(KalenteriError::Codec(_))));
    }
}
