//! Interchange record parsing
//!
//! Consumes one or more concatenated records and extracts the event blocks
//! as plain structured data. Continuation lines are unfolded and the text
//! escaping rules are reversed; timestamps resolve against the embedded
//! timezone qualification (or UTC markers) into Helsinki local time.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::codec::tz;
use crate::core::error::{KalenteriError, Result};

/// A structured event extracted from an interchange record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Parse one or more concatenated records into an ordered sequence of
/// events. The order follows the input; no backend storage order is
/// implied.
pub fn parse(input: &str) -> Result<Vec<ParsedEvent>> {
    let mut events = Vec::new();
    let mut block: Option<EventBlock> = None;

    for line in unfold(input) {
        if line == "BEGIN:VEVENT" {
            block = Some(EventBlock::default());
            continue;
        }

        if line == "END:VEVENT" {
            let current = block
                .take()
                .ok_or_else(|| KalenteriError::codec("END:VEVENT without BEGIN:VEVENT"))?;
            events.push(current.finish()?);
            continue;
        }

        if let Some(ref mut current) = block {
            current.absorb(&line)?;
        }
    }

    if block.is_some() {
        return Err(KalenteriError::codec("unterminated VEVENT block"));
    }

    Ok(events)
}

/// Partially collected VEVENT fields
#[derive(Default)]
struct EventBlock {
    uid: Option<String>,
    title: Option<String>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    description: Option<String>,
    location: Option<String>,
}

impl EventBlock {
    fn absorb(&mut self, line: &str) -> Result<()> {
        let Some((name, value)) = split_property(line) else {
            return Ok(());
        };

        match name.as_str() {
            "UID" => self.uid = Some(value.to_string()),
            "SUMMARY" => self.title = Some(unescape_text(value)),
            "DTSTART" => self.start = Some(tz::parse_stamp(value)?),
            "DTEND" => self.end = Some(tz::parse_stamp(value)?),
            "DESCRIPTION" => self.description = Some(unescape_text(value)),
            "LOCATION" => self.location = Some(unescape_text(value)),
            _ => {}
        }

        Ok(())
    }

    fn finish(self) -> Result<ParsedEvent> {
        let title = self
            .title
            .ok_or_else(|| KalenteriError::codec("event block missing SUMMARY"))?;
        let start = self
            .start
            .ok_or_else(|| KalenteriError::codec("event block missing DTSTART"))?;
        let end = self
            .end
            .ok_or_else(|| KalenteriError::codec("event block missing DTEND"))?;

        Ok(ParsedEvent {
            uid: self.uid,
            title,
            start,
            end,
            description: self.description,
            location: self.location,
        })
    }
}

/// Split a content line into its property name (parameters stripped) and
/// value. Returns None for lines without a colon.
fn split_property(line: &str) -> Option<(String, &str)> {
    let (head, value) = line.split_once(':')?;
    let name = head.split(';').next().unwrap_or(head);
    Some((name.to_ascii_uppercase(), value))
}

/// Undo line folding: logical lines continue on physical lines starting
/// with a space or tab. Accepts both CRLF and bare LF input.
fn unfold(input: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for raw in input.split('\n') {
        let physical = raw.strip_suffix('\r').unwrap_or(raw);
        if physical.starts_with(' ') || physical.starts_with('\t') {
            if let Some(last) = lines.last_mut() {
                last.push_str(&physical[1..]);
                continue;
            }
        }
        if !physical.is_empty() {
            lines.push(physical.to_string());
        }
    }

    lines
}

/// Reverse the text escaping applied at generation time
fn unescape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(escaped) => out.push(escaped),
            None => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::event::CalendarEvent;
    use crate::codec::generate::generate;

    fn local(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn test_unescape_text() {
        assert_eq!(unescape_text("a\\,b\\;c\\\\d"), "a,b;c\\d");
        assert_eq!(unescape_text("line1\\nline2"), "line1\nline2");
    }

    #[test]
    fn test_unfold_continuation_lines() {
        let lines = unfold("SUMMARY:part one\r\n  and part two\r\nUID:x\r\n");
        assert_eq!(lines[0], "SUMMARY:part one and part two");
        assert_eq!(lines[1], "UID:x");
    }

    #[test]
    fn test_round_trip_recovers_all_fields() {
        let event = CalendarEvent::new("Team Sync; Q3", local("2026-08-07T09:00:00"))
            .with_end(local("2026-08-07T10:30:00"))
            .with_description("Agenda:\n- roadmap, budget")
            .with_location("Room 4; HQ");

        let record = generate(&event).unwrap();
        let parsed = parse(&record).unwrap();

        assert_eq!(parsed.len(), 1);
        let got = &parsed[0];
        assert_eq!(got.title, "Team Sync; Q3");
        assert_eq!(got.start, event.start());
        assert_eq!(got.end, event.end());
        assert_eq!(got.description.as_deref(), Some("Agenda:\n- roadmap, budget"));
        assert_eq!(got.location.as_deref(), Some("Room 4; HQ"));
        assert_eq!(got.uid.as_deref(), Some(event.uid()));
    }

    #[test]
    fn test_concatenated_records() {
        let first = generate(&CalendarEvent::new("One", local("2026-08-07T09:00:00"))).unwrap();
        let second = generate(&CalendarEvent::new("Two", local("2026-08-08T12:00:00"))).unwrap();

        let parsed = parse(&format!("{}{}", first, second)).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].title, "One");
        assert_eq!(parsed[1].title, "Two");
    }

    #[test]
    fn test_utc_stamps_resolve_to_helsinki() {
        let record = "BEGIN:VEVENT\r\nSUMMARY:X\r\nDTSTART:20260701T120000Z\r\nDTEND:20260701T130000Z\r\nEND:VEVENT\r\n";
        let parsed = parse(record).unwrap();
        assert_eq!(parsed[0].start, local("2026-07-01T15:00:00"));
        assert_eq!(parsed[0].end, local("2026-07-01T16:00:00"));
    }

    #[test]
    fn test_missing_required_field_is_an_error() {
        let record = "BEGIN:VEVENT\r\nDTSTART:20260701T120000\r\nDTEND:20260701T130000\r\nEND:VEVENT\r\n";
        assert!(parse(record).is_err());
    }

    #[test]
    fn test_unterminated_block_is_an_error() {
        assert!(parse("BEGIN:VEVENT\r\nSUMMARY:X\r\n").is_err());
    }

    #[test]
    fn test_empty_input_yields_no_events() {
        assert!(parse("").unwrap().is_empty());
    }
}
