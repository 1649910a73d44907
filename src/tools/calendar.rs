//! Calendar tool implementations
//!
//! The three operations the assistant can invoke. These are the only
//! callers of the codec; record I/O goes through the calendar store.

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::info;

use crate::codec::{self, CalendarEvent, ParsedEvent};
use crate::core::error::{KalenteriError, Result};
use crate::core::ToolOutput;
use crate::store::CalendarStore;

/// Create a new calendar event and store its record
pub async fn create_event(store: &dyn CalendarStore, args: &Value) -> Result<ToolOutput> {
    let title = require_str(args, "title")?;
    let start = parse_local(require_str(args, "start")?)?;

    let mut event = CalendarEvent::new(title, start);

    if let Some(end) = optional_str(args, "end") {
        event = event.with_end(parse_local(end)?);
    }
    if let Some(description) = optional_str(args, "description") {
        event = event.with_description(description);
    }
    if let Some(location) = optional_str(args, "location") {
        event = event.with_location(location);
    }

    let record = codec::generate(&event)?;
    store.put_event(event.uid(), &record).await?;

    info!(title = %event.title(), uid = %event.uid(), "created event");

    Ok(ToolOutput::text(format!(
        "Created event '{}' from {} to {} (Europe/Helsinki)",
        event.title(),
        event.start().format("%Y-%m-%d %H:%M"),
        event.end().format("%Y-%m-%d %H:%M"),
    )))
}

/// List all stored events
pub async fn list_events(store: &dyn CalendarStore) -> Result<ToolOutput> {
    let records = store.list_events().await?;
    render_events(&records)
}

/// List events overlapping a time window
pub async fn list_events_range(store: &dyn CalendarStore, args: &Value) -> Result<ToolOutput> {
    let start = parse_local(require_str(args, "start")?)?;
    let end = parse_local(require_str(args, "end")?)?;

    if end <= start {
        return Err(KalenteriError::tool("'end' must be after 'start'"));
    }

    let records = store.list_range(start, end).await?;
    render_events(&records)
}

/// Parse the stored records and serialize the events back to the caller
fn render_events(records: &[String]) -> Result<ToolOutput> {
    let mut events: Vec<ParsedEvent> = Vec::new();
    for record in records {
        events.extend(codec::parse(record)?);
    }
    events.sort_by_key(|e| e.start);

    let listing = serde_json::to_string_pretty(&events)?;
    Ok(ToolOutput::segments(vec![
        format!("{} event(s)", events.len()),
        listing,
    ]))
}

fn require_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    optional_str(args, key)
        .ok_or_else(|| KalenteriError::tool(format!("missing required argument '{}'", key)))
}

fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
}

/// Parse a Helsinki-local timestamp argument. Seconds are optional.
fn parse_local(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .map_err(|e| KalenteriError::tool(format!("bad timestamp '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn local(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[tokio::test]
    async fn test_create_event_stores_record() {
        let store = MemoryStore::new();
        let args = json!({
            "title": "Standup",
            "start": "2026-08-07T09:00:00",
            "location": "Room 4"
        });

        let output = create_event(&store, &args).await.unwrap();
        assert!(output.joined().contains("Standup"));

        let records = store.list_events().await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].contains("LOCATION:Room 4"));
    }

    #[tokio::test]
    async fn test_create_event_without_end_defaults_one_hour() {
        let store = MemoryStore::new();
        let args = json!({"title": "Standup", "start": "2026-08-07T09:00:00"});
        create_event(&store, &args).await.unwrap();

        let records = store.list_events().await.unwrap();
        let parsed = codec::parse(&records[0]).unwrap();
        assert_eq!((parsed[0].end - parsed[0].start).num_seconds(), 3600);
    }

    #[tokio::test]
    async fn test_create_event_missing_title_fails() {
        let store = MemoryStore::new();
        let args = json!({"start": "2026-08-07T09:00:00"});
        assert!(create_event(&store, &args).await.is_err());
    }

    #[tokio::test]
    async fn test_minutes_only_timestamp_accepted() {
        let store = MemoryStore::new();
        let args = json!({"title": "Standup", "start": "2026-08-07T09:00"});
        create_event(&store, &args).await.unwrap();

        let records = store.list_events().await.unwrap();
        let parsed = codec::parse(&records[0]).unwrap();
        assert_eq!(parsed[0].start, local("2026-08-07T09:00:00"));
    }

    #[tokio::test]
    async fn test_list_events_empty_store() {
        let store = MemoryStore::new();
        let output = list_events(&store).await.unwrap();
        assert!(output.joined().starts_with("0 event(s)"));
    }

    #[tokio::test]
    async fn test_list_range_rejects_inverted_window() {
        let store = MemoryStore::new();
        let args = json!({"start": "2026-08-07T17:00:00", "end": "2026-08-07T09:00:00"});
        assert!(list_events_range(&store, &args).await.is_err());
    }

    #[tokio::test]
    async fn test_list_range_returns_sorted_events() {
        let store = MemoryStore::new();
        for (title, start) in [("Late", "2026-08-07T15:00:00"), ("Early", "2026-08-07T09:30:00")] {
            let args = json!({"title": title, "start": start});
            create_event(&store, &args).await.unwrap();
        }

        let args = json!({"start": "2026-08-07T09:00:00", "end": "2026-08-07T17:00:00"});
        let output = list_events_range(&store, &args).await.unwrap();
        let joined = output.joined();
        assert!(joined.starts_with("2 event(s)"));
        assert!(joined.find("Early").unwrap() < joined.find("Late").unwrap());
    }
}
