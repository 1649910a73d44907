//! Structured calendar event
//!
//! The in-memory form the codec translates to and from interchange records.
//! Persistence belongs to the calendar backend, not to this type.

use chrono::{Duration, NaiveDateTime};
use uuid::Uuid;

use crate::codec::tz;

/// Domain suffix for generated event identifiers
pub const UID_DOMAIN: &str = "kalenteri.fi";

/// A calendar event in Europe/Helsinki civil time
#[derive(Debug, Clone)]
pub struct CalendarEvent {
    title: String,
    start: NaiveDateTime,
    end: Option<NaiveDateTime>,
    description: Option<String>,
    location: Option<String>,
    uid: String,
    created: NaiveDateTime,
}

impl CalendarEvent {
    /// Create a new event. A unique identifier and creation timestamp are
    /// assigned here; both can be overridden with the builder methods.
    pub fn new(title: impl Into<String>, start: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            start,
            end: None,
            description: None,
            location: None,
            uid: format!("{}@{}", Uuid::new_v4(), UID_DOMAIN),
            created: tz::now(),
        }
    }

    /// Set an explicit end instant
    pub fn with_end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Use a caller-supplied unique identifier
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }

    /// Override the creation timestamp
    pub fn with_created(mut self, created: NaiveDateTime) -> Self {
        self.created = created;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// End instant; one hour after the start when none was supplied
    pub fn end(&self) -> NaiveDateTime {
        self.end.unwrap_or_else(|| self.start + Duration::hours(1))
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn created(&self) -> NaiveDateTime {
        self.created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn test_default_end_is_one_hour_after_start() {
        let event = CalendarEvent::new("Standup", local("2026-08-07T09:00:00"));
        assert_eq!(event.end() - event.start(), Duration::seconds(3600));
    }

    #[test]
    fn test_explicit_end_wins() {
        let event = CalendarEvent::new("Standup", local("2026-08-07T09:00:00"))
            .with_end(local("2026-08-07T09:15:00"));
        assert_eq!(event.end(), local("2026-08-07T09:15:00"));
    }

    #[test]
    fn test_generated_uid_is_domain_qualified() {
        let event = CalendarEvent::new("Standup", local("2026-08-07T09:00:00"));
        assert!(event.uid().ends_with("@kalenteri.fi"));
    }

    #[test]
    fn test_caller_supplied_uid_is_kept() {
        let event = CalendarEvent::new("Standup", local("2026-08-07T09:00:00"))
            .with_uid("fixed@example.org");
        assert_eq!(event.uid(), "fixed@example.org");
    }
}
