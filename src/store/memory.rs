//! In-memory calendar store
//!
//! Keeps records in a map keyed by event identifier. Backs the test
//! suite; production runs use the CalDAV store.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::warn;

use crate::codec;
use crate::core::Result;
use crate::store::CalendarStore;

/// In-memory record store
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl CalendarStore for MemoryStore {
    async fn put_event(&self, uid: &str, record: &str) -> Result<()> {
        self.records
            .write()
            .await
            .insert(uid.to_string(), record.to_string());
        Ok(())
    }

    async fn list_events(&self) -> Result<Vec<String>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn list_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<String>> {
        let records = self.records.read().await;
        let mut matching = Vec::new();

        for record in records.values() {
            let events = match codec::parse(record) {
                Ok(events) => events,
                Err(err) => {
                    warn!(%err, "skipping unreadable record");
                    continue;
                }
            };

            if events.iter().any(|e| e.start < end && e.end > start) {
                matching.push(record.clone());
            }
        }

        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CalendarEvent;

    fn local(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        for (title, start) in [
            ("Morning", "2026-08-07T09:00:00"),
            ("Evening", "2026-08-07T19:00:00"),
            ("Next week", "2026-08-14T09:00:00"),
        ] {
            let event = CalendarEvent::new(title, local(start));
            let record = codec::generate(&event).unwrap();
            store.put_event(event.uid(), &record).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_put_and_list() {
        let store = seeded_store().await;
        assert_eq!(store.list_events().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_range_filters_by_overlap() {
        let store = seeded_store().await;
        let records = store
            .list_range(local("2026-08-07T09:00:00"), local("2026-08-07T17:00:00"))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].contains("SUMMARY:Morning"));
    }

    #[tokio::test]
    async fn test_range_is_start_inclusive_end_exclusive() {
        let store = seeded_store().await;
        // Event 09:00-10:00 does not overlap a window starting at 10:00
        let records = store
            .list_range(local("2026-08-07T10:00:00"), local("2026-08-07T12:00:00"))
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_put_overwrites_same_uid() {
        let store = MemoryStore::new();
        let event = CalendarEvent::new("First", local("2026-08-07T09:00:00"));
        let record = codec::generate(&event).unwrap();
        store.put_event("fixed", &record).await.unwrap();
        store.put_event("fixed", &record).await.unwrap();
        assert_eq!(store.len().await, 1);
    }
}
