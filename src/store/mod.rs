//! Calendar backend - storage for interchange-format records
//!
//! The store traffics in raw records only; structured interpretation
//! belongs to the codec. Implementations: a CalDAV client for production
//! and an in-memory store for tests and offline runs.

pub mod caldav;
pub mod memory;

pub use caldav::CalDavStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::core::Result;

/// Calendar backend contract: create/list/list-by-range, returning raw
/// interchange-format text per event.
#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// Store one record under the event's unique identifier
    async fn put_event(&self, uid: &str, record: &str) -> Result<()>;

    /// All stored records, one per event
    async fn list_events(&self) -> Result<Vec<String>>;

    /// Records for events overlapping [start, end) in Helsinki local time
    async fn list_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<String>>;
}
