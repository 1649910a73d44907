//! CalDAV calendar store
//!
//! Stores each event as one record under `{collection}/{uid}.ics` and
//! lists events with calendar-query REPORTs. The multistatus responses
//! embed complete records, which are handed back verbatim; interpretation
//! stays with the codec.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, Method, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::codec::tz;
use crate::core::error::{KalenteriError, Result};
use crate::store::CalendarStore;

/// CalDAV client for a single calendar collection
pub struct CalDavStore {
    client: Client,
    collection_url: String,
}

impl CalDavStore {
    /// Create a store for the given collection URL
    pub fn new(collection_url: impl Into<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            collection_url: collection_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn report(&self, body: String) -> Result<Vec<String>> {
        let method = Method::from_bytes(b"REPORT").expect("valid method token");

        let response = self
            .client
            .request(method, &self.collection_url)
            .header("Depth", "1")
            .header("Content-Type", "application/xml; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    KalenteriError::store(format!(
                        "Cannot connect to calendar backend at {}",
                        self.collection_url
                    ))
                } else {
                    KalenteriError::from(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(KalenteriError::store(format!(
                "Calendar backend error ({}): {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        let records = extract_records(&body);
        debug!(count = records.len(), "calendar query returned records");
        Ok(records)
    }
}

#[async_trait]
impl CalendarStore for CalDavStore {
    async fn put_event(&self, uid: &str, record: &str) -> Result<()> {
        let url = format!("{}/{}.ics", self.collection_url, uid);

        let response = self
            .client
            .put(&url)
            .header("Content-Type", "text/calendar; charset=utf-8")
            .body(record.to_string())
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    KalenteriError::store(format!(
                        "Cannot connect to calendar backend at {}",
                        self.collection_url
                    ))
                } else {
                    KalenteriError::from(e)
                }
            })?;

        match response.status() {
            StatusCode::CREATED | StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(KalenteriError::store(format!(
                    "Failed to store event ({}): {}",
                    status, error_text
                )))
            }
        }
    }

    async fn list_events(&self) -> Result<Vec<String>> {
        self.report(calendar_query(None)).await
    }

    async fn list_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<String>> {
        self.report(calendar_query(Some((start, end)))).await
    }
}

/// Build a calendar-query REPORT body, optionally bounded by a UTC
/// time-range filter.
fn calendar_query(range: Option<(NaiveDateTime, NaiveDateTime)>) -> String {
    let time_range = match range {
        Some((start, end)) => format!(
            r#"<C:comp-filter name="VEVENT"><C:time-range start="{}" end="{}"/></C:comp-filter>"#,
            tz::format_utc_stamp(start),
            tz::format_utc_stamp(end)
        ),
        None => r#"<C:comp-filter name="VEVENT"/>"#.to_string(),
    };

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<C:calendar-query xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <D:prop><C:calendar-data/></D:prop>
  <C:filter><C:comp-filter name="VCALENDAR">{}</C:comp-filter></C:filter>
</C:calendar-query>"#,
        time_range
    )
}

/// Pull the embedded records out of a multistatus body. The calendar-data
/// elements carry complete VCALENDAR blocks as (possibly entity-escaped)
/// text.
fn extract_records(body: &str) -> Vec<String> {
    let unescaped = unescape_xml(body);
    let mut records = Vec::new();
    let mut rest = unescaped.as_str();

    while let Some(start) = rest.find("BEGIN:VCALENDAR") {
        let tail = &rest[start..];
        let Some(end) = tail.find("END:VCALENDAR") else {
            break;
        };
        let stop = end + "END:VCALENDAR".len();
        records.push(tail[..stop].to_string());
        rest = &tail[stop..];
    }

    records
}

fn unescape_xml(input: &str) -> String {
    input
        .replace("&#13;", "\r")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_records_from_multistatus() {
        let body = r#"<?xml version="1.0"?>
<D:multistatus xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <D:response>
    <C:calendar-data>BEGIN:VCALENDAR&#13;
VERSION:2.0&#13;
BEGIN:VEVENT&#13;
SUMMARY:One&#13;
END:VEVENT&#13;
END:VCALENDAR</C:calendar-data>
  </D:response>
  <D:response>
    <C:calendar-data>BEGIN:VCALENDAR
BEGIN:VEVENT
SUMMARY:Two
END:VEVENT
END:VCALENDAR</C:calendar-data>
  </D:response>
</D:multistatus>"#;

        let records = extract_records(body);
        assert_eq!(records.len(), 2);
        assert!(records[0].contains("SUMMARY:One"));
        assert!(records[1].contains("SUMMARY:Two"));
    }

    #[test]
    fn test_query_carries_utc_time_range() {
        let start = NaiveDateTime::parse_from_str("2026-08-07T09:00:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        let end = NaiveDateTime::parse_from_str("2026-08-07T17:00:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        let body = calendar_query(Some((start, end)));
        // EEST is three hours ahead of UTC in August
        assert!(body.contains(r#"start="20260807T060000Z""#));
        assert!(body.contains(r#"end="20260807T140000Z""#));
    }

    #[test]
    fn test_unbounded_query_has_no_time_range() {
        assert!(!calendar_query(None).contains("time-range"));
    }
}
