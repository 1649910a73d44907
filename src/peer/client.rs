//! HTTP client for the tool peer surface
//!
//! Speaks the two-route JSON contract (`/list`, `/call`). Each session
//! holds its own connection, created on connect and dropped on close.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::core::error::{KalenteriError, Result};
use crate::core::{ToolOutput, ToolSpec};
use crate::peer::{ToolPeer, ToolSession};

/// Tool peer reachable over HTTP
pub struct HttpToolPeer {
    endpoint: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ListToolsResponse {
    tools: Vec<ToolSpec>,
}

#[derive(Debug, Serialize)]
struct CallToolRequest<'a> {
    name: &'a str,
    arguments: Value,
}

impl HttpToolPeer {
    /// Create a peer handle for the given base URL
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[async_trait]
impl ToolPeer for HttpToolPeer {
    async fn connect(&self) -> Result<Box<dyn ToolSession>> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| KalenteriError::peer(format!("Failed to create connection: {}", e)))?;

        debug!(endpoint = %self.endpoint, "opened tool peer session");

        Ok(Box::new(HttpToolSession {
            client: Some(client),
            endpoint: self.endpoint.clone(),
        }))
    }
}

/// One open HTTP session. The connection is dropped on close; further
/// calls fail instead of silently reconnecting.
struct HttpToolSession {
    client: Option<Client>,
    endpoint: String,
}

impl HttpToolSession {
    fn client(&self) -> Result<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| KalenteriError::peer("session is closed"))
    }

    fn map_send_error(&self, e: reqwest::Error) -> KalenteriError {
        if e.is_connect() {
            KalenteriError::peer(format!(
                "Cannot connect to tool peer at {}. Is it running?",
                self.endpoint
            ))
        } else {
            KalenteriError::from(e)
        }
    }
}

#[async_trait]
impl ToolSession for HttpToolSession {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>> {
        let response = self
            .client()?
            .post(format!("{}/list", self.endpoint))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(KalenteriError::peer(format!(
                "Tool catalog request failed ({}): {}",
                status, error_text
            )));
        }

        let listing: ListToolsResponse = response.json().await?;
        Ok(listing.tools)
    }

    async fn call_tool(&mut self, name: &str, arguments: Value) -> Result<ToolOutput> {
        let request = CallToolRequest { name, arguments };

        let response = self
            .client()?
            .post(format!("{}/call", self.endpoint))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(KalenteriError::tool(format!(
                "Tool '{}' failed ({}): {}",
                name, status, error_text
            )));
        }

        let output: ToolOutput = response.json().await?;
        Ok(output)
    }

    async fn close(&mut self) {
        if self.client.take().is_some() {
            debug!(endpoint = %self.endpoint, "closed tool peer session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_calls_after_close_fail() {
        let peer = HttpToolPeer::new("http://127.0.0.1:9/tools", 1);
        let mut session = peer.connect().await.unwrap();
        session.close().await;

        assert!(session.list_tools().await.is_err());
        assert!(session
            .call_tool("list_events", serde_json::json!({}))
            .await
            .is_err());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let peer = HttpToolPeer::new("http://127.0.0.1:8080/tools/", 1);
        assert_eq!(peer.endpoint, "http://127.0.0.1:8080/tools");
    }
}
