//! Tool registry - manages and dispatches tool calls
//!
//! Central hub for the calendar tool catalog and for routing invocations
//! to handlers. The registry is also a tool-exposing peer: the HTTP peer
//! surface and the test suite connect to it directly.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::core::error::{KalenteriError, Result};
use crate::core::{ToolOutput, ToolSpec};
use crate::peer::{ToolPeer, ToolSession};
use crate::store::CalendarStore;
use crate::tools::calendar;

/// Registry of available tools
pub struct ToolRegistry {
    /// Tool catalog entries in advertisement order
    specs: Vec<ToolSpec>,
    /// Calendar backend the tools operate on
    store: Arc<dyn CalendarStore>,
}

impl ToolRegistry {
    /// Create a registry with the calendar tools registered
    pub fn new(store: Arc<dyn CalendarStore>) -> Self {
        Self {
            specs: calendar_specs(),
            store,
        }
    }

    /// The advertised tool catalog
    pub fn specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, args: &Value) -> Result<ToolOutput> {
        debug!(tool = name, "executing tool");
        match name {
            "create_event" => calendar::create_event(self.store.as_ref(), args).await,
            "list_events" => calendar::list_events(self.store.as_ref()).await,
            "list_events_range" => calendar::list_events_range(self.store.as_ref(), args).await,
            _ => Err(KalenteriError::tool(format!("unknown tool: {}", name))),
        }
    }
}

/// Catalog entries for the calendar tools
fn calendar_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec::new(
            "create_event",
            "Create a new calendar event. Times are Europe/Helsinki local time.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "title": {
                        "type": "string",
                        "description": "Event title"
                    },
                    "start": {
                        "type": "string",
                        "description": "Start time, format YYYY-MM-DDTHH:MM:SS"
                    },
                    "end": {
                        "type": "string",
                        "description": "End time; defaults to one hour after start"
                    },
                    "description": {
                        "type": "string",
                        "description": "Longer event description"
                    },
                    "location": {
                        "type": "string",
                        "description": "Event location"
                    }
                },
                "required": ["title", "start"]
            }),
        ),
        ToolSpec::new(
            "list_events",
            "List all calendar events",
            serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        ),
        ToolSpec::new(
            "list_events_range",
            "List calendar events inside a time window. Times are Europe/Helsinki local time.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "start": {
                        "type": "string",
                        "description": "Window start, format YYYY-MM-DDTHH:MM:SS"
                    },
                    "end": {
                        "type": "string",
                        "description": "Window end, format YYYY-MM-DDTHH:MM:SS"
                    }
                },
                "required": ["start", "end"]
            }),
        ),
    ]
}

/// An open session against the in-process registry
struct RegistrySession {
    registry: Arc<ToolRegistry>,
    open: bool,
}

#[async_trait]
impl ToolSession for RegistrySession {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>> {
        if !self.open {
            return Err(KalenteriError::peer("session is closed"));
        }
        Ok(self.registry.specs().to_vec())
    }

    async fn call_tool(&mut self, name: &str, arguments: Value) -> Result<ToolOutput> {
        if !self.open {
            return Err(KalenteriError::peer("session is closed"));
        }
        self.registry.execute(name, &arguments).await
    }

    async fn close(&mut self) {
        self.open = false;
    }
}

#[async_trait]
impl ToolPeer for Arc<ToolRegistry> {
    async fn connect(&self) -> Result<Box<dyn ToolSession>> {
        Ok(Box::new(RegistrySession {
            registry: Arc::clone(self),
            open: true,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn registry() -> Arc<ToolRegistry> {
        Arc::new(ToolRegistry::new(Arc::new(MemoryStore::new())))
    }

    #[test]
    fn test_catalog_has_three_tools() {
        let names: Vec<_> = registry().specs().iter().map(|s| s.name.clone()).collect();
        assert_eq!(names, ["create_event", "list_events", "list_events_range"]);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_an_error() {
        let result = registry()
            .execute("drop_table", &serde_json::json!({}))
            .await;
        assert!(matches!(result, Err(KalenteriError::ToolExecution(_))));
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let peer = registry();
        let mut session = peer.connect().await.unwrap();
        assert_eq!(session.list_tools().await.unwrap().len(), 3);

        session.close().await;
        assert!(session.list_tools().await.is_err());
        assert!(session
            .call_tool("list_events", serde_json::json!({}))
            .await
            .is_err());
    }
}
