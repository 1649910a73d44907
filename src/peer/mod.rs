//! Tool-exposing peer abstraction
//!
//! The orchestrator reaches its tools through these traits: a peer hands
//! out one session per run, and the session is released on every exit
//! path. The in-process registry and the HTTP client both implement them.

pub mod client;

pub use client::HttpToolPeer;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::{Result, ToolOutput, ToolSpec};

/// An open connection to a tool-exposing peer
#[async_trait]
pub trait ToolSession: Send {
    /// Retrieve the tool catalog. Fetched once per session.
    async fn list_tools(&self) -> Result<Vec<ToolSpec>>;

    /// Invoke a tool with already-parsed arguments
    async fn call_tool(&mut self, name: &str, arguments: Value) -> Result<ToolOutput>;

    /// Release the connection. Safe to call after a failure; never fails.
    async fn close(&mut self);
}

/// A peer that can open tool sessions
#[async_trait]
pub trait ToolPeer: Send + Sync {
    /// Establish a connection for one session
    async fn connect(&self) -> Result<Box<dyn ToolSession>>;
}
