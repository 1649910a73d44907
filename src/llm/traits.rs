//! Chat provider trait for abstracting different backends
//!
//! Enables swapping the chat completion endpoint, and lets the test suite
//! drive sessions with scripted responses.

use async_trait::async_trait;

use crate::core::{Message, Result, ToolDefinition};

/// Response from a chat completion endpoint: the single chosen message,
/// possibly carrying tool invocations.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// The assistant message
    pub message: Message,
    /// Model that generated the response
    pub model: String,
}

/// Trait for chat completion endpoints
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send the conversation and tool catalog, requesting automatic
    /// tool-choice
    async fn chat_with_tools(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<ChatResponse>;

    /// Get the provider name
    fn name(&self) -> &str;
}
