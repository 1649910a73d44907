//! Custom error types for kalenteri
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for kalenteri operations
#[derive(Error, Debug)]
pub enum KalenteriError {
    /// Chat endpoint connection or API errors
    #[error("Chat endpoint error: {0}")]
    Chat(String),

    /// Tool peer connection or protocol errors
    #[error("Tool peer error: {0}")]
    Peer(String),

    /// Tool execution errors
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Session orchestration errors
    #[error("Session error: {0}")]
    Session(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Calendar record generation or parsing errors
    #[error("Codec error: {0}")]
    Codec(String),

    /// Calendar backend errors
    #[error("Calendar store error: {0}")]
    Store(String),

    /// Audio transcription errors
    #[error("Transcription error: {0}")]
    Transcription(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for kalenteri operations
pub type Result<T> = std::result::Result<T, KalenteriError>;

impl KalenteriError {
    /// Create a chat endpoint error
    pub fn chat(msg: impl Into<String>) -> Self {
        Self::Chat(msg.into())
    }

    /// Create a tool peer error
    pub fn peer(msg: impl Into<String>) -> Self {
        Self::Peer(msg.into())
    }

    /// Create a tool execution error
    pub fn tool(msg: impl Into<String>) -> Self {
        Self::ToolExecution(msg.into())
    }

    /// Create a session error
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a codec error
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Create a calendar store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a transcription error
    pub fn transcription(msg: impl Into<String>) -> Self {
        Self::Transcription(msg.into())
    }
}
