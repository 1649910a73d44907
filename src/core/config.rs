//! Configuration management for kalenteri
//!
//! Supports environment variables, config files, and runtime overrides.
//! The chat endpoint and tool peer addresses must be valid before any
//! session may start; `validate` is called once at process start.
//!
//! Config file location: ~/.config/kalenteri/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use url::Url;

use crate::core::error::{KalenteriError, Result};

/// Main configuration for kalenteri
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chat completion endpoint configuration
    pub chat: ChatConfig,
    /// Tool-exposing peer configuration
    pub peer: PeerConfig,
    /// Session orchestration configuration
    #[serde(default)]
    pub agent: AgentConfig,
    /// Calendar backend configuration
    pub store: StoreConfig,
    /// HTTP service configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Audio transcription configuration
    #[serde(default)]
    pub transcription: TranscriptionConfig,
}

/// Chat completion endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Base URL of an OpenAI-compatible API (e.g. http://localhost:11434/v1)
    pub endpoint: String,
    /// Bearer token, omitted for local endpoints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model used for tool-calling sessions
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Tool-exposing peer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerConfig {
    /// Base URL of the tool peer surface
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Session orchestration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum chat rounds per session before giving up
    pub max_rounds: usize,
}

/// Calendar backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// CalDAV collection URL the event records are stored under
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// HTTP service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
}

/// Audio transcription configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// Base URL of an OpenAI-compatible transcription API. When absent,
    /// audio uploads are rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Transcription model name
    pub model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chat: ChatConfig::default(),
            peer: PeerConfig::default(),
            agent: AgentConfig::default(),
            store: StoreConfig::default(),
            server: ServerConfig::default(),
            transcription: TranscriptionConfig::default(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: env::var("KALENTERI_CHAT_URL")
                .unwrap_or_else(|_| "http://localhost:11434/v1".to_string()),
            api_key: env::var("KALENTERI_CHAT_API_KEY").ok(),
            model: env::var("KALENTERI_MODEL").unwrap_or_else(|_| "qwen3:8b".to_string()),
            timeout_secs: 120,
        }
    }
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            endpoint: env::var("KALENTERI_PEER_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8080/tools".to_string()),
            timeout_secs: 30,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self { max_rounds: 5 }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: env::var("KALENTERI_CALDAV_URL")
                .unwrap_or_else(|_| "http://localhost:5232/calendars/default".to_string()),
            timeout_secs: 30,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: env::var("KALENTERI_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("KALENTERI_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            endpoint: env::var("KALENTERI_TRANSCRIPTION_URL").ok(),
            model: env::var("KALENTERI_TRANSCRIPTION_MODEL")
                .unwrap_or_else(|_| "whisper-1".to_string()),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kalenteri")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        // Try to load from config file
        if let Ok(config) = Self::load_from_file() {
            return config;
        }

        // Fall back to defaults (which respect env vars)
        Self::default()
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(KalenteriError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| KalenteriError::config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| KalenteriError::config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Validate the configuration. Missing or malformed endpoint addresses
    /// are fatal at process start, not per-request failures.
    pub fn validate(&self) -> Result<()> {
        Self::require_url("chat.endpoint", &self.chat.endpoint)?;
        Self::require_url("peer.endpoint", &self.peer.endpoint)?;
        Self::require_url("store.endpoint", &self.store.endpoint)?;

        if let Some(ref endpoint) = self.transcription.endpoint {
            Self::require_url("transcription.endpoint", endpoint)?;
        }

        if self.chat.model.trim().is_empty() {
            return Err(KalenteriError::config("chat.model must not be empty"));
        }

        if self.agent.max_rounds == 0 {
            return Err(KalenteriError::config("agent.max_rounds must be at least 1"));
        }

        Ok(())
    }

    fn require_url(field: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(KalenteriError::config(format!("{} is not set", field)));
        }

        Url::parse(value)
            .map_err(|e| KalenteriError::config(format!("{} is not a valid URL: {}", field, e)))?;

        Ok(())
    }

    /// Generate a default config file content for display
    pub fn default_config_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config)
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.agent.max_rounds, 5);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.chat.timeout_secs, 120);
    }

    #[test]
    fn test_default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_endpoint_is_fatal() {
        let mut config = Config::default();
        config.peer.endpoint = String::new();
        assert!(matches!(
            config.validate(),
            Err(KalenteriError::Config(_))
        ));
    }

    #[test]
    fn test_malformed_endpoint_is_fatal() {
        let mut config = Config::default();
        config.chat.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let mut config = Config::default();
        config.agent.max_rounds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let toml_str = Config::default_config_toml();
        assert!(toml_str.contains("max_rounds"));
        assert!(toml_str.contains("endpoint"));
    }
}
