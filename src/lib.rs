//! kalenteri - Voice-Driven Calendar Assistant
//!
//! A Rust service that turns transcribed speech into calendar actions: a
//! language model interprets the prompt and invokes calendar tools backed
//! by a CalDAV store holding iCalendar records.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: Chat endpoint abstraction with an OpenAI-compatible client
//! - **Peer**: Tool-exposing peer traits and HTTP client
//! - **Tools**: Calendar tools and the tool registry
//! - **Agent**: The bounded tool-calling session loop
//! - **Codec**: iCalendar record generation and parsing
//! - **Store**: Calendar backends (CalDAV, in-memory)
//! - **Server**: HTTP boundary with audio transcription call-through
//!
//! # Usage
//!
//! ```rust,no_run
//! use kalenteri::agent::Orchestrator;
//! use kalenteri::core::Config;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load();
//!     config.validate().unwrap();
//!
//!     let orchestrator = Orchestrator::from_config(&config);
//!     let outcome = orchestrator.run("What is on my calendar tomorrow?").await.unwrap();
//!     println!("{}", outcome.answer);
//! }
//! ```

pub mod agent;
pub mod codec;
pub mod core;
pub mod llm;
pub mod peer;
pub mod server;
pub mod store;
pub mod tools;

// Re-export commonly used items
pub use agent::{Orchestrator, SessionOutcome};
pub use core::{Config, KalenteriError, Result};
