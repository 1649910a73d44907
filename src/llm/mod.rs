//! LLM module - chat completion endpoint integrations
//!
//! Provides the chat provider abstraction with an OpenAI-compatible
//! implementation.

pub mod openai;
pub mod traits;

pub use openai::OpenAiChatClient;
pub use traits::{ChatProvider, ChatResponse};
