//! OpenAI-compatible chat client
//!
//! Async HTTP client for `/chat/completions` endpoints with tool calling.
//! Works with OpenAI, OpenRouter, Ollama, vLLM, and other compatible
//! servers.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::core::error::{KalenteriError, Result};
use crate::core::{Message, ToolCall, ToolDefinition};
use crate::llm::traits::{ChatProvider, ChatResponse};

/// OpenAI-compatible API client
#[derive(Clone)]
pub struct OpenAiChatClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'a str>,
}

/// Message in API format
#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ApiToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

/// Tool call in API format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiToolCall {
    id: String,
    #[serde(rename = "type")]
    call_type: String,
    function: ApiFunction,
}

/// Function within an API tool call. Arguments arrive as a JSON string,
/// well-formed or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiFunction {
    name: String,
    arguments: String,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    #[serde(default)]
    model: String,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ApiToolCall>>,
}

impl OpenAiChatClient {
    /// Create a new client for the given base URL
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Convert internal Message to API format
    fn to_api_message(msg: &Message) -> ApiMessage {
        ApiMessage {
            role: msg.role.clone(),
            content: Some(msg.content.clone()),
            tool_calls: msg.tool_calls.as_ref().map(|calls| {
                calls
                    .iter()
                    .map(|tc| ApiToolCall {
                        id: tc.id.clone(),
                        call_type: "function".to_string(),
                        function: ApiFunction {
                            name: tc.name.clone(),
                            arguments: tc.arguments.clone(),
                        },
                    })
                    .collect()
            }),
            tool_call_id: msg.tool_call_id.clone(),
        }
    }

    /// Convert the API response into the chosen assistant message
    fn to_chat_response(response: ApiResponse) -> Result<ChatResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| KalenteriError::chat("response contained no choices"))?;

        let tool_calls: Vec<ToolCall> = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        let message = Message {
            role: "assistant".to_string(),
            content: choice.message.content.unwrap_or_default(),
            tool_calls: if tool_calls.is_empty() {
                None
            } else {
                Some(tool_calls)
            },
            tool_call_id: None,
        };

        Ok(ChatResponse {
            message,
            model: response.model,
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiChatClient {
    async fn chat_with_tools(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<ChatResponse> {
        let api_messages: Vec<ApiMessage> = messages.iter().map(Self::to_api_message).collect();

        let request = ApiRequest {
            model,
            messages: api_messages,
            tools: if tools.is_empty() { None } else { Some(tools) },
            tool_choice: if tools.is_empty() { None } else { Some("auto") },
        };

        debug!(model, messages = messages.len(), tools = tools.len(), "sending chat request");

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request);

        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() {
                KalenteriError::chat(format!(
                    "Cannot connect to chat endpoint at {}. Is it running?",
                    self.base_url
                ))
            } else {
                KalenteriError::from(e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(KalenteriError::chat(format!(
                "Chat API error ({}): {}",
                status, error_text
            )));
        }

        let response_text = response.text().await?;
        let api_response: ApiResponse = serde_json::from_str(&response_text)
            .map_err(|e| KalenteriError::chat(format!("Failed to parse response: {}", e)))?;

        Self::to_chat_response(api_response)
    }

    fn name(&self) -> &str {
        "openai-compat"
    }
}
