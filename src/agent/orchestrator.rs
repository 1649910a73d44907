//! Session orchestrator
//!
//! Drives a bounded multi-round conversation with the chat endpoint,
//! dispatches model-issued tool invocations to the tool peer, and folds
//! the results back into the conversation until the model produces a
//! final answer or the round budget runs out.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::agent::conversation::ConversationLog;
use crate::codec::tz;
use crate::core::error::{KalenteriError, Result};
use crate::core::{Config, Message, ToolDefinition, ToolSpec};
use crate::llm::{ChatProvider, OpenAiChatClient};
use crate::peer::{HttpToolPeer, ToolPeer, ToolSession};

/// Result of one assistant session
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    /// Final answer text
    pub answer: String,
    /// Number of tool invocations executed
    pub tool_call_count: u32,
}

/// Orchestrates chat rounds and tool execution for one prompt at a time.
/// Each `run` call owns its own conversation log and peer connection, so
/// concurrent sessions are fully independent.
pub struct Orchestrator {
    chat: Arc<dyn ChatProvider>,
    peer: Arc<dyn ToolPeer>,
    model: String,
    max_rounds: usize,
}

impl Orchestrator {
    /// Create an orchestrator from its collaborators
    pub fn new(
        chat: Arc<dyn ChatProvider>,
        peer: Arc<dyn ToolPeer>,
        model: impl Into<String>,
        max_rounds: usize,
    ) -> Self {
        Self {
            chat,
            peer,
            model: model.into(),
            max_rounds,
        }
    }

    /// Create an orchestrator wired to the configured endpoints. The
    /// configuration must have been validated at startup.
    pub fn from_config(config: &Config) -> Self {
        let chat = OpenAiChatClient::new(
            &config.chat.endpoint,
            config.chat.api_key.clone(),
            config.chat.timeout_secs,
        );
        let peer = HttpToolPeer::new(&config.peer.endpoint, config.peer.timeout_secs);

        Self::new(
            Arc::new(chat),
            Arc::new(peer),
            &config.chat.model,
            config.agent.max_rounds,
        )
    }

    /// Run one session for a free-text prompt
    pub async fn run(&self, prompt: &str) -> Result<SessionOutcome> {
        if prompt.trim().is_empty() {
            return Err(KalenteriError::session("prompt must not be empty"));
        }

        let mut session = self.peer.connect().await?;
        let result = self.drive(session.as_mut(), prompt).await;
        // The connection is released on every exit path
        session.close().await;
        result
    }

    async fn drive(
        &self,
        session: &mut dyn ToolSession,
        prompt: &str,
    ) -> Result<SessionOutcome> {
        let catalog = session.list_tools().await?;
        let tools: Vec<ToolDefinition> = catalog.iter().map(ToolDefinition::from_spec).collect();

        let mut log = ConversationLog::new();
        log.push(Message::system(system_prompt(&catalog, tz::now())));
        log.push(Message::user(prompt));

        let mut tool_call_count: u32 = 0;

        for round in 1..=self.max_rounds {
            let response = self
                .chat
                .chat_with_tools(&self.model, log.messages(), &tools)
                .await?;

            let assistant = response.message;
            log.push(assistant.clone());

            let invocations = assistant.invocations().to_vec();
            if invocations.is_empty() {
                debug!(round, tool_call_count, "assistant produced final answer");
                return Ok(SessionOutcome {
                    answer: assistant.content,
                    tool_call_count,
                });
            }

            debug!(round, count = invocations.len(), "executing tool invocations");

            // Invocations run strictly in the order the model issued them;
            // later calls may depend on earlier results.
            for call in &invocations {
                let args = parse_args_or_empty(&call.arguments);
                let output = session.call_tool(&call.name, args).await?;
                log.push(Message::tool(output.joined(), &call.id));
                tool_call_count += 1;
            }
        }

        // Budget exhausted without a final answer: return whatever came
        // last rather than failing the session.
        warn!(
            max_rounds = self.max_rounds,
            tool_call_count, "round budget exhausted"
        );

        Ok(SessionOutcome {
            answer: log.last_content().unwrap_or_default().to_string(),
            tool_call_count,
        })
    }
}

/// Parse a tool invocation's argument payload, substituting an empty
/// argument set when the payload is not valid JSON. The session must not
/// abort on malformed arguments.
pub fn parse_args_or_empty(raw: &str) -> serde_json::Value {
    if raw.trim().is_empty() {
        return serde_json::json!({});
    }

    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(%err, payload = raw, "malformed tool arguments, substituting empty set");
            serde_json::json!({})
        }
    }
}

/// Build the session system message: current date/time in the assistant's
/// timezone, the permitted tools, the refusal rule, and the tool
/// preference policy. The listing-before-creation rule is prompt-level
/// policy only; the loop never reorders or vetoes invocations.
fn system_prompt(catalog: &[ToolSpec], now: NaiveDateTime) -> String {
    let tool_names = catalog
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a voice-driven calendar assistant.\n\
         Current date and time: {} ({}).\n\
         All times you read or write are {} local time, format YYYY-MM-DDTHH:MM:SS.\n\
         \n\
         You may ONLY use these tools: {}.\n\
         - When the request implies a time window, prefer list_events_range.\n\
         - Otherwise fall back to list_events.\n\
         - ALWAYS check existing events with a listing tool before creating one, to avoid double-booking.\n\
         \n\
         If the request is not about the calendar, refuse in one sentence of at most 120 characters.",
        now.format("%A %Y-%m-%d %H:%M"),
        tz::TZID,
        tz::TZID,
        tool_names,
    )
}
