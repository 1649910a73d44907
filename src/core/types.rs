//! Shared types used across kalenteri modules
//!
//! Contains conversation messages, tool invocations, and tool catalog types.

use serde::{Deserialize, Serialize};

/// A message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (system, user, assistant, tool)
    pub role: String,
    /// Content of the message
    pub content: String,
    /// Tool invocations requested by the assistant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// For tool messages, the id of the invocation that produced this result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a new tool result message linked to the invocation that produced it
    pub fn tool(content: impl Into<String>, call_id: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: content.into(),
            tool_calls: None,
            tool_call_id: Some(call_id.into()),
        }
    }

    /// Invocations carried by this message, empty for non-assistant messages
    pub fn invocations(&self) -> &[ToolCall] {
        self.tool_calls.as_deref().unwrap_or(&[])
    }
}

/// A tool invocation issued by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique id of the invocation, echoed back in the tool result message
    pub id: String,
    /// Name of the tool to invoke
    pub name: String,
    /// Raw argument payload. Expected to be JSON but not guaranteed.
    pub arguments: String,
}

impl ToolCall {
    /// Create a new tool invocation
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// A tool catalog entry advertised by the tool-exposing peer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Name of the tool
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON Schema for the parameters
    pub parameters: serde_json::Value,
}

impl ToolSpec {
    /// Create a new catalog entry
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Function-calling representation of a tool, as the chat endpoint expects it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Type of tool (always "function")
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function details
    pub function: FunctionDefinition,
}

/// Function definition within a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Name of the function
    pub name: String,
    /// Description of what the function does
    pub description: String,
    /// JSON Schema for the parameters
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Translate a catalog entry into the chat endpoint's function format.
    /// Carries name, description, and schema over without semantic change.
    pub fn from_spec(spec: &ToolSpec) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: spec.name.clone(),
                description: spec.description.clone(),
                parameters: spec.parameters.clone(),
            },
        }
    }
}

/// One text segment of a tool result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
}

/// Result payload returned by the peer for one invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Ordered text segments produced by the tool
    pub content: Vec<TextContent>,
}

impl ToolOutput {
    /// Create an output with a single text segment
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextContent { text: text.into() }],
        }
    }

    /// Create an output from multiple text segments
    pub fn segments(segments: Vec<String>) -> Self {
        Self {
            content: segments
                .into_iter()
                .map(|text| TextContent { text })
                .collect(),
        }
    }

    /// All segments concatenated with newline separators
    pub fn joined(&self) -> String {
        self.content
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_message_back_reference() {
        let msg = Message::tool("3 event(s)", "call_42");
        assert_eq!(msg.role, "tool");
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_42"));
    }

    #[test]
    fn test_spec_translation_preserves_schema() {
        let spec = ToolSpec::new(
            "list_events",
            "List all events",
            serde_json::json!({"type": "object", "properties": {}}),
        );
        let def = ToolDefinition::from_spec(&spec);
        assert_eq!(def.tool_type, "function");
        assert_eq!(def.function.name, "list_events");
        assert_eq!(def.function.parameters, spec.parameters);
    }

    #[test]
    fn test_output_joined_with_newlines() {
        let output = ToolOutput::segments(vec!["2 event(s)".into(), "[]".into()]);
        assert_eq!(output.joined(), "2 event(s)\n[]");
    }
}
