//! Conversation log
//!
//! An append-only ordered message sequence, owned solely by the running
//! session and discarded when it ends.

use crate::core::Message;

/// Append-only conversation log
#[derive(Debug, Default)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message. Messages are never mutated or removed.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The full ordered sequence
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Content of the most recently appended message
    pub fn last_content(&self) -> Option<&str> {
        self.messages.last().map(|m| m.content.as_str())
    }

    /// Get message count
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut log = ConversationLog::new();
        log.push(Message::system("rules"));
        log.push(Message::user("hello"));
        log.push(Message::assistant("hi"));

        let roles: Vec<_> = log.messages().iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, ["system", "user", "assistant"]);
    }

    #[test]
    fn test_last_content() {
        let mut log = ConversationLog::new();
        assert!(log.last_content().is_none());

        log.push(Message::user("hello"));
        log.push(Message::tool("3 event(s)", "call_1"));
        assert_eq!(log.last_content(), Some("3 event(s)"));
    }
}
