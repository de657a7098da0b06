// src/chat/conversation.rs
// Conversation shape validation: the submitted messages are split into
// (system override, prior history, last user turn) before any
// side-effecting work happens.

use serde::{Deserialize, Serialize};

use super::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// The validated parts of a submitted conversation.
#[derive(Debug)]
pub struct SplitConversation {
    /// Instructions carried by system-role messages, if any (last one wins).
    pub system_override: Option<String>,
    /// Prior user/assistant turns, in order, excluding the final entry.
    pub history: Vec<ChatMessage>,
    /// The final entry; always has role `user`.
    pub last_user: ChatMessage,
}

/// Split a conversation into history and the trailing user turn.
///
/// Rejects empty conversations and conversations whose final entry is not
/// from the user. System-role messages are lifted out of the history and
/// become the instruction override.
pub fn split_conversation(mut messages: Vec<ChatMessage>) -> Result<SplitConversation, ChatError> {
    let last_user = messages
        .pop()
        .ok_or_else(|| ChatError::InvalidConversation("Conversation is empty.".into()))?;

    if last_user.role != Role::User {
        return Err(ChatError::InvalidConversation(
            "Last message must be from user.".into(),
        ));
    }

    let mut system_override = None;
    let mut history = Vec::with_capacity(messages.len());
    for message in messages {
        match message.role {
            Role::System => system_override = Some(message.content),
            Role::User | Role::Assistant => history.push(message),
        }
    }

    Ok(SplitConversation {
        system_override,
        history,
        last_user,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_valid_conversation() {
        let split = split_conversation(vec![
            ChatMessage::new(Role::User, "hi"),
            ChatMessage::new(Role::Assistant, "hello"),
            ChatMessage::new(Role::User, "how are you?"),
        ])
        .unwrap();

        assert_eq!(split.history.len(), 2);
        assert_eq!(split.last_user.content, "how are you?");
        assert!(split.system_override.is_none());
    }

    #[test]
    fn test_empty_conversation_rejected() {
        let err = split_conversation(vec![]).unwrap_err();
        assert!(matches!(err, ChatError::InvalidConversation(_)));
    }

    #[test]
    fn test_trailing_assistant_rejected() {
        let err = split_conversation(vec![ChatMessage::new(Role::Assistant, "hi")]).unwrap_err();
        assert!(matches!(err, ChatError::InvalidConversation(_)));
    }

    #[test]
    fn test_system_messages_become_override() {
        let split = split_conversation(vec![
            ChatMessage::new(Role::System, "You are terse."),
            ChatMessage::new(Role::User, "hi"),
            ChatMessage::new(Role::System, "You are verbose."),
            ChatMessage::new(Role::User, "go on"),
        ])
        .unwrap();

        // Last system message wins and none of them stay in the history.
        assert_eq!(split.system_override.as_deref(), Some("You are verbose."));
        assert_eq!(split.history.len(), 1);
        assert_eq!(split.history[0].content, "hi");
    }
}
