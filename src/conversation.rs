//! Conversation types and the wire contract shared by the gateway and the
//! terminal client.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// An ordered dialogue history. Message order is significant and must be
/// preserved end-to-end unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn with_system(mut self, prompt: &str) -> Self {
        self.messages.push(Message {
            role: Role::System,
            content: prompt.to_string(),
        });
        self
    }

    pub fn with_assistant(mut self, content: &str) -> Self {
        self.messages.push(Message {
            role: Role::Assistant,
            content: content.to_string(),
        });
        self
    }

    pub fn add_user(&mut self, content: &str) {
        self.messages.push(Message {
            role: Role::User,
            content: content.to_string(),
        });
    }

    pub fn add_assistant(&mut self, content: &str) {
        self.messages.push(Message {
            role: Role::Assistant,
            content: content.to_string(),
        });
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Body of `POST /api/chat`. Built fresh for every send, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
}

/// Success body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        let msg = Message {
            role: Role::System,
            content: "You are a helpful assistant.".to_string(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "You are a helpful assistant.");

        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = serde_json::from_value::<Message>(serde_json::json!({
            "role": "narrator",
            "content": "hi"
        }));
        assert!(err.is_err());
    }

    #[test]
    fn conversation_preserves_order() {
        let mut conversation = Conversation::new().with_system("system prompt");
        conversation.add_user("first");
        conversation.add_assistant("second");
        conversation.add_user("third");

        let contents: Vec<&str> = conversation
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, ["system prompt", "first", "second", "third"]);
        assert_eq!(conversation.messages[0].role, Role::System);
        assert_eq!(conversation.messages[3].role, Role::User);
    }
}
