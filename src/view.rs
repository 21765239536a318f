//! Conversation view: the message list and input state behind the terminal
//! frontend.
//!
//! The send lifecycle is an explicit tagged state rather than a boolean, so
//! a double-submit is unrepresentable: `submit` hands back a history to send
//! only from `Idle`, and the view stays in `Sending` until `complete` or
//! `fail` closes the turn.

use crate::conversation::{Conversation, Message, Role};

/// Shown in place of the assistant's message while a reply is in flight.
pub const THINKING_PLACEHOLDER: &str = "Thinking…";

/// Fixed user-facing text for any failed send. The real error goes to the
/// log, never to the transcript.
pub const APOLOGY: &str = "Sorry, I hit an error talking to the AI.";

/// Rendered when the gateway's reply is an empty string.
const EMPTY_REPLY: &str = "…";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendState {
    /// Accepting input.
    Idle,
    /// A request is in flight; input is ignored until the turn closes.
    Sending,
}

pub struct ConversationView {
    conversation: Conversation,
    state: SendState,
}

impl ConversationView {
    pub fn new(conversation: Conversation) -> Self {
        Self {
            conversation,
            state: SendState::Idle,
        }
    }

    pub fn state(&self) -> SendState {
        self.state
    }

    pub fn is_sending(&self) -> bool {
        self.state == SendState::Sending
    }

    /// The full history, leading system message included. This is what goes
    /// upstream on every turn.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Accept user input. Appends the user message optimistically and moves
    /// to `Sending`, returning the history snapshot to send. Returns `None`
    /// without side effects when the input is blank or a send is already in
    /// flight.
    pub fn submit(&mut self, input: &str) -> Option<Vec<Message>> {
        let text = input.trim();
        if text.is_empty() || self.is_sending() {
            return None;
        }

        self.conversation.add_user(text);
        self.state = SendState::Sending;
        Some(self.conversation.messages.clone())
    }

    /// Close the turn with the assistant's reply.
    pub fn complete(&mut self, reply: &str) {
        if !self.is_sending() {
            return;
        }
        let reply = if reply.is_empty() { EMPTY_REPLY } else { reply };
        self.conversation.add_assistant(reply);
        self.state = SendState::Idle;
    }

    /// Close the turn after a failed send with the fixed apology.
    pub fn fail(&mut self) {
        if !self.is_sending() {
            return;
        }
        self.conversation.add_assistant(APOLOGY);
        self.state = SendState::Idle;
    }

    /// Messages that belong in the rendered transcript. System messages are
    /// part of the conversation but never shown.
    pub fn visible(&self) -> impl Iterator<Item = &Message> {
        self.conversation
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
    }

    /// The rendered transcript, one line per bubble, with the thinking
    /// placeholder at the end while a send is in flight.
    pub fn transcript(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .visible()
            .map(|m| format!("{}: {}", sender(&m.role), m.content))
            .collect();
        if self.is_sending() {
            lines.push(format!("{}: {THINKING_PLACEHOLDER}", sender(&Role::Assistant)));
        }
        lines
    }
}

/// Transcript label for a role.
pub fn sender(role: &Role) -> &'static str {
    match role {
        Role::User => "You",
        _ => "Bot",
    }
}
