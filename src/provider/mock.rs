//! Scripted completion provider for tests.
//!
//! Returns queued outcomes in order and records every message list it is
//! handed, so tests can assert the gateway forwards histories verbatim and
//! never calls upstream on rejected requests.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;

use crate::conversation::Message;

use super::{Completion, CompletionProvider, ProviderError};

#[derive(Default)]
pub struct MockProvider {
    outcomes: Mutex<VecDeque<Result<Completion, ProviderError>>>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful completion with the given text.
    pub fn reply(self, content: &str) -> Self {
        self.push(Ok(Completion {
            content: Some(content.to_string()),
        }))
    }

    /// Queue a completion with no usable content.
    pub fn reply_empty(self) -> Self {
        self.push(Ok(Completion { content: None }))
    }

    /// Queue an upstream failure carrying an optional diagnostic payload.
    pub fn fail(self, status: u16, details: Option<Value>) -> Self {
        self.push(Err(ProviderError::Api { status, details }))
    }

    fn push(self, outcome: Result<Completion, ProviderError>) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    /// Every message list this provider has been asked to complete.
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, messages: &[Message]) -> Result<Completion, ProviderError> {
        self.calls.lock().unwrap().push(messages.to_vec());

        self.outcomes.lock().unwrap().pop_front().unwrap_or_else(|| {
            // Out of scripted outcomes: answer deterministically from the
            // last message, like a well-behaved stub.
            let last = messages.last().map(|m| m.content.as_str()).unwrap_or("empty");
            Ok(Completion {
                content: Some(format!("Mock response to: {last}")),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;

    fn user(content: &str) -> Message {
        Message {
            role: Role::User,
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn returns_scripted_outcomes_in_order() {
        let provider = MockProvider::new().reply("first").reply_empty();

        let one = provider.complete(&[user("a")]).await.unwrap();
        assert_eq!(one.content.as_deref(), Some("first"));

        let two = provider.complete(&[user("b")]).await.unwrap();
        assert!(two.content.is_none());

        // Queue exhausted: falls back to the deterministic echo.
        let three = provider.complete(&[user("c")]).await.unwrap();
        assert_eq!(three.content.as_deref(), Some("Mock response to: c"));
    }

    #[tokio::test]
    async fn records_every_call() {
        let provider = MockProvider::new();
        provider.complete(&[user("one")]).await.unwrap();
        provider.complete(&[user("two"), user("three")]).await.unwrap();

        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].len(), 2);
        assert_eq!(calls[1][0].content, "two");
    }

    #[tokio::test]
    async fn scripted_failure_is_returned() {
        let provider = MockProvider::new().fail(500, None);
        let err = provider.complete(&[user("x")]).await.unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 500, .. }));
    }
}
