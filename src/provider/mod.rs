//! Upstream completion providers.
//!
//! The gateway talks to the upstream AI service through the
//! [`CompletionProvider`] trait so that request handlers can be exercised
//! against a scripted fake instead of the real API.

mod mock;
mod openai;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::conversation::Message;

pub use mock::MockProvider;
pub use openai::OpenAiProvider;

/// One generated completion. `content` is `None` when the upstream answered
/// without any usable text; deciding what to do about that is the caller's
/// business, not the provider's.
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {status}")]
    Api {
        status: u16,
        /// Diagnostic payload from the upstream error body, when readable.
        details: Option<Value>,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A service that turns an ordered message history into one completion.
///
/// Implementations must forward the message sequence verbatim: same roles,
/// same content, same order.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<Completion, ProviderError>;
}
