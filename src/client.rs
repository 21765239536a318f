//! HTTP client for the chat gateway.
//!
//! Thin by design: serialize the history, POST it, surface non-success
//! responses as errors carrying the raw body text. Deserialization, not
//! interpretation.

use std::env;

use thiserror::Error;

use crate::conversation::{ChatRequest, ChatResponse, Message};

const DEFAULT_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-success status. The display of this
    /// variant is exactly the response body text.
    #[error("{0}")]
    RequestFailed(String),
}

pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Base URL from `CONFAB_SERVER_URL`, defaulting to a local gateway.
    pub fn from_env() -> Self {
        let base_url = env::var("CONFAB_SERVER_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send the full message history and return the gateway's reply.
    pub async fn send(&self, messages: &[Message]) -> Result<ChatResponse, ClientError> {
        let request = ChatRequest {
            messages: messages.to_vec(),
        };

        let response = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                "Request failed".to_string()
            } else {
                body
            };
            return Err(ClientError::RequestFailed(message));
        }

        Ok(response.json().await?)
    }
}
