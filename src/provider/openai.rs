//! OpenAI chat-completions provider.
//!
//! Works with any API that implements the OpenAI chat completions format.
//! One request per call, a fixed model, a fixed sampling temperature, and no
//! retry: the caller gets exactly one best-effort attempt.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::conversation::Message;

use super::{Completion, CompletionProvider, ProviderError};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Model requested for every completion.
pub const MODEL: &str = "gpt-4o-mini";

/// Sampling temperature requested for every completion.
pub const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct CompletionsRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionsResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Calls the OpenAI chat-completions API with a server-held API key.
///
/// No request timeout is configured beyond reqwest's transport defaults; a
/// hung upstream call blocks only the handler that issued it.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different chat-completions endpoint. Used by
    /// tests to swap in a stub server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait::async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, messages: &[Message]) -> Result<Completion, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = CompletionsRequest {
            model: MODEL,
            messages,
            temperature: TEMPERATURE,
        };

        tracing::debug!(model = MODEL, count = messages.len(), "requesting completion");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Keep whatever diagnostic payload the API sent so the gateway
            // can log and forward it.
            let details = match serde_json::from_str::<Value>(&body) {
                Ok(value) => Some(value),
                Err(_) if body.is_empty() => None,
                Err(_) => Some(Value::String(body)),
            };
            return Err(ProviderError::Api {
                status: status.as_u16(),
                details,
            });
        }

        let completion: CompletionsResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("{e} - body: {body}")))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content);

        Ok(Completion { content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;

    #[test]
    fn request_body_carries_fixed_model_and_temperature() {
        let messages = vec![
            Message {
                role: Role::System,
                content: "You are helpful.".to_string(),
            },
            Message {
                role: Role::User,
                content: "Hi".to_string(),
            },
        ];
        let request = CompletionsRequest {
            model: MODEL,
            messages: &messages,
            temperature: TEMPERATURE,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        let temperature = json["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Hi");
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn response_without_choices_parses_to_no_content() {
        let parsed: CompletionsResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.choices.is_empty());

        let parsed: CompletionsResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant"}}]}"#).unwrap();
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content);
        assert!(content.is_none());
    }
}
