//! The chat gateway.
//!
//! A stateless HTTP surface with exactly two operations: a liveness check and
//! a chat passthrough that validates the caller's message history, forwards
//! it verbatim to the upstream completion provider, and shapes the reply.
//! The upstream API key never leaves this process.

pub mod limit;

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::conversation::{ChatResponse, Message};
use crate::provider::{CompletionProvider, ProviderError};

use limit::RateLimit;

/// Largest accepted request body, matching the original 1 MB cap.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Substituted when the provider answers without any usable text.
pub const NO_REPLY_PLACEHOLDER: &str = "…(no response)";

/// Everything a request handler needs, constructed explicitly and injected.
/// Swapping `provider` for a scripted fake is how the handlers are tested.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn CompletionProvider>,
    pub limiter: Arc<RateLimit>,
}

impl AppState {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            limiter: Arc::new(RateLimit::default()),
        }
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Caller-supplied payload fails shape validation. Never reaches the
    /// provider.
    #[error("{0}")]
    InvalidRequest(String),

    /// Caller exceeded the per-client request quota.
    #[error("Too many requests, please try again later.")]
    RateLimited,

    /// The completion provider call failed; `details` carries whatever
    /// diagnostic payload it returned.
    #[error("Failed to get response from AI")]
    Upstream {
        source: ProviderError,
        details: Option<Value>,
    },
}

impl GatewayError {
    fn upstream(source: ProviderError) -> Self {
        let details = match &source {
            ProviderError::Api { details, .. } => details.clone(),
            _ => None,
        };
        Self::Upstream { source, details }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        // Full detail stays in the server log; only the sanitized message
        // and the upstream diagnostic payload cross the wire.
        if let GatewayError::Upstream { source, .. } = &self {
            tracing::error!(error = %source, "OpenAI error");
        }

        let status = self.status_code();
        let body = match &self {
            GatewayError::Upstream {
                details: Some(details),
                ..
            } => json!({ "error": self.to_string(), "details": details }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    ok: bool,
    time: DateTime<Utc>,
}

/// Build the gateway router. CORS and request tracing are layered on by the
/// server binary; tests mount this router bare.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route_layer(middleware::from_fn_with_state(state.clone(), limit::enforce))
        .route("/api/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Liveness probe. No dependencies, never rate limited.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        time: Utc::now(),
    })
}

async fn chat(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<ChatResponse>, GatewayError> {
    let messages = parse_messages(&body)?;

    let completion = state
        .provider
        .complete(&messages)
        .await
        .map_err(GatewayError::upstream)?;

    let reply = completion
        .content
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(NO_REPLY_PLACEHOLDER)
        .to_string();

    Ok(Json(ChatResponse { reply }))
}

/// Shape-check the inbound payload by hand so violations become 400s with
/// our bodies rather than extractor rejections.
fn parse_messages(body: &Value) -> Result<Vec<Message>, GatewayError> {
    let messages = match body.get("messages") {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => {
            return Err(GatewayError::InvalidRequest(
                "messages[] is required".to_string(),
            ))
        }
    };

    serde_json::from_value(Value::Array(messages.clone()))
        .map_err(|e| GatewayError::InvalidRequest(format!("messages[] is malformed: {e}")))
}
