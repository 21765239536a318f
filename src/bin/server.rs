//! Confab gateway server.
//!
//! Fronts the OpenAI chat completions API behind a small HTTP surface so the
//! API key never leaves the server. Serves the chat endpoint plus a health
//! probe, with per-client rate limiting.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use confab::config::Config;
use confab::gateway::{self, AppState};
use confab::provider::OpenAiProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "confab=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let provider = Arc::new(OpenAiProvider::new(config.openai_api_key.clone()));
    let state = AppState::new(provider);

    let app = gateway::router(state)
        .layer(cors(config.client_origin.as_deref())?)
        .layer(TraceLayer::new_for_http());

    tracing::info!("✅ Backend running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    // Connect info is what keys the rate limiter to the peer address.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Allow the configured frontend origin, or everything when none is set.
fn cors(origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    let layer = match origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    };
    Ok(layer)
}
