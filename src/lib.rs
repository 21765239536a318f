//! Confab is a small two-piece chat setup: an HTTP gateway that fronts the
//! OpenAI chat completions API, and a terminal client that talks to the
//! gateway. The gateway holds the API key; clients never see it.

pub mod client;
pub mod config;
pub mod conversation;
pub mod gateway;
pub mod provider;
pub mod view;
