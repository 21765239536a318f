//! Gateway configuration.
//!
//! Environment is the only configuration surface. The upstream API key is
//! required; the server refuses to start without it.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Upstream credential. Stays on the server, never crosses the wire.
    pub openai_api_key: String,
    /// Allowed browser origin. `None` means any origin.
    pub client_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("Missing OPENAI_API_KEY in environment"))?;

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            openai_api_key,
            client_origin: env::var("CLIENT_ORIGIN").ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-wide, so a single test owns the whole sequence.
    #[test]
    fn requires_the_api_key_and_defaults_the_rest() {
        env::remove_var("OPENAI_API_KEY");
        env::remove_var("HOST");
        env::remove_var("PORT");
        env::remove_var("CLIENT_ORIGIN");

        let err = Config::from_env().unwrap_err();
        assert_eq!(err.to_string(), "Missing OPENAI_API_KEY in environment");

        env::set_var("OPENAI_API_KEY", "sk-test");
        let config = Config::from_env().unwrap();
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert!(config.client_origin.is_none());

        env::remove_var("OPENAI_API_KEY");
    }
}
