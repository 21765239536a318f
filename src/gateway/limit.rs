//! Per-client rate limiting for the chat route.
//!
//! Requests are keyed by peer IP and capped over a trailing one-minute
//! window. The check happens in route middleware, before the request body is
//! even read, so rejected callers never reach the upstream provider.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};

use super::{AppState, GatewayError};

/// Chat requests allowed per client per minute.
pub const REQUESTS_PER_MINUTE: u32 = 30;

/// Keyed limiter over peer IPs. Counter updates are atomic per request, so
/// concurrent handlers need no further coordination.
pub struct RateLimit {
    limiter: RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>,
}

impl RateLimit {
    pub fn new(per_minute: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(per_minute.max(1)).unwrap());
        Self {
            limiter: RateLimiter::keyed(quota),
        }
    }

    /// Whether this client may proceed. Consumes one slot when it may.
    pub fn check(&self, client: IpAddr) -> bool {
        self.limiter.check_key(&client).is_ok()
    }
}

impl Default for RateLimit {
    fn default() -> Self {
        Self::new(REQUESTS_PER_MINUTE)
    }
}

/// Middleware enforcing [`RateLimit`] on the wrapped route.
pub async fn enforce(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    let client = peer_ip(&request);
    if !state.limiter.check(client) {
        tracing::warn!(%client, "rate limit exceeded");
        return Err(GatewayError::RateLimited);
    }
    Ok(next.run(request).await)
}

fn peer_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        // No peer address (in-process tests): fold everyone into one bucket.
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirty_first_request_is_denied() {
        let limit = RateLimit::new(30);
        let client: IpAddr = "203.0.113.7".parse().unwrap();

        for _ in 0..30 {
            assert!(limit.check(client));
        }
        assert!(!limit.check(client));
    }

    #[test]
    fn clients_are_limited_independently() {
        let limit = RateLimit::new(2);
        let first: IpAddr = "198.51.100.1".parse().unwrap();
        let second: IpAddr = "198.51.100.2".parse().unwrap();

        assert!(limit.check(first));
        assert!(limit.check(first));
        assert!(!limit.check(first));

        assert!(limit.check(second));
    }
}
