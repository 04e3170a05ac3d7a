//! Per-IP rate limiting with governor and `tower_governor`.
//!
//! Two tiers front the router: a strict limiter on the OAuth routes and a
//! relaxed one on the JSON API. Both key on the client address reported by
//! the fronting proxy.

use std::net::IpAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::KeyExtractor;
use tower_governor::{GovernorError, GovernorLayer};

/// Proxy headers that may carry the real client address, in trust order.
const CLIENT_IP_HEADERS: [&str; 4] = [
    "cf-connecting-ip",
    "x-forwarded-for",
    "x-real-ip",
    "fly-client-ip",
];

/// Keys requests by the client IP reported by the fronting proxy.
///
/// `x-forwarded-for` may carry a comma-separated chain; only the first hop
/// identifies the client. Requests with no parseable address are rejected
/// rather than pooled under one key.
#[derive(Clone, Copy)]
pub struct ForwardedIpKey;

impl KeyExtractor for ForwardedIpKey {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        CLIENT_IP_HEADERS
            .iter()
            .filter_map(|name| req.headers().get(*name))
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| value.split(',').next())
            .find_map(|candidate| candidate.trim().parse().ok())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for the router.
pub type RateLimiterLayer = GovernorLayer<ForwardedIpKey, NoOpMiddleware<QuantaInstant>, Body>;

fn limiter(replenish_seconds: u64, burst: u32) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ForwardedIpKey)
        .per_second(replenish_seconds)
        .burst_size(burst)
        .finish()
        .expect("rate limiter parameters are nonzero");
    GovernorLayer::new(Arc::new(config))
}

/// Limiter for the OAuth routes, roughly ten requests a minute per IP.
///
/// # Panics
///
/// Never panics; the parameters are nonzero constants.
#[must_use]
pub fn auth_rate_limiter() -> RateLimiterLayer {
    // Replenish 1 token every 6 seconds, burst of 5
    limiter(6, 5)
}

/// Limiter for the JSON API, roughly a hundred requests a minute per IP.
///
/// Keeps a single client from draining the upstream catalog quota.
///
/// # Panics
///
/// Never panics; the parameters are nonzero constants.
#[must_use]
pub fn api_rate_limiter() -> RateLimiterLayer {
    limiter(1, 50)
}
