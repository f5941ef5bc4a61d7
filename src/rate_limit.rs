//! Per-IP rate limiting for the unauthenticated routes.
//!
//! License lookups are the only public surface a scraper can use to probe
//! keys, so they get the tighter budget. Index and health checks get the
//! looser one for monitors. Admin routes are gated by the API key instead.

use std::sync::Arc;
use std::time::Duration;
use tower_governor::GovernorLayer;
use tower_governor::governor::GovernorConfigBuilder;

use crate::config::RateLimitConfig;

/// Governor layer keyed on the peer IP. Needs `ConnectInfo<SocketAddr>`.
pub type RateLimitLayer = GovernorLayer<
    tower_governor::key_extractor::PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware<governor::clock::QuantaInstant>,
    axum::body::Body,
>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// `GET /api/licenca`, `GET /api/licenca/info`
    Lookup,
    /// `GET /`, `GET /health`
    Probe,
}

impl Tier {
    pub fn requests_per_minute(self, config: &RateLimitConfig) -> u32 {
        let rpm = match self {
            Tier::Lookup => config.standard_rpm,
            Tier::Probe => config.relaxed_rpm,
        };
        rpm.max(1)
    }
}

/// One token every `60 / rpm` seconds, bursting up to `rpm`.
pub fn layer(tier: Tier, config: &RateLimitConfig) -> RateLimitLayer {
    let rpm = tier.requests_per_minute(config);
    let period_secs = (60 / u64::from(rpm)).max(1);

    let governor = GovernorConfigBuilder::default()
        .period(Duration::from_secs(period_secs))
        .burst_size(rpm)
        .finish()
        .expect("period and burst size are non-zero");

    GovernorLayer::new(Arc::new(governor))
}
