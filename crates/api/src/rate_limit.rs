//! Write Rate Limiting using GCRA Algorithm
//!
//! All measurements share one consistency group, so the write ceiling is a
//! property of the whole system rather than of a client. The limiter is
//! therefore keyed globally instead of per peer IP.

use governor::middleware::StateInformationMiddleware;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::MAX_SUSTAINED_WRITES_PER_SECOND;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::GlobalKeyExtractor;
use tower_governor::GovernorLayer;

/// Governor config shared by every writer.
/// StateInformationMiddleware is used when use_headers() is called to add X-RateLimit-* headers
pub type WriteGovernorConfig =
    tower_governor::governor::GovernorConfig<GlobalKeyExtractor, StateInformationMiddleware>;

/// Rate limiting configuration for `POST /add`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Whether writes are limited at all
    pub enabled: bool,
    /// Seconds between replenished write permits
    pub per_second: u64,
    /// Burst size (max writes that can be made immediately)
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_second: u64::from(MAX_SUSTAINED_WRITES_PER_SECOND),
            burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    /// Config with limiting switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Create the governor config for the write route.
///
/// Returns `None` when the config is disabled or its values are rejected
/// by the builder (zero period or zero burst).
/// Adds X-RateLimit-* headers to responses for quota visibility.
pub fn create_governor_config(config: &RateLimitConfig) -> Option<Arc<WriteGovernorConfig>> {
    if !config.enabled {
        return None;
    }

    GovernorConfigBuilder::default()
        .key_extractor(GlobalKeyExtractor)
        .per_second(config.per_second)
        .burst_size(config.burst_size)
        .use_headers()
        .finish()
        .map(Arc::new)
}

/// Layer for the write route, if limiting is enabled
pub fn write_limit_layer(
    config: &RateLimitConfig,
) -> Option<GovernorLayer<GlobalKeyExtractor, StateInformationMiddleware>> {
    create_governor_config(config).map(|config| GovernorLayer { config })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_write_ceiling() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.per_second, 1);
        assert_eq!(config.burst_size, 5);
    }

    #[test]
    fn test_disabled_has_no_governor() {
        assert!(create_governor_config(&RateLimitConfig::disabled()).is_none());
    }

    #[test]
    fn test_zero_burst_is_rejected() {
        let config = RateLimitConfig {
            burst_size: 0,
            ..Default::default()
        };
        assert!(create_governor_config(&config).is_none());
    }

    #[test]
    fn test_create_governor_config() {
        let governor = create_governor_config(&RateLimitConfig::default()).unwrap();
        assert!(Arc::strong_count(&governor) > 0);
    }
}
