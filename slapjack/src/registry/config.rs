//! Registry configuration.

use std::{env, time::Duration};

/// Delay the reference deployment adds to every registry call to emulate a
/// remote store.
pub const DEFAULT_QUERY_DELAY: Duration = Duration::from_millis(50);

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Artificial latency awaited by every registry operation
    pub query_delay: Duration,

    /// Capacity of each game's message inbox
    pub inbox_capacity: usize,

    /// Capacity of each change-notification channel
    pub subscriber_capacity: usize,
}

impl RegistryConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `SLAPJACK_QUERY_DELAY_MS`: Simulated lookup latency (default: 50)
    /// - `SLAPJACK_INBOX_CAPACITY`: Per-game inbox size (default: 100)
    /// - `SLAPJACK_SUBSCRIBER_CAPACITY`: Per-subscriber queue size (default: 32)
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            query_delay: env::var("SLAPJACK_QUERY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.query_delay),
            inbox_capacity: parse_env_or("SLAPJACK_INBOX_CAPACITY", defaults.inbox_capacity),
            subscriber_capacity: parse_env_or(
                "SLAPJACK_SUBSCRIBER_CAPACITY",
                defaults.subscriber_capacity,
            ),
        }
    }

    /// No simulated latency, for tests and local play
    pub fn immediate() -> Self {
        Self {
            query_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Override the simulated latency
    #[must_use]
    pub fn with_query_delay(mut self, query_delay: Duration) -> Self {
        self.query_delay = query_delay;
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            query_delay: DEFAULT_QUERY_DELAY,
            inbox_capacity: 100,
            subscriber_capacity: 32,
        }
    }
}

/// Helper to parse a non-zero environment value with default fallback
fn parse_env_or(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|&v| v > 0)
        .unwrap_or(default)
}
