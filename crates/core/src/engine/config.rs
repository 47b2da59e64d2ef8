//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::waitlist::WaitlistConfig;

/// Configuration for the booking engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Simulated settlement latency (milliseconds).
    /// Stands in for the payment collaborator's round trip.
    #[serde(default = "default_settlement_delay")]
    pub settlement_delay_ms: u64,

    /// Tax charged on the fare total, as a fraction (0.05 = 5%).
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,

    /// Flat convenience fee added to every confirmed booking.
    #[serde(default = "default_convenience_fee")]
    pub convenience_fee: f64,

    /// Maximum automated bookings running concurrently under bulk dispatch.
    #[serde(default = "default_bulk_concurrency")]
    pub bulk_concurrency: usize,

    /// Seed for the PNR generator. None = seeded from the OS.
    /// Set in tests for reproducible PNRs.
    #[serde(default)]
    pub rng_seed: Option<u64>,

    /// Waitlist monitoring behavior.
    #[serde(default)]
    pub waitlist: WaitlistConfig,
}

fn default_settlement_delay() -> u64 {
    2000 // 2 seconds
}

fn default_tax_rate() -> f64 {
    0.05
}

fn default_convenience_fee() -> f64 {
    40.0
}

fn default_bulk_concurrency() -> usize {
    3
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settlement_delay_ms: default_settlement_delay(),
            tax_rate: default_tax_rate(),
            convenience_fee: default_convenience_fee(),
            bulk_concurrency: default_bulk_concurrency(),
            rng_seed: None,
            waitlist: WaitlistConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.settlement_delay_ms, 2000);
        assert_eq!(config.tax_rate, 0.05);
        assert_eq!(config.convenience_fee, 40.0);
        assert_eq!(config.bulk_concurrency, 3);
        assert!(config.rng_seed.is_none());
    }

    #[test]
    fn test_deserialize_minimal() {
        let toml = r#"
            bulk_concurrency = 5
        "#;
        let config: EngineConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.bulk_concurrency, 5);
        assert_eq!(config.tax_rate, 0.05);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            settlement_delay_ms = 0
            tax_rate = 0.1
            convenience_fee = 25.0
            bulk_concurrency = 2
            rng_seed = 42

            [waitlist]
            poll_interval_ms = 1000
            max_monitor_ms = 5000
        "#;
        let config: EngineConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.settlement_delay_ms, 0);
        assert_eq!(config.tax_rate, 0.1);
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.waitlist.poll_interval_ms, 1000);
    }
}
