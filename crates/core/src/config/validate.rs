use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Bulk concurrency is at least 1
/// - Tax rate is a sane fraction
/// - Waitlist intervals are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.engine.bulk_concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "engine.bulk_concurrency must be at least 1".to_string(),
        ));
    }

    if !(0.0..1.0).contains(&config.engine.tax_rate) {
        return Err(ConfigError::ValidationError(
            "engine.tax_rate must be in [0, 1)".to_string(),
        ));
    }

    if config.engine.waitlist.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "engine.waitlist.poll_interval_ms cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_concurrency_fails() {
        let mut config = Config::default();
        config.engine.bulk_concurrency = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_tax_rate_out_of_range_fails() {
        let mut config = Config::default();
        config.engine.tax_rate = 1.5;
        assert!(validate_config(&config).is_err());

        config.engine.tax_rate = -0.1;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_poll_interval_fails() {
        let mut config = Config::default();
        config.engine.waitlist.poll_interval_ms = 0;
        assert!(validate_config(&config).is_err());
    }
}
