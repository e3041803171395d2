//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use securepaste_core::Config;

/// Validate critical configuration values
///
/// Runs the structural checks of [`Config::validate`] and warns about settings that are
/// legal but probably unintended.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let is_production = config.is_production();
    let env_var = std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .ok();

    if is_production && env_var.is_none() {
        tracing::warn!(
            "Production mode detected but ENVIRONMENT/APP_ENV not set - error details may leak"
        );
    }

    if config.server.max_request_body_bytes < config.upload.max_fragment_bytes {
        tracing::warn!(
            max_request_body_bytes = config.server.max_request_body_bytes,
            max_fragment_bytes = config.upload.max_fragment_bytes,
            "Request body limit is below the fragment limit; large fragments will be refused early"
        );
    }

    if config.session_reap_interval_secs() == 0 {
        tracing::warn!("SESSION_REAP_INTERVAL_SECS is 0; abandoned upload sessions are never removed");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = Config::with_dirs("/tmp/a", "/tmp/b");
        assert!(validate_config(&config).is_ok());

        config.upload.max_fragments = 0;
        assert!(validate_config(&config).is_err());
    }
}
