//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("limits.max_line_length must be greater than zero")]
    ZeroLineLength,
    #[error("limits.sendq must be greater than zero")]
    ZeroSendq,
    #[error("flood.burst must be at least 1 when flood protection is enabled, got {0}")]
    FloodBurstTooSmall(f32),
    #[error("flood.messages_per_second must not be negative, got {0}")]
    NegativeFloodRate(f32),
    #[error("chat_log.queue must be greater than zero")]
    ZeroChatLogQueue,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    }

    if config.limits.max_line_length == 0 {
        errors.push(ValidationError::ZeroLineLength);
    }
    if config.limits.sendq == 0 {
        errors.push(ValidationError::ZeroSendq);
    }

    let flood = &config.flood;
    if flood.messages_per_second < 0.0 {
        errors.push(ValidationError::NegativeFloodRate(flood.messages_per_second));
    }
    if flood.enabled() && flood.burst < 1.0 {
        errors.push(ValidationError::FloodBurstTooSmall(flood.burst));
    }

    if config.chat_log.enabled && config.chat_log.queue == 0 {
        errors.push(ValidationError::ZeroChatLogQueue);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_server_name_fails() {
        let config: Config = toml::from_str("[server]\nname = \"\"").unwrap();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingServerName)));
    }

    #[test]
    fn test_zero_limits_fail_together() {
        let toml = r#"
[limits]
max_line_length = 0
sendq = 0
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::ZeroLineLength)));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::ZeroSendq)));
    }

    #[test]
    fn test_small_burst_only_matters_when_enabled() {
        let config: Config = toml::from_str("[flood]\nmessages_per_second = 10.0\nburst = 0.5").unwrap();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::FloodBurstTooSmall(_))));

        let config: Config =
            toml::from_str("[flood]\nmessages_per_second = 0.0\nburst = 0.5").unwrap();
        assert!(validate(&config).is_ok());
    }
}
