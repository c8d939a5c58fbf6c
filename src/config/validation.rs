//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check addresses actually parse before the server tries to bind
//! - Reject rewrite origins that would turn substitution into a no-op
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::RelayConfig;

/// A single semantic violation found in a configuration.
#[derive(Debug)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// Human-readable description of the violation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address",
            message: format!(
                "not a valid socket address: {:?}",
                config.listener.bind_address
            ),
        });
    }

    if config.rewrite.source_origin.is_empty() {
        errors.push(ValidationError {
            field: "rewrite.source_origin",
            message: "must not be empty".to_string(),
        });
    }

    if config.rewrite.alias_origin.is_empty() {
        errors.push(ValidationError {
            field: "rewrite.alias_origin",
            message: "must not be empty".to_string(),
        });
    }

    if let Some(secs) = config.timeouts.request_secs {
        if secs == 0 {
            errors.push(ValidationError {
                field: "timeouts.request_secs",
                message: "must be greater than zero when set".to_string(),
            });
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError {
            field: "observability.metrics_address",
            message: format!(
                "not a valid socket address: {:?}",
                config.observability.metrics_address
            ),
        });
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
    fn test_default_config_is_valid() {
        assert!(validate_config(&RelayConfig::default()).is_ok());
    }

    #[test]
    fn test_all_violations_are_collected() {
        let mut config = RelayConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        config.rewrite.source_origin = String::new();
        config.rewrite.alias_origin = String::new();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);

        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"listener.bind_address"));
        assert!(fields.contains(&"rewrite.source_origin"));
        assert!(fields.contains(&"rewrite.alias_origin"));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut config = RelayConfig::default();
        config.timeouts.request_secs = Some(0);
        assert!(validate_config(&config).is_err());
    }
}
