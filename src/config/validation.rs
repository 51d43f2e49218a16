//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, the backend URI, and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: CalcConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use crate::config::schema::CalcConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check every semantic constraint and collect all failures.
pub fn validate_config(config: &CalcConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.listen_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.listen_address",
            format!("'{}' is not a socket address", config.server.listen_address),
        ));
    }

    if config.web.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "web.bind_address",
            format!("'{}' is not a socket address", config.web.bind_address),
        ));
    }
    if config.web.request_timeout_secs == 0 {
        errors.push(ValidationError::new("web.request_timeout_secs", "must be greater than 0"));
    }
    if config.web.max_body_size == 0 {
        errors.push(ValidationError::new("web.max_body_size", "must be greater than 0"));
    }

    if config.backend.target.trim().is_empty() {
        errors.push(ValidationError::new("backend.target", "must not be empty"));
    } else if tonic::transport::Endpoint::from_shared(config.backend.uri()).is_err() {
        errors.push(ValidationError::new(
            "backend.target",
            format!("'{}' is not a valid URI", config.backend.target),
        ));
    }
    for (field, value) in [
        ("backend.ready_timeout_secs", config.backend.ready_timeout_secs),
        ("backend.connect_timeout_secs", config.backend.connect_timeout_secs),
        ("backend.call_timeout_secs", config.backend.call_timeout_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than 0"));
        }
    }

    if EnvFilter::try_new(&config.logging.level).is_err() {
        errors.push(ValidationError::new(
            "logging.level",
            format!("'{}' is not a valid filter directive", config.logging.level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
