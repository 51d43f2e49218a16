//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration shared by the procedure server and the front end.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CalcConfig {
    /// Procedure server settings.
    pub server: ServerConfig,

    /// Front-end HTTP settings.
    pub web: WebConfig,

    /// How the front end reaches the procedure server.
    pub backend: BackendConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Procedure server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (e.g., "0.0.0.0:50051").
    pub listen_address: String,

    /// Seconds to wait for in-flight calls after a shutdown signal.
    /// Zero waits indefinitely.
    pub drain_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:50051".to_string(),
            drain_timeout_secs: 30,
        }
    }
}

/// Front-end HTTP configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Total time allowed for one HTTP request in seconds.
    pub request_timeout_secs: u64,

    /// Maximum accepted request body in bytes.
    pub max_body_size: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            request_timeout_secs: 30,
            max_body_size: 64 * 1024,
        }
    }
}

/// Connection settings for the procedure server, as seen from the front end.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Procedure server address, `host:port` or a full `http://` URI.
    pub target: String,

    /// Bound on the startup wait for the connection to become ready.
    pub ready_timeout_secs: u64,

    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Deadline for a single `Add` call in seconds.
    pub call_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            target: "localhost:50051".to_string(),
            ready_timeout_secs: 10,
            connect_timeout_secs: 5,
            call_timeout_secs: 10,
        }
    }
}

impl BackendConfig {
    /// The target as a URI with a scheme.
    pub fn uri(&self) -> String {
        if self.target.contains("://") {
            self.target.clone()
        } else {
            format!("http://{}", self.target)
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, for development.
    #[default]
    Pretty,
    /// One JSON object per line, for log aggregation.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (e.g., "info" or "calc_gateway=debug,tower_http=info").
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}
