//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::CalcConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Values supplied on the command line or through the environment.
///
/// Each `Some` replaces the corresponding file or default value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub listen_address: Option<String>,
    pub web_bind_address: Option<String>,
    pub backend_target: Option<String>,
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    /// Apply the overrides on top of `config`.
    pub fn apply(self, config: &mut CalcConfig) {
        if let Some(addr) = self.listen_address {
            config.server.listen_address = addr;
        }
        if let Some(addr) = self.web_bind_address {
            config.web.bind_address = addr;
        }
        if let Some(target) = self.backend_target {
            config.backend.target = target;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
    }
}

/// Load configuration: defaults, then the TOML file if given, then overrides.
///
/// The result is validated before it is returned.
pub fn load_config(
    path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<CalcConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => CalcConfig::default(),
    };

    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
