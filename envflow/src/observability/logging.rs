//! Log subscriber configuration.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "ENVFLOW_LOG";

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "ENVFLOW_LOG_FORMAT";

/// Output format of the fmt subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Multi-line, human oriented.
    Pretty,
    /// Single line per event.
    #[default]
    Compact,
    /// Newline-delimited JSON.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Compact => write!(f, "compact"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidValue {
                field: LOG_FORMAT_ENV,
                value: s.to_string(),
            }),
        }
    }
}

/// Settings for [`init_tracing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `envflow=debug`.
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
    /// Whether to print event targets.
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::default(),
            with_target: false,
        }
    }
}

impl LogConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `ENVFLOW_LOG` and `ENVFLOW_LOG_FORMAT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(filter) = lookup(LOG_ENV).filter(|v| !v.trim().is_empty()) {
            config.filter = filter;
        }
        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            config.format = format.parse()?;
        }
        config.env_filter()?;
        Ok(config)
    }

    /// Sets the filter directive.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Enables or disables event targets.
    #[must_use]
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Parses the filter directive.
    pub fn env_filter(&self) -> Result<EnvFilter, ConfigError> {
        EnvFilter::try_new(&self.filter).map_err(|e| ConfigError::InvalidFilter {
            directive: self.filter.clone(),
            message: e.to_string(),
        })
    }
}

/// Installs a global fmt subscriber built from `config`.
///
/// # Errors
///
/// Fails on an invalid filter or when a global subscriber already exists.
pub fn init_tracing(config: &LogConfig) -> Result<(), ConfigError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter()?)
        .with_target(config.with_target);

    let result = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| ConfigError::AlreadyInitialised(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = LogConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, LogConfig::default());
        assert_eq!(config.filter, "info");
        assert_eq!(config.format, LogFormat::Compact);
    }

    #[test]
    fn test_config_from_lookup() {
        let config = LogConfig::from_lookup(lookup_from(&[
            (LOG_ENV, "envflow=debug"),
            (LOG_FORMAT_ENV, "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.filter, "envflow=debug");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_blank_filter_keeps_default() {
        let config = LogConfig::from_lookup(lookup_from(&[(LOG_ENV, "  ")])).unwrap();
        assert_eq!(config.filter, "info");
    }

    #[test]
    fn test_invalid_format_rejected() {
        let err = LogConfig::from_lookup(lookup_from(&[(LOG_FORMAT_ENV, "xml")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: LOG_FORMAT_ENV, .. }));
    }

    #[test]
    fn test_invalid_filter_rejected() {
        let config = LogConfig::new().with_filter("envflow=notalevel");
        assert!(matches!(
            config.env_filter(),
            Err(ConfigError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_builder_setters() {
        let config = LogConfig::new()
            .with_filter("warn")
            .with_format(LogFormat::Pretty)
            .with_target(true);

        assert_eq!(config.filter, "warn");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.with_target);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: LogConfig = serde_json::from_str(r#"{"format":"json"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter, "info");
    }

    #[test]
    fn test_init_twice_fails() {
        let config = LogConfig::new().with_filter("off");
        let _ = init_tracing(&config);
        assert!(matches!(
            init_tracing(&config),
            Err(ConfigError::AlreadyInitialised(_))
        ));
    }
}
