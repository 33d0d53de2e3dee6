//! Logging setup for Growthfy
//!
//! All binaries install one global `tracing` subscriber through
//! [`init_logger`]. Settings come from the `logging` config section and
//! may be overridden by `GROWTHFY_LOG_*` environment variables.

use growthfy_core::config::LoggingConfig;
use growthfy_core::{GrowthfyError, Result};
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Output format of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = GrowthfyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            _ => Err(GrowthfyError::validation(format!(
                "Unknown log format: {}",
                s
            ))),
        }
    }
}

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    pub format: LogFormat,
    pub with_timestamps: bool,
    /// Whether to include file/line information
    pub with_file_info: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            with_timestamps: true,
            with_file_info: false,
        }
    }
}

impl LoggerConfig {
    /// Build from the `logging` config section
    pub fn from_config(config: &LoggingConfig) -> Result<Self> {
        Ok(Self {
            level: config.level.clone(),
            format: config.format.parse()?,
            with_timestamps: true,
            with_file_info: config.file_info,
        })
    }

    /// Apply `GROWTHFY_LOG_*` overrides from `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("GROWTHFY_LOG_LEVEL") {
            self.level = level;
        }
        if let Some(format) = lookup("GROWTHFY_LOG_FORMAT").and_then(|v| v.parse().ok()) {
            self.format = format;
        }
        if let Some(ts) = lookup("GROWTHFY_LOG_TIMESTAMPS").and_then(|v| v.parse().ok()) {
            self.with_timestamps = ts;
        }
        if let Some(file_info) = lookup("GROWTHFY_LOG_FILE_INFO").and_then(|v| v.parse().ok()) {
            self.with_file_info = file_info;
        }
        self
    }
}

/// Create a logger configuration from environment variables
pub fn logger_config_from_env() -> LoggerConfig {
    LoggerConfig::default().with_env_overrides(|key| std::env::var(key).ok())
}

/// Initialize the global logger with the given configuration.
///
/// Log lines go to stderr so command output on stdout stays clean.
pub fn init_logger(config: LoggerConfig) -> Result<()> {
    let level = parse_level(&config.level)?;

    let mut env_filter = EnvFilter::from_default_env().add_directive(level.into());
    for directive in ["hyper=warn", "reqwest=warn", "h2=warn"] {
        let directive = directive
            .parse()
            .map_err(|e| GrowthfyError::validation(format!("Invalid log directive: {}", e)))?;
        env_filter = env_filter.add_directive(directive);
    }

    let fmt_layer = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_file(config.with_file_info)
            .with_line_number(config.with_file_info)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_file(config.with_file_info)
            .with_line_number(config.with_file_info)
            .boxed(),
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(config.with_file_info)
                .with_line_number(config.with_file_info);

            if config.with_timestamps {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| GrowthfyError::validation(format!("Failed to initialize logger: {}", e)))?;

    tracing::debug!("Logger initialized with level: {}", config.level);
    Ok(())
}

/// Initialize logger for testing. Repeated calls are ignored.
pub fn init_test_logger() {
    let config = LoggerConfig {
        level: "warn".to_string(),
        with_timestamps: false,
        ..Default::default()
    };
    let _ = init_logger(config);
}

/// Parse a log level name
pub fn parse_level(level: &str) -> Result<Level> {
    Level::from_str(level)
        .map_err(|e| GrowthfyError::validation(format!("Invalid log level '{}': {}", level, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_logger_config_default() {
        let config = LoggerConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.with_timestamps);
        assert!(!config.with_file_info);
    }

    #[test]
    fn test_from_logging_section() {
        let section = LoggingConfig {
            level: "debug".to_string(),
            format: "json".to_string(),
            file_info: true,
        };
        let config = LoggerConfig::from_config(&section).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.with_file_info);

        let bad = LoggingConfig {
            format: "xml".to_string(),
            ..section
        };
        assert!(LoggerConfig::from_config(&bad).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GROWTHFY_LOG_LEVEL", "trace"),
            ("GROWTHFY_LOG_FORMAT", "compact"),
            ("GROWTHFY_LOG_TIMESTAMPS", "not-a-bool"),
        ]
        .into_iter()
        .collect();

        let config = LoggerConfig::default()
            .with_env_overrides(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.level, "trace");
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.with_timestamps);
    }

    #[test]
    fn test_parse_level() {
        assert!(parse_level("info").is_ok());
        assert!(parse_level("DEBUG").is_ok());
        assert!(parse_level("loud").is_err());
    }

    #[test]
    fn test_init_test_logger_twice() {
        init_test_logger();
        init_test_logger();
    }
}
