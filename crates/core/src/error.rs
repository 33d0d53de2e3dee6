//! Error handling for Growthfy core library

use std::fmt;
use thiserror::Error;

/// Result type alias for Growthfy operations
pub type Result<T> = std::result::Result<T, GrowthfyError>;

/// Main error type for Growthfy operations
#[derive(Error, Debug)]
pub enum GrowthfyError {
    /// IO-related errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration loading errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Generic errors
    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),

    /// A required field is missing or malformed
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The service is missing something it needs to run, such as an API key
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A remote service answered with a non-success status
    #[error("Upstream error ({status}): {message}")]
    Upstream {
        status: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Network connectivity errors
    #[error("Network error: {message}")]
    Network { message: String },

    /// Timeout errors
    #[error("Operation timed out: {operation}")]
    Timeout { operation: String },
}

impl GrowthfyError {
    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an upstream error
    pub fn upstream<S: Into<String>>(
        status: u16,
        message: S,
        details: Option<serde_json::Value>,
    ) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
            details,
        }
    }

    /// Create a network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Owned copy of a shared error.
    ///
    /// Variants that wrap a foreign source keep their message and category
    /// but drop the source itself.
    pub fn detach(&self) -> Self {
        match self {
            Self::Validation { message } => Self::validation(message.clone()),
            Self::Configuration { message } => Self::configuration(message.clone()),
            Self::Upstream {
                status,
                message,
                details,
            } => Self::upstream(*status, message.clone(), details.clone()),
            Self::Network { message } => Self::network(message.clone()),
            Self::Timeout { operation } => Self::timeout(operation.clone()),
            Self::Http(e) if e.is_timeout() => Self::timeout(e.to_string()),
            Self::Http(e) => Self::network(e.to_string()),
            Self::Config(e) => Self::configuration(e.to_string()),
            Self::Io(_) | Self::Json(_) | Self::Yaml(_) | Self::Url(_) | Self::Generic(_) => {
                Self::Generic(anyhow::anyhow!(self.to_string()))
            }
        }
    }

    /// Check if error is retryable.
    ///
    /// Nothing in Growthfy retries on its own; callers use this to decide
    /// whether offering a retry makes sense.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } | Self::Http(_) => true,
            Self::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Io(_) => ErrorCategory::FileSystem,
            Self::Http(_) | Self::Network { .. } => ErrorCategory::Network,
            Self::Json(_) | Self::Yaml(_) => ErrorCategory::Serialization,
            Self::Config(_) | Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Url(_) => ErrorCategory::Url,
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::Upstream { .. } => ErrorCategory::Upstream,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::Generic(_) => ErrorCategory::Generic,
        }
    }
}

/// Error categories for logging
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    FileSystem,
    Network,
    Serialization,
    Configuration,
    Url,
    Validation,
    Upstream,
    Timeout,
    Generic,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileSystem => write!(f, "filesystem"),
            Self::Network => write!(f, "network"),
            Self::Serialization => write!(f, "serialization"),
            Self::Configuration => write!(f, "configuration"),
            Self::Url => write!(f, "url"),
            Self::Validation => write!(f, "validation"),
            Self::Upstream => write!(f, "upstream"),
            Self::Timeout => write!(f, "timeout"),
            Self::Generic => write!(f, "generic"),
        }
    }
}
