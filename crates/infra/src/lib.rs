//! Growthfy Infrastructure Library
//!
//! HTTP clients for the social-data vendor and for a running Growthfy
//! proxy, plus logger setup shared by the binaries.

use growthfy_core::GrowthfyError;
use serde_json::Value;

pub mod logger;
pub mod proxy;
pub mod socialdata;

pub use logger::{init_logger, logger_config_from_env, LogFormat, LoggerConfig};
pub use proxy::ProxyClient;
pub use socialdata::{VendorClient, VENDOR_ERROR};

/// Infrastructure version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Map a failed send to a timeout or network error
pub(crate) fn send_error(operation: &str, error: reqwest::Error) -> GrowthfyError {
    if error.is_timeout() {
        GrowthfyError::timeout(operation)
    } else {
        GrowthfyError::network(error.to_string())
    }
}

/// Body of an error response: its JSON if it parses, else the raw text
pub(crate) async fn error_details(response: reqwest::Response) -> Value {
    match response.text().await {
        Ok(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        Err(e) => Value::String(format!("Failed to read response body: {}", e)),
    }
}
