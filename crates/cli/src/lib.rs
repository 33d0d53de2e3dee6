//! Growthfy CLI Library
//!
//! Command-line interface components for the Growthfy search proxy.

use growthfy_core::GrowthfyError;

pub mod commands;
pub mod output;

pub use commands::*;
pub use output::*;

/// CLI version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the appropriate exit code for an error
pub fn exit_code_for_error(error: &GrowthfyError) -> i32 {
    match error {
        GrowthfyError::Validation { .. } => 2,
        GrowthfyError::Configuration { .. } | GrowthfyError::Config(_) => 3,
        GrowthfyError::Upstream { .. } => 4,
        GrowthfyError::Network { .. } | GrowthfyError::Timeout { .. } | GrowthfyError::Http(_) => 5,
        _ => 1,
    }
}
