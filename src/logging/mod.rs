//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - JSON-formatted logs
//! - Configurable log levels
//! - Local file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use hermes::logging::init_logging;
//! use hermes::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! // Use tracing macros for logging
//! tracing::info!("Application started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of a translation run
///
/// # Example
///
/// ```no_run
/// use hermes::log_translation_start;
///
/// log_translation_start!("extract-1", "B83002");
/// ```
#[macro_export]
macro_rules! log_translation_start {
    ($extract_id:expr, $organization_code:expr) => {
        tracing::info!(
            extract_id = %$extract_id,
            organization_code = %$organization_code,
            "Starting translation"
        );
    };
}

/// Log the completion of a translation run
///
/// # Example
///
/// ```no_run
/// use hermes::log_translation_complete;
///
/// log_translation_complete!(12, 3);
/// ```
#[macro_export]
macro_rules! log_translation_complete {
    ($resource_count:expr, $unmapped_count:expr) => {
        tracing::info!(
            resource_count = $resource_count,
            unmapped_count = $unmapped_count,
            "Translation completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use hermes::log_error_with_context;
/// use hermes::domain::HermesError;
///
/// let error = HermesError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_expand() {
        // Compile-time check only; output is exercised in integration tests.
        if false {
            crate::log_translation_start!("extract-1", "B83002");
            crate::log_translation_complete!(1, 0);
        }
    }
}
