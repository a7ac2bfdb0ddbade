//! Domain error types
//!
//! This module defines the error hierarchy for Hermes. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Hermes error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum HermesError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Translation-related errors
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// MHS outbound transport errors
    #[error("MHS error: {0}")]
    Mhs(#[from] MhsError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Migration status log errors
    #[error("Status log error: {0}")]
    StatusLog(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Translation-specific errors
///
/// Errors raised while reconciling attachments into mapped resources. Data
/// quality problems are not represented here: those degrade in-band with
/// placeholder values and never fail the mapping run.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// A declared attachment has no corresponding reference in the payload
    #[error("Could not find file {0} in payload")]
    AttachmentNotFound(String),

    /// An inline attachment description could not be parsed
    #[error("Unable to parse inline attachment description: {0}")]
    InlineAttachmentProcessing(String),

    /// The storage collaborator could not resolve a file location
    #[error("Unable to resolve storage location for {0}")]
    StorageLocation(String),
}

/// MHS-specific errors
///
/// Errors that occur when sending outbound messages to the MHS. These
/// errors don't expose the underlying HTTP client types.
#[derive(Debug, Error)]
pub enum MhsError {
    /// Failed to connect to the MHS outbound endpoint
    #[error("Failed to connect to MHS: {0}")]
    ConnectionFailed(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Invalid response from the MHS
    #[error("Invalid response from MHS: {0}")]
    InvalidResponse(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for HermesError {
    fn from(err: std::io::Error) -> Self {
        HermesError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for HermesError {
    fn from(err: serde_json::Error) -> Self {
        HermesError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for HermesError {
    fn from(err: toml::de::Error) -> Self {
        HermesError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hermes_error_display() {
        let err = HermesError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_translation_error_conversion() {
        let translation_err = TranslationError::AttachmentNotFound("scan.pdf".to_string());
        let err: HermesError = translation_err.into();
        assert!(matches!(err, HermesError::Translation(_)));
        assert_eq!(
            err.to_string(),
            "Translation error: Could not find file scan.pdf in payload"
        );
    }

    #[test]
    fn test_mhs_error_conversion() {
        let mhs_err = MhsError::ServerError {
            status: 502,
            message: "bad gateway".to_string(),
        };
        let err: HermesError = mhs_err.into();
        assert!(matches!(err, HermesError::Mhs(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: HermesError = io_err.into();
        assert!(matches!(err, HermesError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: HermesError = json_err.into();
        assert!(matches!(err, HermesError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: HermesError = toml_err.into();
        assert!(matches!(err, HermesError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_hermes_error_implements_std_error() {
        let err = HermesError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
