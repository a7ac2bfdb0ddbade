//! Result type alias for Hermes
//!
//! This module provides a convenient Result type alias that uses HermesError
//! as the error type.

use super::errors::HermesError;

/// Result type alias for Hermes operations
///
/// This is a convenience type alias that uses `HermesError` as the error type.
/// Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use hermes::domain::result::Result;
/// use hermes::domain::errors::HermesError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(HermesError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, HermesError>;
