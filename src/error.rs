//! Error types for invoice-kit.

use std::fmt;

/// Result type for repository and view-model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for invoice-kit.
///
/// View-models catch these at their boundary and turn them into UI state
/// (an inline message, a "not found" screen). Only loader paths hand them
/// back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Lookup by id found nothing.
    ///
    /// `kind` is the entity prefix (`"invoice"`, `"customer"`).
    NotFound {
        /// Entity kind that was looked up
        kind: &'static str,
        /// Id that was not found
        id: String,
    },

    /// User input rejected before any data-access call.
    ///
    /// The message is shown inline as-is.
    Validation(String),

    /// Data source failure (read or write).
    ///
    /// **Recovery:** the user retries manually; nothing is retried automatically.
    Repository(String),

    /// Login attempt with credentials that do not match.
    Unauthorized,

    /// Configuration error, typically a malformed environment variable.
    Config(String),

    /// Generic error with custom message.
    Other(String),
}

impl Error {
    /// Shorthand for a not-found error.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Returns true for the not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound { kind, id } => write!(f, "{} not found: {}", kind, id),
            Error::Validation(msg) => write!(f, "{}", msg),
            Error::Repository(msg) => write!(f, "Repository error: {}", msg),
            Error::Unauthorized => write!(f, "Invalid credentials. Please try again."),
            Error::Config(msg) => write!(f, "Config error: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Repository(format!("invalid dataset: {}", e))
    }
}

impl From<chrono::ParseError> for Error {
    fn from(e: chrono::ParseError) -> Self {
        Error::Validation(format!("invalid date: {}", e))
    }
}

impl From<rust_decimal::Error> for Error {
    fn from(e: rust_decimal::Error) -> Self {
        Error::Validation(format!("invalid amount: {}", e))
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("invoice", "abc");
        assert_eq!(err.to_string(), "invoice not found: abc");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_validation_display_is_verbatim() {
        let err = Error::Validation("Please fill out all fields.".to_string());
        assert_eq!(err.to_string(), "Please fill out all fields.");
    }

    #[test]
    fn test_error_from_string() {
        let err: Error = "test error".into();
        assert!(matches!(err, Error::Other(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Repository(_)));
    }
}
