//! Error types
//!
//! Errors never reach the callers of the settings store: the store logs
//! them and carries on. They exist so the persistence adapter, the locator
//! and the configuration loader can report what went wrong.

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error in {field}: {message}")]
    Config {
        /// The configuration field that has an error
        field: String,
        /// Error message describing the issue
        message: String,
    },

    /// Persistence adapter errors
    #[error("Storage error during {operation}: {details}")]
    Storage {
        /// The storage operation that failed
        operation: String,
        /// Detailed error description
        details: String,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(field: S, message: S) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage<S: Into<String>>(operation: S, details: S) -> Self {
        Self::Storage {
            operation: operation.into(),
            details: details.into(),
        }
    }

    /// Get error category for log fields
    pub fn category(&self) -> &'static str {
        match self {
            Error::Json(..) => "json",
            Error::Toml(..) => "toml",
            Error::Io(..) => "io",
            Error::Config { .. } => "config",
            Error::Storage { .. } => "storage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::config("field", "test config error");
        assert!(matches!(err, Error::Config { .. }));
        assert_eq!(
            err.to_string(),
            "Configuration error in field: test config error"
        );
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
        assert_eq!(err.category(), "json");
    }

    #[test]
    fn test_storage_error() {
        let err = Error::storage("write", "disk full");
        assert!(matches!(err, Error::Storage { .. }));
        assert_eq!(err.to_string(), "Storage error during write: disk full");
        assert_eq!(err.category(), "storage");
    }

    #[test]
    fn test_toml_error_category() {
        let toml_err = toml::from_str::<toml::Table>("key = [").unwrap_err();
        let err: Error = toml_err.into();
        assert!(matches!(err, Error::Toml(_)));
        assert_eq!(err.category(), "toml");
    }

    #[test]
    fn test_io_error_category() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.category(), "io");
        assert!(err.to_string().contains("gone"));
    }
}
