//! Error types for rexgen
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in rexgen
#[derive(Debug, Error)]
pub enum RexgenError {
    /// LLM API error (generation failures propagate and end the run)
    #[error("LLM error: {0}")]
    Llm(String),

    /// The interpreter subprocess could not be spawned at all
    #[error("Interpreter error: {0}")]
    Interpreter(String),

    /// Suite artifact error (materialization, template handling)
    #[error("Suite error: {0}")]
    Suite(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for rexgen operations
pub type Result<T> = std::result::Result<T, RexgenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error() {
        let err = RexgenError::Llm("rate limited".to_string());
        assert_eq!(err.to_string(), "LLM error: rate limited");
    }

    #[test]
    fn test_interpreter_error() {
        let err = RexgenError::Interpreter("python3 not found".to_string());
        assert_eq!(err.to_string(), "Interpreter error: python3 not found");
    }

    #[test]
    fn test_suite_error() {
        let err = RexgenError::Suite("empty template".to_string());
        assert_eq!(err.to_string(), "Suite error: empty template");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RexgenError = io_err.into();
        assert!(matches!(err, RexgenError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: RexgenError = json_err.into();
        assert!(matches!(err, RexgenError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(RexgenError::Config("missing model".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
