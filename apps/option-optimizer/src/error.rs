//! Error handling for the optimizer core.
//!
//! Every failure the core can raise is an [`OptimizerError`] carrying a stable
//! [`ErrorCode`]. Input problems are reported before any candidate is generated
//! or scored, so callers never receive a partial computation together with an
//! error.
//!
//! | Code | Usage |
//! |------|-------|
//! | `INVALID_INPUT` | Empty chain, bad target ranges, bad constraints, bad mesh |
//! | `THREAD_POOL` | The scoring worker pool could not be built |
//!
//! An empty ranking is NOT an error: when filters or constraints eliminate
//! every candidate the optimizer returns an empty list.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Caller-supplied input violates a documented precondition.
    InvalidInput,
    /// Worker pool construction failed.
    ThreadPool,
}

impl ErrorCode {
    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::ThreadPool => "THREAD_POOL",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// A rich error with context for the optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct OptimizerError {
    /// Error code.
    code: ErrorCode,
    /// Human-readable message.
    message: String,
    /// Additional context (key-value pairs).
    context: Vec<(String, String)>,
}

impl OptimizerError {
    /// Create a new optimizer error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Add context to the error.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context.
    #[must_use]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Whether this error reports invalid caller input.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        self.code == ErrorCode::InvalidInput
    }
}

impl std::fmt::Display for OptimizerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.reason(), self.message)
    }
}

/// Convenience constructors for common errors.
impl OptimizerError {
    /// Invalid caller input.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Worker pool failure.
    #[must_use]
    pub fn thread_pool(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ThreadPool, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation_with_context() {
        let error = OptimizerError::invalid_input("range lower bound must be below upper bound")
            .with_context("lower", "120")
            .with_context("upper", "100");

        assert_eq!(error.code(), ErrorCode::InvalidInput);
        assert!(error.is_invalid_input());
        assert_eq!(error.context().len(), 2);
    }

    #[test]
    fn test_error_display() {
        let error = OptimizerError::invalid_input("option chain is empty");
        assert_eq!(error.to_string(), "[INVALID_INPUT] option chain is empty");

        let error = OptimizerError::thread_pool("too many threads");
        assert_eq!(error.to_string(), "[THREAD_POOL] too many threads");
        assert!(!error.is_invalid_input());
    }

    #[test]
    fn test_error_code_serializes_screaming_case() {
        let json = serde_json::to_string(&ErrorCode::InvalidInput).unwrap();
        assert_eq!(json, "\"INVALID_INPUT\"");
    }
}
