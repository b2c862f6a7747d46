//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown model role: {0}")]
    UnknownRole(String),

    #[error("Unknown operation kind: {0}")]
    UnknownOperation(String),

    #[error("Unknown model status: {0}")]
    UnknownStatus(String),

    #[error("Unknown metrics window: {0}")]
    UnknownWindow(String),

    #[error("Unknown similarity strategy: {0}")]
    UnknownSimilarity(String),

    #[error("Invalid model descriptor: {0}")]
    InvalidDescriptor(String),
}

impl DomainError {
    /// Check if this error came from parsing an enumerated value
    pub fn is_parse_error(&self) -> bool {
        !matches!(self, DomainError::InvalidDescriptor(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_display() {
        let error = DomainError::UnknownRole("poet".to_string());
        assert_eq!(error.to_string(), "Unknown model role: poet");
    }

    #[test]
    fn test_is_parse_error_check() {
        assert!(DomainError::UnknownOperation("x".to_string()).is_parse_error());
        assert!(DomainError::UnknownWindow("1d".to_string()).is_parse_error());
        assert!(!DomainError::InvalidDescriptor("empty id".to_string()).is_parse_error());
    }
}
