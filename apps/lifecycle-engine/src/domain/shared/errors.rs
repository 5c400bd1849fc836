//! Shared domain errors.

use thiserror::Error;

/// Errors raised by value object validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A value failed validation.
    #[error("Invalid {field}: {message}")]
    InvalidValue {
        /// Field with the invalid value.
        field: String,
        /// Explanation of the violation.
        message: String,
    },
}

impl DomainError {
    /// Create a new invalid-value error.
    #[must_use]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_value_display() {
        let err = DomainError::invalid("quantity", "must be positive");
        assert_eq!(err.to_string(), "Invalid quantity: must be positive");
    }
}
