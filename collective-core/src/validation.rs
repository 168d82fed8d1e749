//! Validation error types

use thiserror::Error;

/// Validation error for domain input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Field is empty (or whitespace only) when it shouldn't be
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Field exceeds maximum length
    #[error("{field} exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format
    #[error("{field}: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// Invalid enum variant
    #[error("invalid {field} value: '{value}'")]
    InvalidVariant { field: &'static str, value: String },
}

/// Require a non-blank value, returning it trimmed.
pub fn non_blank(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "text",
            max: 256,
        };
        assert_eq!(
            err.to_string(),
            "text exceeds maximum length of 256 characters"
        );

        let err = ValidationError::InvalidVariant {
            field: "category",
            value: "Sports".into(),
        };
        assert_eq!(err.to_string(), "invalid category value: 'Sports'");
    }

    #[test]
    fn non_blank_trims() {
        assert_eq!(non_blank("name", "  Alice ").unwrap(), "Alice");
    }

    #[test]
    fn non_blank_rejects_whitespace() {
        assert_eq!(
            non_blank("name", " \t\n").unwrap_err(),
            ValidationError::Empty { field: "name" }
        );
    }
}
