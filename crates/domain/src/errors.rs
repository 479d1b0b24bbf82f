//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Input could not be reduced to a registrable domain
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    /// Field value lookups need exactly one filter key
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Date/time parsing error
    #[error("Invalid date/time: {0}")]
    InvalidDateTime(String),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_creates_correct_error() {
        let err = DomainError::not_found("Company", "42");
        match err {
            DomainError::NotFound { entity_type, id } => {
                assert_eq!(entity_type, "Company");
                assert_eq!(id, "42");
            },
            _ => unreachable!("Expected NotFound error"),
        }
    }

    #[test]
    fn not_found_error_message_is_correct() {
        let err = DomainError::not_found("Company", "42");
        assert_eq!(err.to_string(), "Company not found: 42");
    }

    #[test]
    fn invalid_domain_error_message() {
        let err = DomainError::InvalidDomain("http://".to_string());
        assert_eq!(err.to_string(), "Invalid domain: http://");
    }

    #[test]
    fn invalid_filter_error_message() {
        let err = DomainError::InvalidFilter("no key given".to_string());
        assert_eq!(err.to_string(), "Invalid filter: no key given");
    }

    #[test]
    fn validation_error_message() {
        let err = DomainError::ValidationError("name is required".to_string());
        assert_eq!(err.to_string(), "Validation failed: name is required");
    }

    #[test]
    fn invalid_datetime_error_message() {
        let err = DomainError::InvalidDateTime("not a date".to_string());
        assert_eq!(err.to_string(), "Invalid date/time: not a date");
    }
}
