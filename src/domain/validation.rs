//! Field rules shared by every resource

use thiserror::Error;

use crate::domain::DomainError;

/// Errors raised by field validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("{0} exceeds maximum length of {1} characters")]
    TooLong(&'static str, usize),

    #[error("{0} cannot be negative")]
    Negative(&'static str),

    #[error("{0} must be at least {1}")]
    BelowMinimum(&'static str, i64),

    #[error("{0} must be at most {1}")]
    AboveMaximum(&'static str, f64),

    #[error("{0} cannot be before {1}")]
    OutOfOrder(&'static str, &'static str),
}

impl From<FieldError> for DomainError {
    fn from(err: FieldError) -> Self {
        DomainError::validation(err.to_string())
    }
}

pub const MAX_NAME_LENGTH: usize = 255;

/// Required name: non-blank, at most 255 characters
pub fn validate_name(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Empty(field));
    }

    validate_max_len(field, value, MAX_NAME_LENGTH)
}

pub fn validate_max_len(field: &'static str, value: &str, max: usize) -> Result<(), FieldError> {
    if value.chars().count() > max {
        return Err(FieldError::TooLong(field, max));
    }
    Ok(())
}

pub fn validate_optional_max_len(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), FieldError> {
    match value {
        Some(v) => validate_max_len(field, v, max),
        None => Ok(()),
    }
}

pub fn validate_non_negative(field: &'static str, value: Option<i32>) -> Result<(), FieldError> {
    match value {
        Some(v) if v < 0 => Err(FieldError::Negative(field)),
        _ => Ok(()),
    }
}

pub fn validate_non_negative_f64(field: &'static str, value: Option<f64>) -> Result<(), FieldError> {
    match value {
        Some(v) if v < 0.0 || v.is_nan() => Err(FieldError::Negative(field)),
        _ => Ok(()),
    }
}

pub fn validate_max_f64(
    field: &'static str,
    value: Option<f64>,
    max: f64,
) -> Result<(), FieldError> {
    match value {
        Some(v) if v > max => Err(FieldError::AboveMaximum(field, max)),
        _ => Ok(()),
    }
}

pub fn validate_min(field: &'static str, value: i32, min: i32) -> Result<(), FieldError> {
    if value < min {
        return Err(FieldError::BelowMinimum(field, min as i64));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Leg Day").is_ok());
        assert_eq!(validate_name("name", "   "), Err(FieldError::Empty("name")));
        assert_eq!(
            validate_name("name", &"x".repeat(256)),
            Err(FieldError::TooLong("name", 255))
        );
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("reps", None).is_ok());
        assert!(validate_non_negative("reps", Some(0)).is_ok());
        assert_eq!(
            validate_non_negative("reps", Some(-1)),
            Err(FieldError::Negative("reps"))
        );
        assert!(validate_non_negative_f64("weight_kg", Some(-0.5)).is_err());
    }

    #[test]
    fn test_validate_max_f64() {
        assert!(validate_max_f64("weight_kg", None, 999.99).is_ok());
        assert!(validate_max_f64("weight_kg", Some(999.99), 999.99).is_ok());
        assert_eq!(
            validate_max_f64("weight_kg", Some(1000.0), 999.99),
            Err(FieldError::AboveMaximum("weight_kg", 999.99))
        );
    }

    #[test]
    fn test_validate_min() {
        assert!(validate_min("sets", 1, 1).is_ok());
        assert_eq!(
            validate_min("sets", 0, 1).unwrap_err().to_string(),
            "sets must be at least 1"
        );
    }

    #[test]
    fn test_field_error_into_domain_error() {
        let err: DomainError = FieldError::Empty("name").into();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
