//! # Error Types
//!
//! Domain-specific error types for saffra-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  saffra-core errors (this file)                                        │
//! │  ├── CoreError        - Misuse of the core API                         │
//! │  └── ValidationError  - One failed field or cross-field rule           │
//! │                                                                         │
//! │  saffra-relay errors (separate crate)                                  │
//! │  └── RelayError       - Config, transport and relay failures           │
//! │                                                                         │
//! │  Flow: ValidationError ──► FieldErrors ──► shown inline per field      │
//! │        RelayError ──► logged ──► generic status message                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. `thiserror` derives, no manual `Display` impls
//! 2. A `ValidationError` displays as the exact text shown under the field
//! 3. Errors are enum variants, never bare strings

use serde::Serialize;
use thiserror::Error;

use crate::money::Money;
use crate::types::Field;
use crate::validation::FieldErrors;

// =============================================================================
// Core Error
// =============================================================================

#[derive(Debug, Error)]
pub enum CoreError {
    /// A field name coming from the frontend does not exist.
    #[error("Unknown form field: {0}")]
    UnknownField(String),

    /// The field exists but belongs to another form.
    #[error("Field {field} is not part of this form")]
    FieldNotInForm { field: Field },

    /// A submission is already in flight for this session.
    #[error("A submission is already in progress")]
    SubmissionInProgress,

    /// Whole-form validation failed; nothing was sent.
    #[error("Submission rejected: {0}")]
    InvalidSubmission(FieldErrors),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single failed rule.
///
/// `Display` is the user-facing message; the structured fields are there
/// for logging and for the frontend's error map.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{message}")]
    Required { field: Field, message: &'static str },

    /// Value is shorter than the field allows.
    #[error("{message}")]
    TooShort {
        field: Field,
        min: usize,
        message: &'static str,
    },

    /// Value is longer than the field allows.
    #[error("{message}")]
    TooLong {
        field: Field,
        max: usize,
        message: &'static str,
    },

    /// Value does not have the expected shape (e.g. email).
    #[error("{message}")]
    InvalidFormat { field: Field, message: &'static str },

    /// Numeric value is out of range.
    #[error("{message}")]
    OutOfRange {
        field: Field,
        min: i64,
        max: i64,
        message: &'static str,
    },

    /// Date lies before the earliest allowed day.
    #[error("{message}")]
    DateInPast { field: Field, message: &'static str },

    /// Quoted total does not match items plus delivery.
    #[error("Total amount {actual} does not match the items and delivery ({expected})")]
    AmountMismatch { expected: Money, actual: Money },
}

impl ValidationError {
    /// The field this error is reported under.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Required { field, .. }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::DateInPast { field, .. } => *field,
            ValidationError::AmountMismatch { .. } => Field::TotalAmount,
        }
    }
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_displays_user_message() {
        let err = ValidationError::TooShort {
            field: Field::Message,
            min: 10,
            message: "Please tell us a bit more (at least 10 characters)",
        };
        assert_eq!(
            err.to_string(),
            "Please tell us a bit more (at least 10 characters)"
        );
        assert_eq!(err.field(), Field::Message);
    }

    #[test]
    fn test_amount_mismatch_message() {
        let err = ValidationError::AmountMismatch {
            expected: Money::from_major(229),
            actual: Money::from_major(180),
        };
        assert_eq!(
            err.to_string(),
            "Total amount 180 kr does not match the items and delivery (229 kr)"
        );
        assert_eq!(err.field(), Field::TotalAmount);
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let err = ValidationError::Required {
            field: Field::Name,
            message: "Please enter your name",
        };
        let core_err: CoreError = err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
