//! Form-level validation applied before a mutation is submitted
//!
//! The backend enforces the same rules; checking them here only avoids a
//! round trip for input that is certain to be rejected.

use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors};

// ============================================================================
// Field Validators
// ============================================================================

/// Required text fields must contain something other than whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some("this field is required".into());
        return Err(error);
    }
    Ok(())
}

/// Quantities and prices cannot be negative
pub fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.message = Some("value cannot be negative".into());
        return Err(error);
    }
    Ok(())
}

/// Movement quantities must be greater than zero
pub fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut error = ValidationError::new("positive");
        error.message = Some("value must be greater than zero".into());
        return Err(error);
    }
    Ok(())
}

// ============================================================================
// Reporting
// ============================================================================

/// Flatten validation errors into a single display message
///
/// Fields are listed alphabetically so the message is stable.
pub fn describe_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}
