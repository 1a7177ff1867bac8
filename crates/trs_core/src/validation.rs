//! Field-level validation helpers.
//!
//! Shared by trade resolution, simulation setup and the decision engine so
//! that every layer reports the same error for the same defect.

use crate::types::ValidationError;

/// Ensures `value` is finite and strictly positive.
///
/// # Examples
///
/// ```
/// use trs_core::validation::ensure_positive;
///
/// assert_eq!(ensure_positive("tenor", 2.0), Ok(2.0));
/// assert!(ensure_positive("tenor", 0.0).is_err());
/// assert!(ensure_positive("tenor", f64::NAN).is_err());
/// ```
#[inline]
pub fn ensure_positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositive { field, value });
    }
    Ok(value)
}

/// Ensures `value` is finite and non-negative.
///
/// # Examples
///
/// ```
/// use trs_core::validation::ensure_non_negative;
///
/// assert_eq!(ensure_non_negative("dividend_yield", 0.0), Ok(0.0));
/// assert!(ensure_non_negative("dividend_yield", -0.01).is_err());
/// ```
#[inline]
pub fn ensure_non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(value)
}

/// Ensures an integer count is at least one.
#[inline]
pub fn ensure_positive_count(field: &'static str, value: usize) -> Result<usize, ValidationError> {
    if value == 0 {
        return Err(ValidationError::NonPositive { field, value: 0.0 });
    }
    Ok(value)
}

/// Unwraps a required optional parameter.
#[inline]
pub fn require<T>(field: &'static str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::Missing { field })
}
