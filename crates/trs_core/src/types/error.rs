//! Error types for structured error handling.
//!
//! This module provides:
//! - `ValidationError`: bad or missing inputs, detected before any simulation
//! - `NumericalError`: guards against division by zero and empty statistics
//! - `MarketDataError`: failures of the upstream market-data collaborator
//! - `TrsError`: the union surfaced to callers of the pricing pipeline

use thiserror::Error;

/// Input validation errors.
///
/// Every variant names the offending field so that callers can report it
/// without parsing the message.
///
/// # Examples
/// ```
/// use trs_core::types::ValidationError;
///
/// let err = ValidationError::NonPositive { field: "notional", value: -1.0 };
/// assert_eq!(format!("{}", err), "Invalid parameter 'notional': -1 must be positive");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required parameter was not supplied.
    #[error("Missing required parameter: {field}")]
    Missing {
        /// Parameter name
        field: &'static str,
    },

    /// A parameter that must be strictly positive was zero or negative.
    #[error("Invalid parameter '{field}': {value} must be positive")]
    NonPositive {
        /// Parameter name
        field: &'static str,
        /// Value supplied
        value: f64,
    },

    /// A parameter that must be non-negative was negative.
    #[error("Invalid parameter '{field}': {value} must be non-negative")]
    Negative {
        /// Parameter name
        field: &'static str,
        /// Value supplied
        value: f64,
    },

    /// A parameter was NaN or infinite.
    #[error("Invalid parameter '{field}': value must be finite")]
    NonFinite {
        /// Parameter name
        field: &'static str,
    },

    /// A parameter would make the simulation grid unaddressable.
    #[error("Invalid parameter '{field}': {value} makes the simulation grid too large")]
    TooLarge {
        /// Parameter name
        field: &'static str,
        /// Value supplied
        value: f64,
    },

    /// Two related parameters are in the wrong order.
    #[error("Invalid parameter '{field}': {value} must be {relation} '{other}' ({other_value})")]
    OutOfOrder {
        /// Parameter name
        field: &'static str,
        /// Value supplied
        value: f64,
        /// Required relation, e.g. "above"
        relation: &'static str,
        /// Parameter it is compared with
        other: &'static str,
        /// Value of that parameter
        other_value: f64,
    },

    /// Desk position string was neither payer nor receiver.
    #[error("Invalid desk position '{0}': expected 'payer' or 'receiver'")]
    InvalidDeskPosition(String),

    /// Ticker was empty after trimming.
    #[error("Ticker cannot be empty")]
    EmptyTicker,
}

impl ValidationError {
    /// Returns the name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field }
            | Self::NonPositive { field, .. }
            | Self::Negative { field, .. }
            | Self::NonFinite { field }
            | Self::TooLarge { field, .. }
            | Self::OutOfOrder { field, .. } => field,
            Self::InvalidDeskPosition(_) => "desk_position",
            Self::EmptyTicker => "ticker",
        }
    }
}

/// Numerical guard errors raised inside the pipeline.
///
/// # Examples
/// ```
/// use trs_core::types::NumericalError;
///
/// let err = NumericalError::InsufficientData { what: "NPV statistics" };
/// assert!(format!("{}", err).contains("NPV statistics"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericalError {
    /// A period started at a non-positive price (division by zero risk).
    #[error("Non-positive period start price {price} on path {path}, period {period}")]
    NonPositivePrice {
        /// Path index (0-based)
        path: usize,
        /// Period index (1-based)
        period: usize,
        /// Offending price
        price: f64,
    },

    /// A statistic was requested over an empty sample.
    #[error("Insufficient data for {what}: no samples")]
    InsufficientData {
        /// Description of the statistic
        what: &'static str,
    },

    /// Collections that must line up have different lengths.
    #[error("Length mismatch in {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Description of the collection
        what: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },
}

/// Failures of the market-data collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// The provider has no value for the requested field.
    #[error("Market data unavailable for {ticker}: {field}")]
    Unavailable {
        /// Ticker requested
        ticker: String,
        /// Field requested
        field: &'static str,
    },

    /// Not enough price history to estimate a statistic.
    #[error("Insufficient history for {ticker}: got {got} returns, need at least {need}")]
    InsufficientHistory {
        /// Ticker requested
        ticker: String,
        /// Number of returns available
        got: usize,
        /// Minimum number required
        need: usize,
    },
}

/// Error surfaced by every public pipeline entry point.
///
/// # Examples
/// ```
/// use trs_core::types::{TrsError, ValidationError};
///
/// let err: TrsError = ValidationError::Missing { field: "tenor" }.into();
/// assert!(err.is_validation());
/// assert!(!err.is_numerical());
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrsError {
    /// Input validation failed.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A numerical guard tripped.
    #[error("Numerical error: {0}")]
    Numerical(#[from] NumericalError),

    /// Market data could not be resolved and no default applies.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),
}

impl TrsError {
    /// Returns `true` for input validation failures.
    #[inline]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns `true` for numerical guard failures.
    #[inline]
    pub fn is_numerical(&self) -> bool {
        matches!(self, Self::Numerical(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::Missing { field: "ticker" };
        assert_eq!(err.to_string(), "Missing required parameter: ticker");

        let err = ValidationError::Negative {
            field: "dividend_yield",
            value: -0.01,
        };
        assert!(err.to_string().contains("dividend_yield"));
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn test_validation_error_field() {
        assert_eq!(
            ValidationError::NonPositive {
                field: "volatility",
                value: 0.0
            }
            .field(),
            "volatility"
        );
        assert_eq!(
            ValidationError::InvalidDeskPosition("both".to_string()).field(),
            "desk_position"
        );
        assert_eq!(ValidationError::EmptyTicker.field(), "ticker");
        assert_eq!(
            ValidationError::TooLarge {
                field: "tenor",
                value: 1e19
            }
            .field(),
            "tenor"
        );

        let err = ValidationError::OutOfOrder {
            field: "var_green",
            value: 0.6,
            relation: "below",
            other: "var_yellow",
            other_value: 0.4,
        };
        assert_eq!(err.field(), "var_green");
        assert!(err.to_string().contains("must be below 'var_yellow'"));
    }

    #[test]
    fn test_numerical_error_display() {
        let err = NumericalError::NonPositivePrice {
            path: 3,
            period: 2,
            price: 0.0,
        };
        assert!(err.to_string().contains("path 3"));

        let err = NumericalError::LengthMismatch {
            what: "cash flow ledgers",
            expected: 4,
            actual: 3,
        };
        assert!(err.to_string().contains("expected 4, got 3"));
    }

    #[test]
    fn test_trs_error_classification() {
        let err: TrsError = NumericalError::InsufficientData { what: "EPE" }.into();
        assert!(err.is_numerical());
        assert!(!err.is_validation());

        let err: TrsError = MarketDataError::Unavailable {
            ticker: "XYZ".to_string(),
            field: "current price",
        }
        .into();
        assert!(!err.is_numerical());
        assert!(!err.is_validation());
        assert!(err.to_string().contains("XYZ"));
    }
}
