//! Core types for the TRS pricer.
//!
//! This module provides:
//! - [`TradeTerms`]: immutable, fully resolved economic terms of a swap
//! - [`DeskPosition`]: which side of the swap the pricing desk takes
//! - Error types shared across every layer

pub mod error;
pub mod trade;

pub use error::{MarketDataError, NumericalError, TrsError, ValidationError};
pub use trade::{grid_size, num_periods, DeskPosition, TradeTerms, TradeTermsBuilder};
