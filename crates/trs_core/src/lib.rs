//! # trs_core: Foundation Types for the TRS Pricer
//!
//! ## Layer 1 (Foundation) Role
//!
//! trs_core is the bottom layer of the pricer and provides:
//! - Resolved trade terms: `TradeTerms`, `DeskPosition` (`types::trade`)
//! - Error taxonomy: `ValidationError`, `NumericalError`, `MarketDataError`,
//!   `TrsError` (`types::error`)
//! - Input validation helpers (`validation`)
//! - Fallback constants for market data and trade defaults (`defaults`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other trs_* crates and only two external ones:
//! - thiserror: structured error enums
//! - serde: serialisation of trade terms for reports
//!
//! ## Usage Example
//!
//! ```rust
//! use trs_core::types::{DeskPosition, TradeTerms};
//!
//! let terms = TradeTerms::builder("msft")
//!     .notional(5_000_000.0)
//!     .tenor(2.0)
//!     .payment_frequency(4)
//!     .num_simulations(5_000)
//!     .initial_price(420.0)
//!     .dividend_yield(0.008)
//!     .volatility(0.25)
//!     .benchmark_rate(0.05)
//!     .funding_spread(0.02)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(terms.ticker(), "MSFT");
//! assert_eq!(terms.num_periods(), 8);
//! assert_eq!(terms.desk_position(), DeskPosition::Receiver);
//! assert!((terms.effective_funding_rate() - 0.07).abs() < 1e-12);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod defaults;
pub mod types;
pub mod validation;

pub use types::{
    DeskPosition, MarketDataError, NumericalError, TradeTerms, TradeTermsBuilder, TrsError,
    ValidationError,
};
