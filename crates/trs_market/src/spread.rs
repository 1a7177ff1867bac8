//! Hybrid multi-factor funding spread model.
//!
//! ```text
//! spread = base × clamp(1 + beta_adj + vol_adj, 0.5, 2.0)
//!               × market_cap_factor × sector_factor × leverage_factor
//! ```
//!
//! bounded to `[min_spread, max_spread]`. Unknown issuer attributes
//! contribute a neutral factor.

use serde::Deserialize;
use trs_core::defaults::DEFAULT_FUNDING_SPREAD;

/// Issuer fundamentals that drive the funding spread.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IssuerProfile {
    /// Equity beta against the market.
    pub beta: Option<f64>,
    /// Market capitalisation in currency units.
    pub market_cap: Option<f64>,
    /// Sector name (case-insensitive).
    pub sector: Option<String>,
    /// Industry name (case-insensitive).
    pub industry: Option<String>,
    /// Debt-to-equity ratio.
    pub debt_to_equity: Option<f64>,
}

/// Funding spread estimator.
///
/// # Examples
///
/// ```
/// use trs_market::spread::{FundingSpreadModel, IssuerProfile};
///
/// let model = FundingSpreadModel::default();
///
/// // Neutral issuer at the 20% volatility baseline gets the base spread
/// let spread = model.estimate(&IssuerProfile::default(), Some(0.20));
/// assert!((spread - 0.015).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FundingSpreadModel {
    /// Spread for a neutral issuer.
    pub base_spread: f64,
    /// Lower bound on the estimate.
    pub min_spread: f64,
    /// Upper bound on the estimate.
    pub max_spread: f64,
}

impl Default for FundingSpreadModel {
    fn default() -> Self {
        Self {
            base_spread: DEFAULT_FUNDING_SPREAD,
            min_spread: 0.005,
            max_spread: 0.05,
        }
    }
}

impl FundingSpreadModel {
    /// Estimates the annual funding spread for an issuer.
    ///
    /// `volatility` is the issuer's annualised volatility when known.
    pub fn estimate(&self, profile: &IssuerProfile, volatility: Option<f64>) -> f64 {
        let risk_term = (1.0 + beta_adjustment(profile.beta) + volatility_adjustment(volatility))
            .clamp(0.5, 2.0);

        let spread = self.base_spread
            * risk_term
            * market_cap_factor(profile.market_cap)
            * sector_factor(profile.sector.as_deref(), profile.industry.as_deref())
            * leverage_factor(profile.debt_to_equity);

        spread.clamp(self.min_spread, self.max_spread)
    }
}

/// Additive adjustment from beta; beta = 1 is neutral.
fn beta_adjustment(beta: Option<f64>) -> f64 {
    match beta {
        Some(b) if b.is_finite() => (b.clamp(0.3, 3.0) - 1.0) * 0.3,
        _ => 0.0,
    }
}

/// Additive adjustment from volatility against a 20% baseline.
fn volatility_adjustment(volatility: Option<f64>) -> f64 {
    match volatility {
        Some(v) if v.is_finite() => ((v - 0.20) * 1.5).clamp(-0.5, 1.0),
        _ => 0.0,
    }
}

/// Large issuers fund more cheaply.
fn market_cap_factor(market_cap: Option<f64>) -> f64 {
    let Some(cap) = market_cap.filter(|c| c.is_finite()) else {
        return 1.0;
    };
    let billions = cap / 1e9;
    if billions > 200.0 {
        0.8
    } else if billions > 50.0 {
        0.9
    } else if billions > 10.0 {
        1.0
    } else {
        1.2
    }
}

fn sector_factor(sector: Option<&str>, industry: Option<&str>) -> f64 {
    let sector = sector.unwrap_or_default().to_uppercase();
    let industry = industry.unwrap_or_default().to_uppercase();

    if sector.contains("UTILITIES") || sector.contains("CONSUMER STAPLES") {
        0.85
    } else if sector.contains("ENERGY") || sector.contains("MATERIALS") {
        1.15
    } else if sector.contains("TECHNOLOGY") || industry.contains("BIOTECH") {
        1.10
    } else {
        1.0
    }
}

fn leverage_factor(debt_to_equity: Option<f64>) -> f64 {
    let Some(d) = debt_to_equity.filter(|d| d.is_finite()) else {
        return 1.0;
    };
    if d < 0.5 {
        0.95
    } else if d < 1.0 {
        1.0
    } else if d < 2.0 {
        1.10
    } else {
        1.20
    }
}
