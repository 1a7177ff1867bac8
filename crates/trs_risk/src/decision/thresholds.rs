//! Decision thresholds and their volatility/tenor scaling.
//!
//! VaR and EPE thresholds widen for riskier trades:
//!
//! ```text
//! var_scale = clamp((σ / σ_base) × (T / T_base)^0.5, min, max)
//! epe_scale = clamp((σ / σ_base) × (T / T_base)^α,   min, max)
//! ```
//!
//! The NPV hurdle is never scaled.

use serde::{Deserialize, Serialize};

use super::result::Status;
use trs_core::validation::ensure_positive;
use trs_core::ValidationError;

/// Whether larger metric values are better or worse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricDirection {
    /// Profitability metrics: green at or above the green threshold.
    HigherIsBetter,
    /// Risk metrics: green at or below the green threshold.
    LowerIsBetter,
}

impl MetricDirection {
    /// Direction implied by a band's ordering.
    ///
    /// A green threshold above the yellow one means higher is better.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trs_risk::MetricDirection;
    ///
    /// assert_eq!(MetricDirection::infer(0.01, 0.005), MetricDirection::HigherIsBetter);
    /// assert_eq!(MetricDirection::infer(0.40, 0.55), MetricDirection::LowerIsBetter);
    /// ```
    pub fn infer(green: f64, yellow: f64) -> Self {
        if green > yellow {
            MetricDirection::HigherIsBetter
        } else {
            MetricDirection::LowerIsBetter
        }
    }
}

/// Green and yellow thresholds for one metric, as fractions of notional.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBand {
    /// Green boundary.
    pub green: f64,
    /// Yellow boundary.
    pub yellow: f64,
    /// Direction used for classification.
    pub direction: MetricDirection,
}

impl ThresholdBand {
    /// Band for a metric where higher values are better.
    pub const fn higher_is_better(green: f64, yellow: f64) -> Self {
        Self {
            green,
            yellow,
            direction: MetricDirection::HigherIsBetter,
        }
    }

    /// Band for a metric where lower values are better.
    pub const fn lower_is_better(green: f64, yellow: f64) -> Self {
        Self {
            green,
            yellow,
            direction: MetricDirection::LowerIsBetter,
        }
    }

    /// Both thresholds multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            green: self.green * factor,
            yellow: self.yellow * factor,
            direction: self.direction,
        }
    }

    /// Traffic-light status of `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trs_risk::{Status, ThresholdBand};
    ///
    /// let npv = ThresholdBand::higher_is_better(0.01, 0.005);
    /// assert_eq!(npv.classify(0.012), Status::Green);
    /// assert_eq!(npv.classify(0.005), Status::Yellow);
    /// assert_eq!(npv.classify(0.003), Status::Red);
    ///
    /// let var = ThresholdBand::lower_is_better(0.40, 0.55);
    /// assert_eq!(var.classify(0.40), Status::Green);
    /// assert_eq!(var.classify(0.60), Status::Red);
    /// ```
    pub fn classify(&self, value: f64) -> Status {
        let (green, yellow) = match self.direction {
            MetricDirection::HigherIsBetter => (value >= self.green, value >= self.yellow),
            MetricDirection::LowerIsBetter => (value <= self.green, value <= self.yellow),
        };
        if green {
            Status::Green
        } else if yellow {
            Status::Yellow
        } else {
            Status::Red
        }
    }
}

/// Scale factors applied to the VaR and EPE bands.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScaleFactors {
    /// VaR band multiplier.
    pub var: f64,
    /// EPE band multiplier.
    pub epe: f64,
}

/// Bands actually used for a decision, after scaling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AppliedThresholds {
    /// NPV band (unscaled).
    pub npv: ThresholdBand,
    /// VaR band.
    pub var: ThresholdBand,
    /// EPE band.
    pub epe: ThresholdBand,
}

/// Base thresholds and scaling parameters.
///
/// Loaded from the `[decision]` section of the configuration file; absent
/// keys keep their defaults.
///
/// # Examples
///
/// ```rust
/// use trs_risk::DecisionThresholds;
///
/// let thresholds = DecisionThresholds::default();
///
/// // Baseline trade: no scaling
/// let scale = thresholds.scale_factors(0.25, 1.0);
/// assert_eq!((scale.var, scale.epe), (1.0, 1.0));
///
/// // Doubling volatility doubles both bands
/// let scale = thresholds.scale_factors(0.50, 1.0);
/// assert_eq!((scale.var, scale.epe), (2.0, 2.0));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionThresholds {
    /// Minimum NPV / notional for green.
    pub npv_green: f64,
    /// Minimum NPV / notional for yellow.
    pub npv_yellow: f64,
    /// Maximum VaR / notional for green, before scaling.
    pub var_green: f64,
    /// Maximum VaR / notional for yellow, before scaling.
    pub var_yellow: f64,
    /// Maximum peak EPE / notional for green, before scaling.
    pub epe_green: f64,
    /// Maximum peak EPE / notional for yellow, before scaling.
    pub epe_yellow: f64,
    /// Volatility at which no scaling applies.
    pub baseline_volatility: f64,
    /// Tenor in years at which no scaling applies.
    pub baseline_tenor: f64,
    /// Lower bound on scale factors.
    pub min_scale: f64,
    /// Upper bound on scale factors.
    pub max_scale: f64,
    /// Tenor exponent of the EPE scale factor.
    pub epe_tenor_exponent: f64,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            npv_green: 0.01,
            npv_yellow: 0.005,
            var_green: 0.40,
            var_yellow: 0.55,
            epe_green: 0.10,
            epe_yellow: 0.20,
            baseline_volatility: 0.25,
            baseline_tenor: 1.0,
            min_scale: 0.5,
            max_scale: 4.0,
            epe_tenor_exponent: 0.7,
        }
    }
}

impl DecisionThresholds {
    /// Validates the thresholds.
    ///
    /// # Errors
    ///
    /// `ValidationError` naming the first non-finite or non-positive field,
    /// or the green threshold of a band whose order contradicts its
    /// direction. Bands must be strictly ordered so that each has a
    /// reachable yellow region.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [("npv_green", self.npv_green), ("npv_yellow", self.npv_yellow)] {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite { field });
            }
        }
        ensure_positive("var_green", self.var_green)?;
        ensure_positive("var_yellow", self.var_yellow)?;
        ensure_positive("epe_green", self.epe_green)?;
        ensure_positive("epe_yellow", self.epe_yellow)?;
        ensure_positive("baseline_volatility", self.baseline_volatility)?;
        ensure_positive("baseline_tenor", self.baseline_tenor)?;
        ensure_positive("min_scale", self.min_scale)?;
        ensure_positive("max_scale", self.max_scale)?;
        ensure_positive("epe_tenor_exponent", self.epe_tenor_exponent)?;

        for (band, green, yellow) in [
            (self.npv_band(), "npv_green", "npv_yellow"),
            (self.var_band(), "var_green", "var_yellow"),
            (self.epe_band(), "epe_green", "epe_yellow"),
        ] {
            let (ordered, relation) = match band.direction {
                MetricDirection::HigherIsBetter => (band.green > band.yellow, "above"),
                MetricDirection::LowerIsBetter => (band.green < band.yellow, "below"),
            };
            if !ordered {
                return Err(ValidationError::OutOfOrder {
                    field: green,
                    value: band.green,
                    relation,
                    other: yellow,
                    other_value: band.yellow,
                });
            }
        }
        if self.min_scale > self.max_scale {
            return Err(ValidationError::OutOfOrder {
                field: "min_scale",
                value: self.min_scale,
                relation: "at most",
                other: "max_scale",
                other_value: self.max_scale,
            });
        }
        Ok(())
    }

    /// Unscaled NPV band.
    pub fn npv_band(&self) -> ThresholdBand {
        ThresholdBand::higher_is_better(self.npv_green, self.npv_yellow)
    }

    /// Unscaled VaR band.
    pub fn var_band(&self) -> ThresholdBand {
        ThresholdBand::lower_is_better(self.var_green, self.var_yellow)
    }

    /// Unscaled EPE band.
    pub fn epe_band(&self) -> ThresholdBand {
        ThresholdBand::lower_is_better(self.epe_green, self.epe_yellow)
    }

    /// VaR and EPE scale factors for a trade.
    pub fn scale_factors(&self, volatility: f64, tenor: f64) -> ScaleFactors {
        let vol_ratio = volatility / self.baseline_volatility;
        let tenor_ratio = tenor / self.baseline_tenor;
        ScaleFactors {
            var: self.bound(vol_ratio * tenor_ratio.sqrt()),
            epe: self.bound(vol_ratio * tenor_ratio.powf(self.epe_tenor_exponent)),
        }
    }

    /// Bands after applying the trade's scale factors.
    pub fn applied(&self, scale: ScaleFactors) -> AppliedThresholds {
        AppliedThresholds {
            npv: self.npv_band(),
            var: self.var_band().scaled(scale.var),
            epe: self.epe_band().scaled(scale.epe),
        }
    }

    fn bound(&self, factor: f64) -> f64 {
        factor.max(self.min_scale).min(self.max_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_scale_factors_follow_tenor_exponents() {
        let t = DecisionThresholds::default();
        let scale = t.scale_factors(0.25, 4.0);
        assert_relative_eq!(scale.var, 2.0, epsilon = 1e-12);
        assert_relative_eq!(scale.epe, 4.0_f64.powf(0.7), epsilon = 1e-12);
    }

    #[test]
    fn test_scale_factors_clamped() {
        let t = DecisionThresholds::default();
        let low = t.scale_factors(0.01, 0.25);
        assert_eq!((low.var, low.epe), (0.5, 0.5));
        let high = t.scale_factors(2.0, 10.0);
        assert_eq!((high.var, high.epe), (4.0, 4.0));
    }

    #[test]
    fn test_applied_bands_scale_risk_only() {
        let t = DecisionThresholds::default();
        let applied = t.applied(ScaleFactors { var: 2.0, epe: 1.5 });
        assert_eq!(applied.npv, t.npv_band());
        assert_relative_eq!(applied.var.green, 0.80);
        assert_relative_eq!(applied.var.yellow, 1.10);
        assert_relative_eq!(applied.epe.green, 0.15, epsilon = 1e-12);
        assert_eq!(applied.epe.direction, MetricDirection::LowerIsBetter);
    }

    #[test]
    fn test_explicit_direction_matches_inference() {
        let t = DecisionThresholds::default();
        for band in [t.npv_band(), t.var_band(), t.epe_band()] {
            assert_eq!(band.direction, MetricDirection::infer(band.green, band.yellow));
        }
    }

    #[test]
    fn test_inverted_bands_rejected() {
        let cases = [
            (
                DecisionThresholds {
                    npv_green: 0.005,
                    npv_yellow: 0.01,
                    ..DecisionThresholds::default()
                },
                "npv_green",
            ),
            (
                DecisionThresholds {
                    var_green: 0.55,
                    var_yellow: 0.40,
                    ..DecisionThresholds::default()
                },
                "var_green",
            ),
            (
                DecisionThresholds {
                    epe_green: 0.20,
                    epe_yellow: 0.20,
                    ..DecisionThresholds::default()
                },
                "epe_green",
            ),
            (
                DecisionThresholds {
                    min_scale: 5.0,
                    max_scale: 4.0,
                    ..DecisionThresholds::default()
                },
                "min_scale",
            ),
        ];
        for (thresholds, field) in cases {
            let err = thresholds.validate().unwrap_err();
            assert!(
                matches!(err, ValidationError::OutOfOrder { .. }),
                "{:?}",
                err
            );
            assert_eq!(err.field(), field);
        }
    }

    #[test]
    fn test_valid_bands_agree_with_inference() {
        let t = DecisionThresholds {
            npv_green: 0.02,
            npv_yellow: -0.01,
            var_green: 0.10,
            var_yellow: 0.90,
            epe_green: 0.05,
            epe_yellow: 0.06,
            min_scale: 1.0,
            max_scale: 1.0,
            ..DecisionThresholds::default()
        };
        assert!(t.validate().is_ok());
        for band in [t.npv_band(), t.var_band(), t.epe_band()] {
            assert_eq!(band.direction, MetricDirection::infer(band.green, band.yellow));
        }
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let t: DecisionThresholds = toml::from_str("npv_green = 0.02\nmax_scale = 3.0").unwrap();
        assert_eq!(t.npv_green, 0.02);
        assert_eq!(t.max_scale, 3.0);
        assert_eq!(t.var_green, 0.40);
    }

    #[test]
    fn test_validation() {
        assert!(DecisionThresholds::default().validate().is_ok());
        let bad = DecisionThresholds {
            baseline_volatility: 0.0,
            ..DecisionThresholds::default()
        };
        assert_eq!(bad.validate().unwrap_err().field(), "baseline_volatility");
        let bad = DecisionThresholds {
            npv_green: f64::NAN,
            ..DecisionThresholds::default()
        };
        assert_eq!(bad.validate().unwrap_err().field(), "npv_green");
    }

    proptest! {
        #[test]
        fn prop_higher_is_better_monotone(a in -1.0f64..1.0, b in -1.0f64..1.0) {
            let band = ThresholdBand::higher_is_better(0.01, 0.005);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(band.classify(hi) <= band.classify(lo));
        }

        #[test]
        fn prop_lower_is_better_monotone(a in 0.0f64..2.0, b in 0.0f64..2.0, scale in 0.5f64..4.0) {
            let band = ThresholdBand::lower_is_better(0.40, 0.55).scaled(scale);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(band.classify(lo) <= band.classify(hi));
        }

        #[test]
        fn prop_scale_factors_bounded(vol in 0.001f64..5.0, tenor in 0.01f64..30.0) {
            let s = DecisionThresholds::default().scale_factors(vol, tenor);
            prop_assert!((0.5..=4.0).contains(&s.var));
            prop_assert!((0.5..=4.0).contains(&s.epe));
        }
    }
}
