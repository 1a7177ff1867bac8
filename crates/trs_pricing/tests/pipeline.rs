//! End-to-end pricing runs.

use approx::assert_relative_eq;
use trs_core::{NumericalError, TradeTerms, TrsError, ValidationError};
use trs_pricing::cashflow::{calculate_path_cash_flows, LegTerms};
use trs_pricing::valuation::{present_value, statistics};
use trs_pricing::{Drift, SimulationConfig, TrsPricer};

fn terms(num_simulations: usize, volatility: f64) -> TradeTerms {
    TradeTerms::builder("MSFT")
        .notional(1_000_000.0)
        .tenor(1.0)
        .payment_frequency(4)
        .num_simulations(num_simulations)
        .initial_price(100.0)
        .volatility(volatility)
        .benchmark_rate(0.05)
        .funding_spread(0.015)
        .build()
        .unwrap()
}

fn pricer(drift: Drift) -> TrsPricer {
    TrsPricer::new(SimulationConfig::builder().seed(42).drift(drift).build().unwrap())
}

#[test]
fn test_annual_quarterly_grid_has_five_columns() {
    let run = pricer(Drift::Benchmark).price(&terms(250, 0.25)).unwrap();
    assert_eq!(run.scenarios.num_columns(), 5);
    assert!(run.scenarios.paths().all(|p| p.len() == 5 && p[0] == 100.0));
    assert_eq!(run.ledgers.len(), 250);
    assert!(run.ledgers.iter().all(|l| l.len() == 4));
    assert_eq!(run.npvs.len(), 250);
}

#[test]
fn test_flat_market_funding_only() {
    let terms = terms(20, 1e-12);
    let run = pricer(Drift::Zero).price(&terms).unwrap();

    for ledger in &run.ledgers {
        for record in ledger.records() {
            assert_relative_eq!(record.total_return_leg_flow, 0.0, epsilon = 1e-3);
            assert_relative_eq!(record.funding_leg_flow, 16_250.0, epsilon = 1e-9);
            assert_relative_eq!(record.net_cash_flow, 16_250.0, epsilon = 1e-3);
        }
    }

    // Receiving fixed funding on a flat asset: NPV is the annuity value
    let annuity = present_value([16_250.0; 4], 0.05, 4);
    assert_relative_eq!(run.summary.npv_mean, annuity, epsilon = 1e-2);
    assert_relative_eq!(run.summary.npv_std, 0.0, epsilon = 1e-2);
    assert_relative_eq!(run.summary.peak_epe, annuity, epsilon = 1e-2);
    assert_eq!(run.summary.peak_epe_period, 1);
}

#[test]
fn test_reference_flat_period() {
    let legs = LegTerms {
        notional: 1_000_000.0,
        dividend_yield: 0.0,
        effective_funding_rate: 0.065,
        payment_frequency: 4,
    };
    let ledger = calculate_path_cash_flows(&[100.0, 100.0], 0, &legs).unwrap();
    let record = ledger.records()[0];
    assert_eq!(record.total_return_leg_flow, 0.0);
    assert_eq!(record.funding_leg_flow, 16_250.0);
    assert_eq!(record.net_cash_flow, 16_250.0);
}

#[test]
fn test_summary_is_consistent_with_run() {
    let run = pricer(Drift::Benchmark).price(&terms(500, 0.3)).unwrap();
    let s = &run.summary;

    assert_relative_eq!(s.npv_mean, statistics::mean(&run.npvs).unwrap(), epsilon = 1e-9);
    assert!(s.npv_percentiles.p5 <= s.npv_percentiles.p50);
    assert!(s.npv_percentiles.p50 <= s.npv_percentiles.p95);
    assert_eq!(s.epe_profile, run.exposure.epe());
    assert_eq!(s.epe_times, vec![0.25, 0.5, 0.75, 1.0]);
    assert!(s.epe_profile.iter().all(|e| *e >= 0.0));
    assert_eq!(s.peak_epe, s.epe_profile[s.peak_epe_period - 1]);
    assert_relative_eq!(s.funding_leg_total, 65_000.0, epsilon = 1e-6);
    assert_relative_eq!(s.delta_exposure, 10_000.0);
    assert_eq!(s.terms.ticker(), "MSFT");
}

#[test]
fn test_short_tenor_gives_empty_profile() {
    let terms = TradeTerms::builder("MSFT")
        .notional(1_000_000.0)
        .tenor(0.1)
        .payment_frequency(4)
        .num_simulations(10)
        .initial_price(100.0)
        .volatility(0.2)
        .benchmark_rate(0.05)
        .build()
        .unwrap();
    let run = pricer(Drift::Benchmark).price(&terms).unwrap();

    assert_eq!(run.summary.num_periods, 0);
    assert!(run.summary.epe_profile.is_empty());
    assert_eq!(run.summary.npv_mean, 0.0);
    assert_eq!(run.summary.peak_epe, 0.0);
    assert_eq!(run.summary.peak_epe_period, 0);
}

#[test]
fn test_invalid_drift_is_a_validation_error() {
    let err = SimulationConfig::builder()
        .drift(Drift::Fixed(f64::INFINITY))
        .build()
        .unwrap_err();
    assert_eq!(err, ValidationError::NonFinite { field: "drift" });
}

#[test]
fn test_error_classes_are_distinct() {
    let numerical: TrsError = NumericalError::InsufficientData { what: "mean" }.into();
    assert!(numerical.is_numerical());
    assert!(!numerical.is_validation());
}
