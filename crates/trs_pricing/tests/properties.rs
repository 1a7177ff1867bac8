//! Property tests over random trade inputs.

use proptest::prelude::*;
use trs_core::TradeTerms;
use trs_pricing::valuation::present_value;
use trs_pricing::{Drift, SimulationConfig, TrsPricer};

fn arb_terms() -> impl Strategy<Value = TradeTerms> {
    (
        1_000.0f64..1e8,
        0.25f64..3.0,
        prop::sample::select(vec![1u32, 2, 4, 12]),
        1.0f64..1_000.0,
        0.0f64..0.08,
        0.01f64..1.2,
        0.0f64..0.1,
        0.0f64..0.05,
    )
        .prop_map(|(notional, tenor, f, price, q, vol, r, s)| {
            TradeTerms::builder("PROP")
                .notional(notional)
                .tenor(tenor)
                .payment_frequency(f)
                .num_simulations(40)
                .initial_price(price)
                .dividend_yield(q)
                .volatility(vol)
                .benchmark_rate(r)
                .funding_spread(s)
                .build()
                .unwrap()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_epe_never_negative(terms in arb_terms(), seed in any::<u64>()) {
        let pricer = TrsPricer::new(SimulationConfig::builder().seed(seed).build().unwrap());
        let run = pricer.price(&terms).unwrap();

        prop_assert_eq!(run.summary.epe_profile.len(), terms.num_periods());
        prop_assert!(run.summary.epe_profile.iter().all(|e| *e >= 0.0));
        prop_assert!(run.summary.peak_epe >= 0.0);
    }

    #[test]
    fn prop_scenarios_strictly_positive(terms in arb_terms(), seed in any::<u64>()) {
        let pricer = TrsPricer::new(
            SimulationConfig::builder().seed(seed).drift(Drift::Zero).build().unwrap(),
        );
        let run = pricer.price(&terms).unwrap();
        prop_assert!(run.scenarios.as_slice().iter().all(|p| *p > 0.0));
    }

    #[test]
    fn prop_zero_ledger_npv_is_zero(n in 0usize..64, r in 0.0f64..1.0, f in 1u32..=52) {
        prop_assert_eq!(present_value(vec![0.0; n], r, f), 0.0);
    }
}
