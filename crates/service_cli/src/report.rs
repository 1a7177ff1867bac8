//! Console reports for pricing runs and trade decisions.

use std::fmt::Write;

use trs_market::InputSources;
use trs_pricing::PricingRun;
use trs_risk::{DecisionResult, DecisionThresholds, Status, ThresholdBand};

const WIDE_RULE: usize = 60;
const NARROW_RULE: usize = 40;

/// Format a currency amount with thousands separators and no decimals.
///
/// ```text
/// 1234567.4  -> $1,234,567
/// -16250.0   -> -$16,250
/// ```
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return format!("${}", value);
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Like [`format_amount`] with an explicit `+` for non-negative values.
fn format_signed_amount(value: f64) -> String {
    if value >= 0.0 {
        format!("+{}", format_amount(value))
    } else {
        format_amount(value)
    }
}

fn pct(value: f64) -> f64 {
    value * 100.0
}

fn rule(out: &mut String, c: char, width: usize) {
    out.extend(std::iter::repeat(c).take(width));
    out.push('\n');
}

/// Console report of a pricing run.
pub fn summary_report(run: &PricingRun, sources: &InputSources) -> String {
    let summary = &run.summary;
    let terms = &summary.terms;
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "=== TRS Pricing Simulation Results ===");
    let _ = writeln!(out, "Reference Asset: {}", terms.ticker());
    let _ = writeln!(out, "Notional: {}", format_amount(terms.notional()));
    let _ = writeln!(out, "Tenor: {} years", terms.tenor());
    let _ = writeln!(out, "Desk Position: {}", terms.desk_position().as_str());
    rule(&mut out, '-', NARROW_RULE);

    let _ = writeln!(out, "Market Data:");
    let _ = writeln!(
        out,
        "  Initial Price: ${:.2} ({})",
        terms.initial_price(),
        sources.initial_price.label()
    );
    let _ = writeln!(
        out,
        "  Dividend Yield: {:.2}% ({})",
        pct(terms.dividend_yield()),
        sources.dividend_yield.label()
    );
    let _ = writeln!(
        out,
        "  Volatility: {:.1}% ({})",
        pct(terms.volatility()),
        sources.volatility.label()
    );
    let _ = writeln!(
        out,
        "  Benchmark Rate: {:.2}% ({})",
        pct(terms.benchmark_rate()),
        sources.benchmark_rate.label()
    );
    let _ = writeln!(
        out,
        "  Funding Spread: {:.2}% ({})",
        pct(terms.funding_spread()),
        sources.funding_spread.label()
    );
    let _ = writeln!(
        out,
        "  Effective Funding Rate: {:.2}%",
        pct(terms.effective_funding_rate())
    );
    rule(&mut out, '-', NARROW_RULE);

    let p = &summary.npv_percentiles;
    let _ = writeln!(out, "Valuation (Desk's Perspective):");
    let _ = writeln!(out, "  Expected NPV: {}", format_signed_amount(summary.npv_mean));
    let _ = writeln!(out, "  Std Dev of NPV: {}", format_amount(summary.npv_std));
    for (label, value) in [
        ("5th", p.p5),
        ("25th", p.p25),
        ("50th", p.p50),
        ("75th", p.p75),
        ("95th", p.p95),
    ] {
        let _ = writeln!(out, "  {} Percentile NPV: {}", label, format_amount(value));
    }
    rule(&mut out, '-', NARROW_RULE);

    let _ = writeln!(out, "Total Cash Flows (Undiscounted, Mean Across Simulations):");
    let _ = writeln!(
        out,
        "  Total Return Leg (Desk -> Client): {}",
        format_amount(summary.total_return_leg_total)
    );
    let _ = writeln!(
        out,
        "  Funding Leg (Client -> Desk): {}",
        format_amount(summary.funding_leg_total)
    );
    let _ = writeln!(
        out,
        "  Net Cash Flow (Undiscounted): {}",
        format_amount(summary.funding_leg_total - summary.total_return_leg_total)
    );
    rule(&mut out, '-', NARROW_RULE);

    let _ = writeln!(out, "Risk Metrics:");
    if summary.peak_epe_period > 0 {
        let _ = writeln!(
            out,
            "  Peak EPE (at {:.2} years): {}",
            summary.peak_epe_time(),
            format_amount(summary.peak_epe)
        );
    } else {
        let _ = writeln!(out, "  Peak EPE: {}", format_amount(summary.peak_epe));
    }
    let _ = writeln!(out, "  Delta Exposure: {:.2} shares", summary.delta_exposure);
    let _ = writeln!(
        out,
        "  Funding Rate Exposure: {}",
        format_amount(summary.funding_rate_exposure)
    );
    rule(&mut out, '-', NARROW_RULE);

    let _ = writeln!(out, "Simulation Details:");
    let _ = writeln!(out, "  Number of Simulations: {}", summary.num_simulations);
    let _ = writeln!(out, "  Payment Frequency: {} per year", terms.payment_frequency());
    let _ = writeln!(out, "  Periods: {}", summary.num_periods);
    let _ = writeln!(out, "  Seed: {}", run.seed());
    let _ = write!(out, "  Elapsed: {:.3}s", run.elapsed.as_secs_f64());

    out
}

fn status_label(status: Status) -> String {
    let mark = match status {
        Status::Green => "[OK]",
        Status::Yellow => "[!]",
        Status::Red => "[X]",
    };
    format!("{} {}", mark, status.verdict())
}

fn band_line(band: &ThresholdBand) -> String {
    let op = match band.direction {
        trs_risk::MetricDirection::HigherIsBetter => ">=",
        trs_risk::MetricDirection::LowerIsBetter => "<=",
    };
    format!(
        "Thresholds: Green {}{:.2}% | Yellow {}{:.2}%",
        op,
        pct(band.green),
        op,
        pct(band.yellow)
    )
}

/// One-page decision report.
///
/// `base` is the unscaled threshold configuration the engine ran with.
pub fn decision_report(
    run: &PricingRun,
    decision: &DecisionResult,
    base: &DecisionThresholds,
) -> String {
    let terms = &run.summary.terms;
    let volatility = terms.volatility();
    let tenor = terms.tenor();
    let mut out = String::new();

    rule(&mut out, '=', WIDE_RULE);
    let _ = writeln!(out, "TRS DECISION DASHBOARD - TRADE EVALUATION REPORT");
    rule(&mut out, '=', WIDE_RULE);
    out.push('\n');

    let _ = writeln!(out, "TRADE DETAILS");
    rule(&mut out, '-', WIDE_RULE);
    let _ = writeln!(out, "Reference Asset: {}", terms.ticker());
    let _ = writeln!(out, "Notional: {}", format_amount(terms.notional()));
    let _ = writeln!(out, "Tenor: {} years", tenor);
    let _ = writeln!(out, "Payment Frequency: {} per year", terms.payment_frequency());
    out.push('\n');

    let _ = writeln!(out, "OVERALL DECISION");
    rule(&mut out, '-', WIDE_RULE);
    let _ = writeln!(out, "Status: {}", status_label(decision.overall_status));
    out.push('\n');

    let _ = writeln!(out, "KEY METRICS (as % of Notional)");
    rule(&mut out, '-', WIDE_RULE);
    let scaling_note = format!(
        "  Note: Thresholds adjusted for volatility ({:.1}%) and tenor ({:.2} years)",
        pct(volatility),
        tenor
    );
    let metrics = [
        (
            "NPV / Notional",
            decision.metrics.npv_pct,
            decision.statuses.npv,
            &decision.thresholds.npv,
            1.0,
        ),
        (
            "VaR / Notional (95%)",
            decision.metrics.var_pct,
            decision.statuses.var,
            &decision.thresholds.var,
            decision.scale_factors.var,
        ),
        (
            "Peak EPE / Notional",
            decision.metrics.epe_pct,
            decision.statuses.epe,
            &decision.thresholds.epe,
            decision.scale_factors.epe,
        ),
    ];
    for (label, value, status, band, scale) in metrics {
        let _ = writeln!(out, "{}: {:.2}%", label, pct(value));
        let _ = writeln!(out, "  Status: {}", status_label(status));
        let _ = writeln!(out, "  {}", band_line(band));
        if scale != 1.0 {
            let _ = writeln!(out, "{}", scaling_note);
        }
        out.push('\n');
    }

    let _ = writeln!(out, "THRESHOLD CALCULATION");
    rule(&mut out, '-', WIDE_RULE);
    let _ = writeln!(out, "NPV (profitability):");
    let _ = writeln!(
        out,
        "  Base thresholds: Green >={:.1}% of notional, Yellow >={:.1}%. Not scaled.",
        pct(base.npv_green),
        pct(base.npv_yellow)
    );
    let _ = writeln!(out, "VaR (tail risk, 5th percentile NPV / notional):");
    let _ = writeln!(
        out,
        "  Base thresholds: Green <={:.0}%, Yellow <={:.0}% of notional.",
        pct(base.var_green),
        pct(base.var_yellow)
    );
    let _ = writeln!(
        out,
        "  Scale = ({:.1}% / {:.0}%) x sqrt({:.2} / {}), clamped [{}, {}] = {:.3}",
        pct(volatility),
        pct(base.baseline_volatility),
        tenor,
        base.baseline_tenor,
        base.min_scale,
        base.max_scale,
        decision.scale_factors.var
    );
    let _ = writeln!(out, "EPE (credit risk, peak EPE / notional):");
    let _ = writeln!(
        out,
        "  Base thresholds: Green <={:.0}%, Yellow <={:.0}% of notional.",
        pct(base.epe_green),
        pct(base.epe_yellow)
    );
    let _ = writeln!(
        out,
        "  Scale = ({:.1}% / {:.0}%) x ({:.2} / {})^{}, clamped [{}, {}] = {:.3}",
        pct(volatility),
        pct(base.baseline_volatility),
        tenor,
        base.baseline_tenor,
        base.epe_tenor_exponent,
        base.min_scale,
        base.max_scale,
        decision.scale_factors.epe
    );
    out.push('\n');

    let _ = writeln!(out, "ISSUES IDENTIFIED");
    rule(&mut out, '-', WIDE_RULE);
    if decision.issues.is_empty() {
        let _ = writeln!(out, "  None - All metrics within acceptable thresholds");
    }
    for issue in &decision.issues {
        let _ = writeln!(out, "  * {}", issue.description());
    }
    out.push('\n');

    let _ = writeln!(out, "ADJUSTMENT RECOMMENDATIONS");
    rule(&mut out, '-', WIDE_RULE);
    let adj = &decision.adjustments;
    if adj.is_empty() {
        let _ = writeln!(out, "  None - Trade meets all thresholds without adjustments");
        out.push('\n');
    }
    if let Some(spread) = &adj.spread_adjustment {
        let _ = writeln!(out, "Spread Adjustment:");
        let _ = writeln!(out, "  Current Spread: {:.2}%", pct(terms.funding_spread()));
        let _ = writeln!(out, "  Recommended Increase: {:.1} basis points", spread.delta_bps);
        let _ = writeln!(out, "  New Spread: {:.2}%", pct(spread.new_spread));
        out.push('\n');
    }
    if let Some(reduction) = &adj.notional_reduction {
        let _ = writeln!(out, "Notional Reduction:");
        let _ = writeln!(out, "  Current Notional: {}", format_amount(terms.notional()));
        let _ = writeln!(out, "  Recommended Reduction: {:.2}%", reduction.reduction_pct);
        let _ = writeln!(out, "  New Notional: {}", format_amount(reduction.new_notional));
        out.push('\n');
    }
    if let Some(collateral) = &adj.collateral_requirement {
        let _ = writeln!(out, "Collateral Requirement:");
        let _ = writeln!(
            out,
            "  Required Collateral: {:.2}% of notional",
            collateral.collateral_pct
        );
        let _ = writeln!(
            out,
            "  Collateral Amount: {}",
            format_amount(collateral.collateral_amount)
        );
        out.push('\n');
    }

    rule(&mut out, '=', WIDE_RULE);
    let _ = writeln!(
        out,
        "Note: Re-run simulation with adjusted parameters to verify impact of changes."
    );
    rule(&mut out, '=', WIDE_RULE);

    out
}
