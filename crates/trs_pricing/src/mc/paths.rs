//! Geometric Brownian Motion price-path simulation.
//!
//! Paths are simulated on the payment grid with the exact log-space step
//!
//! ```text
//! S(t) = S(t-1) × exp((μ - 0.5σ²)dt + σ√dt × Z),   dt = 1/f
//! ```
//!
//! and stored row-major in a single buffer, `prices[path * (n + 1) + step]`.

use rayon::prelude::*;
use tracing::debug;

use super::config::SimulationConfig;
use crate::rng::{derive_stream_seeds, TrsRng};
use trs_core::types::{grid_size, num_periods};
use trs_core::validation::{ensure_positive, ensure_positive_count};
use trs_core::{TradeTerms, ValidationError};

/// Parameters of the simulated price process.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GbmParams {
    /// Price at t = 0.
    pub initial_price: f64,
    /// Annual drift μ.
    pub drift: f64,
    /// Annualised volatility σ.
    pub volatility: f64,
    /// Horizon in years.
    pub tenor: f64,
    /// Grid points per year.
    pub payment_frequency: u32,
}

impl GbmParams {
    /// Process parameters for a trade under the configured drift convention.
    pub fn from_terms(terms: &TradeTerms, config: &SimulationConfig) -> Self {
        Self {
            initial_price: terms.initial_price(),
            drift: config.drift().rate(terms.benchmark_rate()),
            volatility: terms.volatility(),
            tenor: terms.tenor(),
            payment_frequency: terms.payment_frequency(),
        }
    }

    /// Number of simulated periods, `floor(tenor × payment_frequency)`.
    #[inline]
    pub fn num_periods(&self) -> usize {
        num_periods(self.tenor, self.payment_frequency)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        ensure_positive("initial_price", self.initial_price)?;
        ensure_positive("tenor", self.tenor)?;
        ensure_positive("volatility", self.volatility)?;
        ensure_positive_count("payment_frequency", self.payment_frequency as usize)?;
        if !self.drift.is_finite() {
            return Err(ValidationError::NonFinite { field: "drift" });
        }
        Ok(())
    }
}

/// Simulated price grid of shape `(num_paths, num_periods + 1)`.
///
/// Column 0 is the initial price on every row and every entry is strictly
/// positive. The set is read-only once produced.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceScenarioSet {
    prices: Vec<f64>,
    num_paths: usize,
    num_periods: usize,
    seed: u64,
}

impl PriceScenarioSet {
    /// Number of simulated paths.
    #[inline]
    pub fn num_paths(&self) -> usize {
        self.num_paths
    }

    /// Number of periods per path (columns minus one).
    #[inline]
    pub fn num_periods(&self) -> usize {
        self.num_periods
    }

    /// Number of columns per path.
    #[inline]
    pub fn num_columns(&self) -> usize {
        self.num_periods + 1
    }

    /// Master seed the set was simulated from.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Prices along one path, including the initial price.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_paths()`.
    #[inline]
    pub fn path(&self, index: usize) -> &[f64] {
        let width = self.num_columns();
        &self.prices[index * width..(index + 1) * width]
    }

    /// Iterator over all paths in order.
    pub fn paths(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.prices.chunks_exact(self.num_columns())
    }

    /// Price on `path` at grid point `step`.
    #[inline]
    pub fn price(&self, path: usize, step: usize) -> f64 {
        self.prices[path * self.num_columns() + step]
    }

    /// Final price of each path.
    pub fn terminal_prices(&self) -> Vec<f64> {
        self.paths().map(|p| p[p.len() - 1]).collect()
    }

    /// Raw row-major buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.prices
    }
}

/// Simulates `num_paths` GBM price paths.
///
/// Paths are split into partitions of `config.chunk_size()` paths. Each
/// partition draws from its own stream seeded from the master seed, so the
/// result is identical for a given seed regardless of thread scheduling.
/// Without a configured seed, a master seed is drawn from entropy and
/// recorded on the returned set.
///
/// All inputs are validated before any buffer is allocated.
///
/// # Errors
///
/// `ValidationError` naming the first invalid input.
///
/// # Examples
///
/// ```rust
/// use trs_pricing::mc::{simulate_price_paths, GbmParams, SimulationConfig};
///
/// let params = GbmParams {
///     initial_price: 100.0,
///     drift: 0.0,
///     volatility: 0.2,
///     tenor: 1.0,
///     payment_frequency: 4,
/// };
/// let config = SimulationConfig::builder().seed(42).build().unwrap();
/// let set = simulate_price_paths(&params, 10, &config).unwrap();
///
/// assert_eq!(set.num_paths(), 10);
/// assert_eq!(set.num_columns(), 5);
/// assert!(set.paths().all(|p| p[0] == 100.0));
/// ```
pub fn simulate_price_paths(
    params: &GbmParams,
    num_paths: usize,
    config: &SimulationConfig,
) -> Result<PriceScenarioSet, ValidationError> {
    params.validate()?;
    ensure_positive_count("num_simulations", num_paths)?;
    let (num_periods, num_cells) = grid_size(params.tenor, params.payment_frequency, num_paths)?;
    config.validate()?;

    let seed = match config.seed() {
        Some(seed) => seed,
        None => TrsRng::from_entropy().seed(),
    };

    let width = num_periods + 1;
    let chunk_size = config.chunk_size();
    let num_chunks = num_paths.div_ceil(chunk_size);
    let stream_seeds = derive_stream_seeds(seed, num_chunks);

    debug!(
        num_paths,
        num_periods,
        seed,
        num_chunks,
        drift = params.drift,
        "simulating price paths"
    );

    let dt = 1.0 / params.payment_frequency as f64;
    let drift_dt = (params.drift - 0.5 * params.volatility * params.volatility) * dt;
    let vol_sqrt_dt = params.volatility * dt.sqrt();

    let mut prices = vec![0.0; num_cells];
    prices
        .par_chunks_mut(chunk_size * width)
        .zip(stream_seeds.par_iter())
        .for_each(|(block, &stream_seed)| {
            let mut rng = TrsRng::from_seed(stream_seed);
            let mut shocks = vec![0.0; num_periods];
            for path in block.chunks_exact_mut(width) {
                rng.fill_normal(&mut shocks);
                path[0] = params.initial_price;
                for (step, z) in shocks.iter().enumerate() {
                    path[step + 1] = path[step] * (drift_dt + vol_sqrt_dt * z).exp();
                }
            }
        });

    Ok(PriceScenarioSet {
        prices,
        num_paths,
        num_periods,
        seed,
    })
}
