//! Simulation configuration.

use trs_core::ValidationError;

/// Default number of paths per RNG stream partition.
pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// Drift convention for the reference-asset price process.
///
/// The cash-flow and valuation stages are independent of the choice; only
/// the simulated distribution of prices changes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Drift {
    /// Zero drift.
    Zero,
    /// Benchmark rate as the risk-neutral drift.
    #[default]
    Benchmark,
    /// Fixed annual drift.
    Fixed(f64),
}

impl Drift {
    /// Annual drift for the given benchmark rate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trs_pricing::mc::Drift;
    ///
    /// assert_eq!(Drift::Zero.rate(0.05), 0.0);
    /// assert_eq!(Drift::Benchmark.rate(0.05), 0.05);
    /// assert_eq!(Drift::Fixed(0.08).rate(0.05), 0.08);
    /// ```
    #[inline]
    pub fn rate(&self, benchmark_rate: f64) -> f64 {
        match self {
            Drift::Zero => 0.0,
            Drift::Benchmark => benchmark_rate,
            Drift::Fixed(mu) => *mu,
        }
    }
}

/// Monte Carlo configuration shared by every run of a pricer.
///
/// Path count comes from the trade terms; this holds what the terms do not
/// say: the seed, the drift convention and the RNG partitioning.
///
/// # Examples
///
/// ```rust
/// use trs_pricing::mc::{Drift, SimulationConfig};
///
/// let config = SimulationConfig::builder()
///     .seed(42)
///     .drift(Drift::Zero)
///     .chunk_size(128)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.seed(), Some(42));
/// assert_eq!(config.chunk_size(), 128);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    seed: Option<u64>,
    drift: Drift,
    chunk_size: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            drift: Drift::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl SimulationConfig {
    /// Creates a configuration builder.
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Seed, if the run is to be reproducible.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Drift convention.
    #[inline]
    pub fn drift(&self) -> Drift {
        self.drift
    }

    /// Paths per RNG stream partition.
    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.chunk_size == 0 {
            return Err(ValidationError::NonPositive {
                field: "chunk_size",
                value: 0.0,
            });
        }
        if let Drift::Fixed(mu) = self.drift {
            if !mu.is_finite() {
                return Err(ValidationError::NonFinite { field: "drift" });
            }
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    seed: Option<u64>,
    drift: Option<Drift>,
    chunk_size: Option<usize>,
}

impl SimulationConfigBuilder {
    /// Sets the seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets or clears the seed.
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the drift convention.
    pub fn drift(mut self, drift: Drift) -> Self {
        self.drift = Some(drift);
        self
    }

    /// Sets the RNG partition size.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<SimulationConfig, ValidationError> {
        let config = SimulationConfig {
            seed: self.seed,
            drift: self.drift.unwrap_or_default(),
            chunk_size: self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
        };
        config.validate()?;
        Ok(config)
    }
}
