//! Monte Carlo path simulation.
//!
//! ```text
//! simulate_price_paths
//! ├── GbmParams         (process parameters, validated)
//! ├── SimulationConfig  (seed, drift convention, partition size)
//! └── TrsRng            (one stream per partition)
//! ```

mod config;
mod paths;

pub use config::{Drift, SimulationConfig, SimulationConfigBuilder, DEFAULT_CHUNK_SIZE};
pub use paths::{simulate_price_paths, GbmParams, PriceScenarioSet};
