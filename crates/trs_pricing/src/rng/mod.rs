//! Random number generation for path simulation.
//!
//! - [`TrsRng`]: seeded PRNG wrapper with normal-variate batch fills
//! - [`derive_stream_seeds`]: per-partition seeds for parallel simulation

mod prng;

pub use prng::{derive_stream_seeds, TrsRng};
