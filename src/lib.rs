//! # u-simpler
//!
//! Incremental column summaries, `SIMPLER1` bin merging and
//! differential-evolution data synthesis for tabular examples.
//!
//! ## Modules
//!
//! - [`value`]: cell values (number, symbol, missing)
//! - [`stats`]: descriptive statistics with numerical stability guarantees
//! - [`summary`]: streaming numeric and symbolic summaries (`mid`, `div`)
//! - [`bins`]: bins, the `SIMPLER1` merge rule and column discretizers
//! - [`data`]: examples, header-driven schemas, the CSV loader and `d2h`
//! - [`random`]: seeded generators and distinct-index sampling
//! - [`mutate`]: the three-parent mutation operator
//! - [`synth`]: budgeted synthesis of new examples
//! - [`config`]: TOML configuration
//!
//! ## Design Philosophy
//!
//! - **Numerical stability first**: Welford's algorithm for variance,
//!   Kahan summation for accumulation
//! - **Explicit randomness**: every stochastic call takes a caller-owned
//!   generator, so seeded runs replay exactly
//! - **Property-based testing**: merge and sampling invariants verified via
//!   proptest

pub mod bins;
pub mod config;
pub mod data;
pub mod error;
pub mod mutate;
pub mod random;
pub mod stats;
pub mod summary;
pub mod synth;
pub mod value;

pub use error::{Error, Result};
