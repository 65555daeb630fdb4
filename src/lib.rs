//! Generational genetic-algorithm engine.
//!
//! Evolves a fixed-size population of fixed-length byte chromosomes toward
//! the minimum of a caller-supplied aptitude:
//!
//! - **Operators**: single-point crossover at bit granularity, bit-flip
//!   mutation of a fraction of the population, optional segment inversion
//!   and exchange.
//! - **Selection**: tournament selection with a tournament size given as a
//!   fraction of the population.
//! - **Adaptive elitism**: parents and offspring are merged into the best
//!   `N` while aptitudes are still diverse, and left alone once one value
//!   dominates.
//!
//! Runs are reproducible from a single seed, with or without the rayon
//! pool (`parallel` feature, on by default).
//!
//! # Architecture
//!
//! This crate sits at Layer 2 (Algorithms) in the U-Engine ecosystem. It
//! contains no domain concepts: what a chromosome encodes is defined by the
//! [`ga::Problem`] implementation of the consumer.

pub mod error;
pub mod ga;
pub mod random;

pub use error::{ConfigError, GaError, Result};
