//! Generational genetic algorithm over byte-allele chromosomes.
//!
//! A population of `N` chromosomes, each `L` alleles in `[1, max_allele]`,
//! evolves toward the lowest aptitude of a caller-supplied [`Problem`].
//! Every step breeds a completely new population; the best individuals of
//! two consecutive generations are merged while the run still looks
//! unsettled (adaptive elitism).
//!
//! # Core Traits
//!
//! - [`Problem`]: decoding of genes into points and scoring of points
//!
//! # Key Types
//!
//! - [`GenerationConfig`]: run parameters, validated up front
//! - [`Generation`]: one evaluated population; [`Generation::next`] breeds the next
//! - [`EvolutionRunner`]: drives a fixed number of steps
//! - [`EvolutionResult`]: best individual and per-generation history
//!
//! # Submodules
//!
//! - [`operators`]: bit-level crossover, bit-flip mutation, segment inversion and exchange
//! - [`selection`]: tournament selection
//! - [`elitism`]: diversity assessment and elitist merge
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - De Jong (2006), *Evolutionary Computation: A Unified Approach*

mod chromosome;
mod config;
pub mod elitism;
mod generation;
pub mod operators;
mod runner;
pub mod selection;
mod types;

pub use chromosome::{decode_alleles, decode_point, sanitize_zeros, Chromosome};
pub use config::{Diversification, GenerationConfig, Reproduction};
pub use elitism::ElitismAssessment;
pub use generation::Generation;
pub use runner::{EvolutionResult, EvolutionRunner};
pub use types::{FnProblem, Problem};
