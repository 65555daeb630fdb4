//! Error types.
//!
//! Configuration problems are reported as [`ConfigError`] by
//! [`GenerationConfig::validate`](crate::ga::GenerationConfig::validate).
//! Everything the engine can fail on at run time, including a rejected
//! configuration, surfaces as [`GaError`].

/// A configuration value that would make a run invalid or make one of the
/// sampling loops unable to terminate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("population_size must be positive")]
    EmptyPopulation,

    #[error("population_size must be even, got {0}")]
    OddPopulation(usize),

    #[error("chromosome_length must be at least 1")]
    EmptyChromosome,

    #[error("max_allele must be at least 1")]
    ZeroMaxAllele,

    #[error(
        "max_allele ({max_allele}) must be >= chromosome_length ({chromosome_length}) \
         to draw distinct alleles"
    )]
    AlleleBoundTooSmall {
        max_allele: u8,
        chromosome_length: usize,
    },

    #[error("{name} must lie in [0, 1], got {value}")]
    FractionOutOfRange { name: &'static str, value: f64 },

    #[error(
        "tournament size is zero: population_size ({population_size}) * \
         tournament_fraction ({fraction}) < 1"
    )]
    EmptyTournament { population_size: usize, fraction: f64 },

    #[error("mutation_bits ({bits}) exceeds the {total_bits} bits of a chromosome")]
    TooManyMutationBits { bits: usize, total_bits: usize },
}

/// Failure of a construction, advance, or standalone operator call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GaError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot select from an empty population")]
    EmptyPopulation,

    #[error("tournament size must be at least 1")]
    EmptyTournament,

    #[error("need {needed} distinct candidates, population has {available}")]
    NotEnoughCandidates { needed: usize, available: usize },

    #[error("populations differ in size: {left} vs {right}")]
    PopulationSizeMismatch { left: usize, right: usize },

    #[error("population must be sorted ascending by aptitude")]
    UnsortedPopulation,

    #[error("chromosomes differ in length: {left} vs {right}")]
    ChromosomeLengthMismatch { left: usize, right: usize },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GaError>;
