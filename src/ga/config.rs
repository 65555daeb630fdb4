//! Generation configuration.
//!
//! [`GenerationConfig`] holds the immutable parameters shared by every
//! generation of a run.

use crate::error::ConfigError;

/// How a new population is bred from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Reproduction {
    /// Two distinct tournament winners per slot pair, recombined by
    /// bit-level single-point crossover.
    #[default]
    Crossover,

    /// Every slot receives a copy of one tournament winner.
    ///
    /// Selection pressure without recombination; mutation is the only
    /// source of new material.
    Asexual,
}

/// Optional per-individual reshuffle applied after mutation.
///
/// Every individual gets exactly one operator: a segment inversion with
/// probability `inversion_ratio` (until `max_inversions` have been handed
/// out in this generation), a segment exchange otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diversification {
    /// Probability of picking inversion over exchange (0.0–1.0).
    pub inversion_ratio: f64,

    /// Cap on inversions per generation. `None` means unlimited.
    pub max_inversions: Option<usize>,
}

impl Default for Diversification {
    fn default() -> Self {
        Self {
            inversion_ratio: 0.5,
            max_inversions: Some(51),
        }
    }
}

/// Configuration for a generational run.
///
/// # Defaults
///
/// ```
/// use u_genetic::ga::GenerationConfig;
///
/// let config = GenerationConfig::default();
/// assert_eq!(config.population_size, 1000);
/// assert_eq!(config.chromosome_length, 6);
/// assert_eq!(config.tournament_size(), 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_genetic::ga::GenerationConfig;
///
/// let config = GenerationConfig::new(100, 4, 50)
///     .with_tournament_fraction(0.2)
///     .with_mutation_fraction(0.1)
///     .with_mutation_bits(2)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
///
/// Setters store values as given; out-of-range values are reported by
/// [`validate`](Self::validate) instead of being clamped.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationConfig {
    /// Number of individuals `N`. Must be even.
    pub population_size: usize,

    /// Alleles per chromosome `L`.
    pub chromosome_length: usize,

    /// Largest allele value. Must be at least `chromosome_length`.
    pub max_allele: u8,

    /// Tournament size as a fraction of the population (0.0–1.0).
    ///
    /// The tournament samples `⌊N·k⌋` individuals with replacement.
    pub tournament_fraction: f64,

    /// Fraction of individuals mutated per generation (0.0–1.0).
    pub mutation_fraction: f64,

    /// Distinct bits flipped in each mutated individual.
    pub mutation_bits: usize,

    /// Whether elitist merging is considered after each step.
    pub elitism: bool,

    /// Breeding strategy.
    pub reproduction: Reproduction,

    /// Optional reshuffle step after mutation.
    pub diversification: Option<Diversification>,

    /// Whether per-individual work runs on the rayon pool.
    ///
    /// Has no effect on results, only on scheduling. Ignored without the
    /// `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` draws one seed from the OS at construction.
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            population_size: 1000,
            chromosome_length: 6,
            max_allele: 255,
            tournament_fraction: 0.1,
            mutation_fraction: 0.8,
            mutation_bits: 3,
            elitism: true,
            reproduction: Reproduction::default(),
            diversification: None,
            parallel: true,
            seed: None,
        }
    }
}

impl GenerationConfig {
    /// Creates a configuration with the given shape and default rates.
    pub fn new(population_size: usize, chromosome_length: usize, max_allele: u8) -> Self {
        Self {
            population_size,
            chromosome_length,
            max_allele,
            ..Self::default()
        }
    }

    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_chromosome_length(mut self, len: usize) -> Self {
        self.chromosome_length = len;
        self
    }

    pub fn with_max_allele(mut self, max: u8) -> Self {
        self.max_allele = max;
        self
    }

    pub fn with_tournament_fraction(mut self, k: f64) -> Self {
        self.tournament_fraction = k;
        self
    }

    pub fn with_mutation_fraction(mut self, m: f64) -> Self {
        self.mutation_fraction = m;
        self
    }

    pub fn with_mutation_bits(mut self, bits: usize) -> Self {
        self.mutation_bits = bits;
        self
    }

    pub fn with_elitism(mut self, enabled: bool) -> Self {
        self.elitism = enabled;
        self
    }

    pub fn with_reproduction(mut self, reproduction: Reproduction) -> Self {
        self.reproduction = reproduction;
        self
    }

    pub fn with_diversification(mut self, diversification: Diversification) -> Self {
        self.diversification = Some(diversification);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// `⌊N·k⌋`.
    pub fn tournament_size(&self) -> usize {
        floor_share(self.population_size, self.tournament_fraction)
    }

    /// `⌊N·m⌋`.
    pub fn mutation_count(&self) -> usize {
        floor_share(self.population_size, self.mutation_fraction)
    }

    /// Bits in one chromosome (`8·L`).
    pub fn total_bits(&self) -> usize {
        self.chromosome_length * 8
    }

    /// Validates the configuration.
    ///
    /// Rejects every setting that would either break an invariant or leave
    /// a sampling loop without enough candidates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.population_size % 2 != 0 {
            return Err(ConfigError::OddPopulation(self.population_size));
        }
        if self.chromosome_length == 0 {
            return Err(ConfigError::EmptyChromosome);
        }
        if self.max_allele == 0 {
            return Err(ConfigError::ZeroMaxAllele);
        }
        if (self.max_allele as usize) < self.chromosome_length {
            return Err(ConfigError::AlleleBoundTooSmall {
                max_allele: self.max_allele,
                chromosome_length: self.chromosome_length,
            });
        }
        check_fraction("tournament_fraction", self.tournament_fraction)?;
        check_fraction("mutation_fraction", self.mutation_fraction)?;
        if self.tournament_size() == 0 {
            return Err(ConfigError::EmptyTournament {
                population_size: self.population_size,
                fraction: self.tournament_fraction,
            });
        }
        if self.mutation_bits > self.total_bits() {
            return Err(ConfigError::TooManyMutationBits {
                bits: self.mutation_bits,
                total_bits: self.total_bits(),
            });
        }
        if let Some(d) = &self.diversification {
            check_fraction("inversion_ratio", d.inversion_ratio)?;
        }
        Ok(())
    }
}

fn check_fraction(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::FractionOutOfRange { name, value })
    }
}

/// `⌊n·fraction⌋`, tolerant of the rounding error in the product
/// (100 · 0.29 evaluates to 28.999999999999996).
fn floor_share(n: usize, fraction: f64) -> usize {
    (n as f64 * fraction + 1e-9).floor() as usize
}
