//! The generation container.
//!
//! A [`Generation`] is one population plus the run configuration it was
//! bred under. It is never modified after construction: [`Generation::next`]
//! breeds a brand-new generation and leaves the receiver untouched.
//!
//! One step runs: selection + crossover → mutation → optional
//! diversification → evaluation → optional elitist merge.
//!
//! Per-individual work (random construction, breeding a slot pair,
//! diversification, evaluation) fans out over the rayon pool when
//! [`GenerationConfig::parallel`] is set. Each task owns its output slots and
//! its own generator derived from the generation's seed, so parallel and
//! sequential runs produce identical populations.

use super::chromosome::{compare_aptitude, Chromosome};
use super::config::{Diversification, GenerationConfig, Reproduction};
use super::elitism::{self, ElitismAssessment};
use super::operators::{crossover, exchange_segments, invert_segment, mutate_bits};
use super::selection::{select_parents, tournament};
use super::types::Problem;
use crate::error::Result;
use crate::random::{create_rng, task_rng};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, info, instrument, trace};

/// One evaluated population of a run.
///
/// # Usage
///
/// ```
/// use std::sync::Arc;
/// use u_genetic::ga::{FnProblem, Generation, GenerationConfig};
///
/// let problem = Arc::new(FnProblem::new(
///     |genes: &[f64]| genes.to_vec(),
///     |points: &[f64]| points.iter().map(|p| (p - 4.0).abs()).sum(),
/// ));
/// let config = GenerationConfig::new(20, 3, 30)
///     .with_tournament_fraction(0.2)
///     .with_mutation_fraction(0.1)
///     .with_mutation_bits(1)
///     .with_seed(7);
///
/// let mut generation = Generation::new(problem, config).unwrap();
/// for _ in 0..10 {
///     generation = generation.next().unwrap();
/// }
/// assert_eq!(generation.index(), 10);
/// println!("best: {:?}", generation.best().alleles());
/// ```
pub struct Generation<P: Problem + ?Sized> {
    population: Vec<Chromosome>,
    config: GenerationConfig,
    problem: Arc<P>,
    rng: StdRng,
    index: usize,
    elitism: Option<ElitismAssessment>,
}

impl<P: Problem + ?Sized> Clone for Generation<P> {
    fn clone(&self) -> Self {
        Self {
            population: self.population.clone(),
            config: self.config.clone(),
            problem: Arc::clone(&self.problem),
            rng: self.rng.clone(),
            index: self.index,
            elitism: self.elitism,
        }
    }
}

impl<P: Problem + ?Sized> Generation<P> {
    /// Builds generation 0: validates the configuration, draws `N` random
    /// chromosomes of distinct alleles, evaluates them and sorts the
    /// population ascending by aptitude.
    ///
    /// # Errors
    /// [`GaError::Config`](crate::GaError::Config) if the configuration is
    /// invalid.
    #[instrument(
        level = "debug",
        skip_all,
        fields(
            population_size = config.population_size,
            chromosome_length = config.chromosome_length,
            max_allele = config.max_allele,
        )
    )]
    pub fn new(problem: Arc<P>, config: GenerationConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = create_rng(seed);

        let base: u64 = rng.random();
        let (length, max_allele) = (config.chromosome_length, config.max_allele);
        let mut population = fill(config.population_size, config.parallel, |i| {
            Chromosome::random(length, max_allele, &mut task_rng(base, i as u64))
        });

        evaluate_population(problem.as_ref(), &mut population, config.parallel);
        sort_by_aptitude(&mut population);

        info!(
            seed,
            best_aptitude = population[0].aptitude(),
            "initial generation created"
        );

        let generation = Self {
            population,
            config,
            problem,
            rng,
            index: 0,
            elitism: None,
        };
        generation.trace_snapshot();
        Ok(generation)
    }

    /// Breeds the next generation, considering elitism when
    /// [`GenerationConfig::elitism`] is set.
    pub fn next(&self) -> Result<Self> {
        self.advance(self.config.elitism)
    }

    /// Breeds the next generation with elitism explicitly on or off.
    ///
    /// With `elitism_enabled`, the diversity of parents and offspring is
    /// [assessed](elitism::assess) and, when required, the offspring are
    /// replaced by the best `N` of both populations. The assessment is
    /// available on the returned generation via [`elitism`](Self::elitism).
    pub fn advance(&self, elitism_enabled: bool) -> Result<Self> {
        let config = &self.config;
        let mut rng = self.rng.clone();

        let mut offspring = self.breed(&mut rng)?;
        mutate_population(&mut offspring, config, &mut rng);
        if let Some(diversification) = &config.diversification {
            diversify_population(&mut offspring, diversification, config.parallel, &mut rng);
        }
        evaluate_population(self.problem.as_ref(), &mut offspring, config.parallel);

        let assessment = if elitism_enabled {
            let assessment = elitism::assess(&self.population, &offspring)?;
            if assessment.required {
                let mut parents = self.population.clone();
                sort_by_aptitude(&mut parents);
                sort_by_aptitude(&mut offspring);
                offspring = elitism::elitist_merge(&parents, &offspring, &mut rng)?;
            }
            Some(assessment)
        } else {
            None
        };

        let next = Self {
            population: offspring,
            config: config.clone(),
            problem: Arc::clone(&self.problem),
            rng,
            index: self.index + 1,
            elitism: assessment,
        };

        debug!(
            generation = next.index,
            best_aptitude = next.best_aptitude(),
            elitism_required = assessment.map(|a| a.required),
            "generation advanced"
        );
        next.trace_snapshot();
        Ok(next)
    }

    /// Fills a new population of size `N` from the current one.
    fn breed(&self, rng: &mut StdRng) -> Result<Vec<Chromosome>> {
        let config = &self.config;
        let current = self.population.as_slice();
        let size = config.tournament_size();
        let base: u64 = rng.random();

        match config.reproduction {
            Reproduction::Crossover => {
                let pairs = fill(config.population_size / 2, config.parallel, |pair| -> Result<_> {
                    let mut task = task_rng(base, pair as u64);
                    let (a, b) = select_parents(current, size, &mut task)?;
                    let (c1, c2) = crossover(current[a].alleles(), current[b].alleles(), &mut task)?;
                    Ok((Chromosome::new(c1), Chromosome::new(c2)))
                });

                let mut offspring = Vec::with_capacity(config.population_size);
                for pair in pairs {
                    let (c1, c2) = pair?;
                    offspring.push(c1);
                    offspring.push(c2);
                }
                Ok(offspring)
            }
            Reproduction::Asexual => fill(config.population_size, config.parallel, |slot| -> Result<_> {
                let mut task = task_rng(base, slot as u64);
                let winner = tournament(current, size, &mut task)?;
                Ok(Chromosome::new(current[winner].alleles().to_vec()))
            })
            .into_iter()
            .collect(),
        }
    }

    fn trace_snapshot(&self) {
        trace!(
            generation = self.index,
            population = ?self
                .population
                .iter()
                .map(|c| (c.alleles(), c.aptitude()))
                .collect::<Vec<_>>(),
            "population snapshot"
        );
    }

    /// Position of this generation in its run; generation 0 is the random one.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn population(&self) -> &[Chromosome] {
        &self.population
    }

    /// Consumes the generation and returns its population.
    pub fn into_population(self) -> Vec<Chromosome> {
        self.population
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn problem(&self) -> &Arc<P> {
        &self.problem
    }

    /// Elitism assessment made while breeding this generation.
    ///
    /// `None` for generation 0 and for steps taken with elitism off.
    pub fn elitism(&self) -> Option<ElitismAssessment> {
        self.elitism
    }

    /// Whether this generation is the product of an elitist merge.
    pub fn is_elitist_merge(&self) -> bool {
        self.elitism.is_some_and(|a| a.required)
    }

    /// The individual with the lowest aptitude. Ties keep the first slot.
    pub fn best(&self) -> &Chromosome {
        self.population
            .iter()
            .reduce(|best, c| {
                if compare_aptitude(c.aptitude(), best.aptitude()).is_lt() {
                    c
                } else {
                    best
                }
            })
            .expect("validated population is never empty")
    }

    pub fn best_aptitude(&self) -> f64 {
        self.best().aptitude()
    }

    /// The population ordered ascending by aptitude.
    pub fn ranked(&self) -> Vec<&Chromosome> {
        let mut ranked: Vec<&Chromosome> = self.population.iter().collect();
        ranked.sort_by(|a, b| compare_aptitude(a.aptitude(), b.aptitude()));
        ranked
    }
}

// ============================================================================
// Population-wide steps
// ============================================================================

/// Flips `mutation_bits` bits in each of `⌊N·m⌋` distinct individuals.
fn mutate_population<R: Rng>(population: &mut [Chromosome], config: &GenerationConfig, rng: &mut R) {
    let count = config.mutation_count().min(population.len());
    for idx in index::sample(rng, population.len(), count) {
        let chromosome = &mut population[idx];
        mutate_bits(chromosome.alleles_mut(), config.mutation_bits, rng);
        chromosome.invalidate();
    }
}

/// Applies one inversion or exchange to every individual.
///
/// The operator choices are drawn in slot order before the fan-out, so the
/// inversion cap does not depend on scheduling.
fn diversify_population<R: Rng>(
    population: &mut [Chromosome],
    diversification: &Diversification,
    parallel: bool,
    rng: &mut R,
) {
    let mut inversions = 0usize;
    let invert: Vec<bool> = (0..population.len())
        .map(|_| {
            let pick = rng.random_bool(diversification.inversion_ratio)
                && diversification
                    .max_inversions
                    .map_or(true, |cap| inversions < cap);
            if pick {
                inversions += 1;
            }
            pick
        })
        .collect();

    let base: u64 = rng.random();
    for_each_indexed(population, parallel, |i, chromosome| {
        let mut task = task_rng(base, i as u64);
        if invert[i] {
            invert_segment(chromosome.alleles_mut(), &mut task);
        } else {
            exchange_segments(chromosome.alleles_mut(), &mut task);
        }
        chromosome.invalidate();
    });
}

/// Evaluates every individual.
fn evaluate_population<P: Problem + ?Sized>(
    problem: &P,
    population: &mut [Chromosome],
    parallel: bool,
) {
    for_each_indexed(population, parallel, |_, chromosome| chromosome.evaluate(problem));
}

/// Stable ascending sort by aptitude; NaN aptitudes sort last.
fn sort_by_aptitude(population: &mut [Chromosome]) {
    population.sort_by(|a, b| compare_aptitude(a.aptitude(), b.aptitude()));
}

// ============================================================================
// Fan-out helpers
// ============================================================================

/// Builds `count` values, in index order.
#[cfg(feature = "parallel")]
fn fill<T, F>(count: usize, parallel: bool, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Send + Sync,
{
    if parallel {
        (0..count).into_par_iter().map(f).collect()
    } else {
        (0..count).map(f).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn fill<T, F>(count: usize, _parallel: bool, f: F) -> Vec<T>
where
    F: Fn(usize) -> T,
{
    (0..count).map(f).collect()
}

/// Runs `f` on every slot; each call owns exactly one element.
#[cfg(feature = "parallel")]
fn for_each_indexed<F>(population: &mut [Chromosome], parallel: bool, f: F)
where
    F: Fn(usize, &mut Chromosome) + Send + Sync,
{
    if parallel {
        population
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, c)| f(i, c));
    } else {
        for (i, c) in population.iter_mut().enumerate() {
            f(i, c);
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn for_each_indexed<F>(population: &mut [Chromosome], _parallel: bool, f: F)
where
    F: Fn(usize, &mut Chromosome),
{
    for (i, c) in population.iter_mut().enumerate() {
        f(i, c);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, GaError};
    use crate::ga::FnProblem;
    use std::collections::HashSet;

    /// Distance of the decoded genes to a fixed target.
    struct TargetProblem {
        target: Vec<f64>,
    }

    impl Problem for TargetProblem {
        fn aptitude(&self, points: &[f64]) -> f64 {
            points
                .iter()
                .zip(&self.target)
                .map(|(p, t)| (p - t).abs())
                .sum()
        }
    }

    fn target_problem() -> Arc<TargetProblem> {
        Arc::new(TargetProblem {
            target: vec![3.0, 7.0, 11.0, 5.0],
        })
    }

    fn scenario_config() -> GenerationConfig {
        GenerationConfig::new(100, 4, 50)
            .with_tournament_fraction(0.2)
            .with_mutation_fraction(0.1)
            .with_mutation_bits(2)
            .with_seed(42)
    }

    fn snapshot<P: Problem + ?Sized>(g: &Generation<P>) -> Vec<(Vec<u8>, u64)> {
        g.population()
            .iter()
            .map(|c| (c.alleles().to_vec(), c.aptitude().to_bits()))
            .collect()
    }

    #[test]
    fn test_initial_generation_invariants() {
        let g = Generation::new(target_problem(), scenario_config()).unwrap();
        assert_eq!(g.index(), 0);
        assert!(g.elitism().is_none());
        assert_eq!(g.population().len(), 100);

        for c in g.population() {
            assert_eq!(c.len(), 4);
            assert!(c.alleles().iter().all(|&a| (1..=50).contains(&a)));
            let distinct: HashSet<u8> = c.alleles().iter().copied().collect();
            assert_eq!(distinct.len(), 4);
            assert_eq!(c.points().len(), 4);
            assert!(c.aptitude().is_finite());
        }

        // sorted ascending
        for w in g.population().windows(2) {
            assert!(w[0].aptitude() <= w[1].aptitude());
        }
        assert_eq!(g.best_aptitude(), g.population()[0].aptitude());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let odd = scenario_config().with_population_size(99);
        assert!(matches!(
            Generation::new(target_problem(), odd),
            Err(GaError::Config(ConfigError::OddPopulation(99)))
        ));

        let bound = GenerationConfig::new(10, 6, 4).with_tournament_fraction(0.5);
        assert!(matches!(
            Generation::new(target_problem(), bound),
            Err(GaError::Config(ConfigError::AlleleBoundTooSmall { .. }))
        ));
    }

    #[test]
    fn test_next_leaves_receiver_untouched() {
        let g0 = Generation::new(target_problem(), scenario_config()).unwrap();
        let before = snapshot(&g0);
        let g1 = g0.next().unwrap();
        assert_eq!(snapshot(&g0), before);
        assert_eq!(g1.index(), 1);
        assert_eq!(g1.population().len(), 100);

        // the same receiver always yields the same successor
        let again = g0.next().unwrap();
        assert_eq!(snapshot(&again), snapshot(&g1));
    }

    #[test]
    fn test_offspring_are_zero_free_and_evaluated() {
        let mut g = Generation::new(target_problem(), scenario_config()).unwrap();
        for _ in 0..20 {
            g = g.next().unwrap();
            for c in g.population() {
                assert_eq!(c.len(), 4);
                assert!(c.alleles().iter().all(|&a| a != 0));
                assert!(c.aptitude().is_finite());
            }
        }
    }

    #[test]
    fn test_elitism_scenario_never_worse() {
        let g0 = Generation::new(target_problem(), scenario_config()).unwrap();
        let initial_best = g0.best_aptitude();

        let mut g = g0;
        for _ in 0..50 {
            g = g.next().unwrap();
            assert!(g.elitism().is_some());
        }

        assert_eq!(g.index(), 50);
        assert!(
            g.best_aptitude() <= initial_best,
            "best got worse: {} > {}",
            g.best_aptitude(),
            initial_best
        );
    }

    #[test]
    fn test_elitist_merge_keeps_best_of_both() {
        let mut g = Generation::new(target_problem(), scenario_config()).unwrap();
        for _ in 0..30 {
            let next = g.next().unwrap();
            if next.is_elitist_merge() {
                assert!(next.best_aptitude() <= g.best_aptitude());
            }
            g = next;
        }
    }

    #[test]
    fn test_deterministic_without_elitism() {
        let config = scenario_config().with_elitism(false);
        let mut a = Generation::new(target_problem(), config.clone()).unwrap();
        let mut b = Generation::new(target_problem(), config).unwrap();
        assert_eq!(snapshot(&a), snapshot(&b));

        for _ in 0..25 {
            a = a.next().unwrap();
            b = b.next().unwrap();
            assert!(a.elitism().is_none());
            assert_eq!(snapshot(&a), snapshot(&b));
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = scenario_config().with_diversification(Diversification::default());
        let mut par = Generation::new(target_problem(), config.clone().with_parallel(true)).unwrap();
        let mut seq = Generation::new(target_problem(), config.with_parallel(false)).unwrap();
        for _ in 0..10 {
            par = par.next().unwrap();
            seq = seq.next().unwrap();
            assert_eq!(snapshot(&par), snapshot(&seq));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = Generation::new(target_problem(), scenario_config().with_seed(1)).unwrap();
        let b = Generation::new(target_problem(), scenario_config().with_seed(2)).unwrap();
        assert_ne!(snapshot(&a), snapshot(&b));
    }

    #[test]
    fn test_asexual_children_copy_parents() {
        let config = scenario_config()
            .with_reproduction(Reproduction::Asexual)
            .with_mutation_fraction(0.0)
            .with_elitism(false);
        let g0 = Generation::new(target_problem(), config).unwrap();
        let parents: HashSet<Vec<u8>> =
            g0.population().iter().map(|c| c.alleles().to_vec()).collect();

        let g1 = g0.next().unwrap();
        for c in g1.population() {
            assert!(parents.contains(c.alleles()), "{:?} has no parent", c.alleles());
        }
    }

    #[test]
    fn test_diversification_permutes_alleles() {
        let config = scenario_config()
            .with_reproduction(Reproduction::Asexual)
            .with_mutation_fraction(0.0)
            .with_elitism(false)
            .with_diversification(Diversification {
                inversion_ratio: 0.5,
                max_inversions: None,
            });
        let g0 = Generation::new(target_problem(), config).unwrap();
        let sorted = |a: &[u8]| {
            let mut v = a.to_vec();
            v.sort_unstable();
            v
        };
        let parents: HashSet<Vec<u8>> =
            g0.population().iter().map(|c| sorted(c.alleles())).collect();

        let g1 = g0.next().unwrap();
        for c in g1.population() {
            assert!(parents.contains(&sorted(c.alleles())));
        }
    }

    #[test]
    fn test_ranked_is_sorted() {
        let g = Generation::new(target_problem(), scenario_config())
            .unwrap()
            .next()
            .unwrap();
        let ranked = g.ranked();
        assert_eq!(ranked.len(), 100);
        for w in ranked.windows(2) {
            assert!(w[0].aptitude() <= w[1].aptitude());
        }
        assert_eq!(ranked[0].aptitude(), g.best_aptitude());
    }

    #[test]
    fn test_nan_aptitudes_rank_last() {
        // half the search space scores NaN
        let problem = Arc::new(FnProblem::new(
            |genes: &[f64]| genes.to_vec(),
            |points: &[f64]| {
                if points[0] > 8.0 {
                    f64::NAN
                } else {
                    points.iter().map(|p| (p - 4.0).abs()).sum()
                }
            },
        ));
        let mut g = Generation::new(problem, scenario_config()).unwrap();
        assert!(g.population()[99].aptitude().is_nan());

        for _ in 0..10 {
            assert!(g.best_aptitude().is_finite());
            let ranked = g.ranked();
            let first_nan = ranked
                .iter()
                .position(|c| c.aptitude().is_nan())
                .unwrap_or(ranked.len());
            assert!(ranked[first_nan..].iter().all(|c| c.aptitude().is_nan()));
            g = g.next().unwrap();
        }
    }

    #[test]
    fn test_points_from_fn_problem() {
        // points depend on genes through a caller-supplied curve
        let problem = Arc::new(FnProblem::new(
            |genes: &[f64]| (0..5).map(|x| genes[0] * f64::from(x) + genes[1]).collect(),
            |points: &[f64]| points.iter().map(|p| p.abs()).sum(),
        ));
        let config = GenerationConfig::new(10, 2, 20)
            .with_tournament_fraction(0.3)
            .with_mutation_bits(1)
            .with_seed(5);
        let g = Generation::new(problem, config).unwrap();
        for c in g.population() {
            assert_eq!(c.points().len(), 5);
        }
    }
}
