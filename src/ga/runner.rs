//! Evolutionary loop execution.
//!
//! [`EvolutionRunner`] drives a run for a fixed number of generations:
//! generation 0 → advance → advance → … and keeps the best individual seen
//! along the way. Whether elitism is considered on the next step is state
//! of the loop, not of the generations it produces.

use super::chromosome::{compare_aptitude, Chromosome};
use super::config::GenerationConfig;
use super::generation::Generation;
use super::types::Problem;
use crate::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Result of a run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// The best individual found during the entire run.
    pub best: Chromosome,

    /// Aptitude of `best`.
    pub best_aptitude: f64,

    /// Number of generations advanced past generation 0.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Number of steps that ended in an elitist merge.
    pub elitist_merges: usize,

    /// Best aptitude of each generation, generation 0 first.
    ///
    /// Per-generation values, not the running best: without elitism they
    /// may go up.
    pub aptitude_history: Vec<f64>,
}

/// Executes the evolutionary loop.
///
/// # Usage
///
/// ```
/// use std::sync::Arc;
/// use u_genetic::ga::{EvolutionRunner, FnProblem, GenerationConfig};
///
/// let problem = Arc::new(FnProblem::new(
///     |genes: &[f64]| genes.to_vec(),
///     |points: &[f64]| points.iter().map(|p| (p - 5.0).powi(2)).sum(),
/// ));
/// let config = GenerationConfig::new(40, 4, 60)
///     .with_tournament_fraction(0.1)
///     .with_mutation_fraction(0.2)
///     .with_mutation_bits(2)
///     .with_seed(42);
///
/// let result = EvolutionRunner::run(problem, config, 30).unwrap();
/// assert_eq!(result.generations, 30);
/// assert_eq!(result.aptitude_history.len(), 31);
/// ```
pub struct EvolutionRunner;

impl EvolutionRunner {
    /// Runs `generations` steps.
    ///
    /// # Errors
    /// Any construction or step failure, see [`GaError`](crate::GaError).
    pub fn run<P: Problem + ?Sized>(
        problem: Arc<P>,
        config: GenerationConfig,
        generations: usize,
    ) -> Result<EvolutionResult> {
        Self::run_with_cancel(problem, config, generations, None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the run stops
    /// before the next step and returns the best solution found so far.
    pub fn run_with_cancel<P: Problem + ?Sized>(
        problem: Arc<P>,
        config: GenerationConfig,
        generations: usize,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<EvolutionResult> {
        let elitism_enabled = config.elitism;
        let mut generation = Generation::new(Arc::clone(&problem), config)?;

        info!(generations, elitism_enabled, "evolution started");

        let mut best = generation.best().clone();
        let mut aptitude_history = Vec::with_capacity(generations + 1);
        aptitude_history.push(best.aptitude());
        problem.on_generation(0, generation.best());

        let mut elitist_merges = 0usize;
        let mut cancelled = false;

        for _ in 0..generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            generation = generation.advance(elitism_enabled)?;
            if generation.is_elitist_merge() {
                elitist_merges += 1;
            }

            let gen_best = generation.best();
            if compare_aptitude(gen_best.aptitude(), best.aptitude()).is_lt() {
                best = gen_best.clone();
            }
            aptitude_history.push(gen_best.aptitude());

            problem.on_generation(generation.index(), gen_best);
        }

        info!(
            generations = generation.index(),
            best_aptitude = best.aptitude(),
            elitist_merges,
            cancelled,
            "evolution finished"
        );

        Ok(EvolutionResult {
            best_aptitude: best.aptitude(),
            best,
            generations: generation.index(),
            cancelled,
            elitist_merges,
            aptitude_history,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
