//! Tournament selection.
//!
//! A tournament draws `size` indices uniformly **with replacement** and
//! keeps the one with the lowest aptitude. Larger tournaments mean stronger
//! selection pressure.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::chromosome::{compare_aptitude, Chromosome};
use crate::error::{GaError, Result};
use rand::Rng;

/// Returns the index with the lowest aptitude among `sample`.
///
/// Ties keep the earliest sampled index. `None` for an empty sample.
pub fn best_of<I>(population: &[Chromosome], sample: I) -> Option<usize>
where
    I: IntoIterator<Item = usize>,
{
    let mut best: Option<usize> = None;
    for idx in sample {
        match best {
            Some(b) if !compare_aptitude(population[idx].aptitude(), population[b].aptitude()).is_lt() => {}
            _ => best = Some(idx),
        }
    }
    best
}

/// Tournament of `size` draws with replacement.
///
/// # Errors
/// [`GaError::EmptyPopulation`] or [`GaError::EmptyTournament`].
///
/// # Complexity
/// O(size)
pub fn tournament<R: Rng>(population: &[Chromosome], size: usize, rng: &mut R) -> Result<usize> {
    if population.is_empty() {
        return Err(GaError::EmptyPopulation);
    }
    if size == 0 {
        return Err(GaError::EmptyTournament);
    }
    let n = population.len();
    best_of(population, (0..size).map(|_| rng.random_range(0..n))).ok_or(GaError::EmptyTournament)
}

/// Tournament whose draws never land on `excluded`.
///
/// Draws that hit `excluded` are rejected and redrawn, so every one of the
/// `size` entrants is a different individual from `excluded`.
///
/// # Errors
/// [`GaError::NotEnoughCandidates`] when `excluded` is the only individual.
pub fn tournament_excluding<R: Rng>(
    population: &[Chromosome],
    size: usize,
    excluded: usize,
    rng: &mut R,
) -> Result<usize> {
    let n = population.len();
    if n < 2 {
        return Err(GaError::NotEnoughCandidates {
            needed: 2,
            available: n,
        });
    }
    if size == 0 {
        return Err(GaError::EmptyTournament);
    }
    // draw from n-1 slots and shift past the excluded one
    let draws = (0..size).map(|_| {
        let idx = rng.random_range(0..n - 1);
        if idx >= excluded {
            idx + 1
        } else {
            idx
        }
    });
    best_of(population, draws).ok_or(GaError::EmptyTournament)
}

/// Two independent tournaments resolving to distinct parents.
///
/// # Errors
/// Fails when the population has fewer than two individuals or `size` is 0.
pub fn select_parents<R: Rng>(
    population: &[Chromosome],
    size: usize,
    rng: &mut R,
) -> Result<(usize, usize)> {
    let first = tournament(population, size, rng)?;
    let second = tournament_excluding(population, size, first, rng)?;
    Ok((first, second))
}
