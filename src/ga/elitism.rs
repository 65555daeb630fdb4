//! Adaptive elitism.
//!
//! After each step the engine may replace the offspring with the best `N`
//! individuals of parents and offspring together. Whether it does so is
//! decided from how concentrated the aptitudes of both populations are:
//! while the run still looks unsettled the best are preserved, once one
//! aptitude value dominates the merge is skipped.

use super::chromosome::{compare_aptitude, Chromosome};
use crate::error::{GaError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Share of the union below which the most frequent aptitude counts as
/// "not dominant".
pub const DOMINANCE_THRESHOLD: f64 = 0.2;

/// Occurrences of the minimum aptitude below which it counts as
/// under-represented.
pub const MIN_BEST_COUNT: usize = 3;

/// Diversity statistics of the union of two populations and the decision
/// derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElitismAssessment {
    /// Lowest aptitude in the union.
    pub best_aptitude: f64,

    /// Occurrences of `best_aptitude` in the union.
    pub best_count: usize,

    /// Occurrences of the most frequent aptitude value.
    pub max_frequency: usize,

    /// Size of the union (`2N`).
    pub union_size: usize,

    /// Whether the merge should be performed.
    pub required: bool,
}

impl ElitismAssessment {
    /// `max_frequency / union_size`.
    pub fn dominance(&self) -> f64 {
        if self.union_size == 0 {
            0.0
        } else {
            self.max_frequency as f64 / self.union_size as f64
        }
    }
}

/// Exact-value key for counting aptitudes; `-0.0` and `0.0` count together.
fn aptitude_key(aptitude: f64) -> u64 {
    if aptitude == 0.0 {
        0.0f64.to_bits()
    } else {
        aptitude.to_bits()
    }
}

/// Decides whether the best of `old` and `new` should be merged.
///
/// Elitism is required when the most frequent aptitude covers less than
/// [`DOMINANCE_THRESHOLD`] of the union, or the minimum aptitude occurs
/// fewer than [`MIN_BEST_COUNT`] times.
///
/// Pure: neither population is modified and no state is recorded.
///
/// # Errors
/// [`GaError::EmptyPopulation`] if both populations are empty.
pub fn assess(old: &[Chromosome], new: &[Chromosome]) -> Result<ElitismAssessment> {
    let union_size = old.len() + new.len();
    if union_size == 0 {
        return Err(GaError::EmptyPopulation);
    }

    let mut best_aptitude = f64::INFINITY;
    let mut frequencies: HashMap<u64, usize> = HashMap::with_capacity(union_size);
    for c in old.iter().chain(new) {
        if c.aptitude() < best_aptitude {
            best_aptitude = c.aptitude();
        }
        *frequencies.entry(aptitude_key(c.aptitude())).or_insert(0) += 1;
    }

    let max_frequency = frequencies.values().copied().max().unwrap_or(0);
    let best_count = frequencies
        .get(&aptitude_key(best_aptitude))
        .copied()
        .unwrap_or(0);
    let dominance = max_frequency as f64 / union_size as f64;

    Ok(ElitismAssessment {
        best_aptitude,
        best_count,
        max_frequency,
        union_size,
        required: dominance < DOMINANCE_THRESHOLD || best_count < MIN_BEST_COUNT,
    })
}

fn is_sorted_by_aptitude(population: &[Chromosome]) -> bool {
    population
        .windows(2)
        .all(|w| compare_aptitude(w[0].aptitude(), w[1].aptitude()) != Ordering::Greater)
}

/// Merges two ascending populations into the `N` best individuals.
///
/// Two-pointer merge: at each step the head with the lower aptitude is
/// taken, ties go to `old`. The `i`-th merged individual lands in a
/// uniformly random slot not yet filled, so the output is not sorted.
///
/// # Errors
/// - [`GaError::PopulationSizeMismatch`] if the sizes differ
/// - [`GaError::UnsortedPopulation`] if either input is not ascending
///
/// # Complexity
/// O(N)
pub fn elitist_merge<R: Rng>(
    old: &[Chromosome],
    new: &[Chromosome],
    rng: &mut R,
) -> Result<Vec<Chromosome>> {
    if old.len() != new.len() {
        return Err(GaError::PopulationSizeMismatch {
            left: old.len(),
            right: new.len(),
        });
    }
    if !is_sorted_by_aptitude(old) || !is_sorted_by_aptitude(new) {
        return Err(GaError::UnsortedPopulation);
    }

    let n = old.len();
    let mut slots: Vec<usize> = (0..n).collect();
    slots.shuffle(rng);

    let mut merged: Vec<Option<Chromosome>> = vec![None; n];
    let (mut i, mut j) = (0, 0);
    for &slot in &slots {
        // i + j < n, so at least one head is always available
        let take_old = j >= n
            || (i < n && compare_aptitude(old[i].aptitude(), new[j].aptitude()) != Ordering::Greater);
        let chosen = if take_old {
            i += 1;
            &old[i - 1]
        } else {
            j += 1;
            &new[j - 1]
        };
        merged[slot] = Some(chosen.clone());
    }

    Ok(merged.into_iter().flatten().collect())
}
