//! Chromosome model.
//!
//! A chromosome is a fixed-length run of byte alleles in `[1, max_allele]`
//! plus the cached result of its last evaluation. Zero is never a valid
//! allele; operators that can produce it call [`sanitize_zeros`].

use super::types::Problem;
use rand::seq::index;
use rand::Rng;
use std::cmp::Ordering;

/// A candidate solution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chromosome {
    alleles: Vec<u8>,
    aptitude: f64,
    points: Vec<f64>,
}

impl Chromosome {
    /// Wraps alleles into an unevaluated chromosome.
    ///
    /// Zero alleles are replaced by 1.
    pub fn new(mut alleles: Vec<u8>) -> Self {
        sanitize_zeros(&mut alleles);
        Self {
            alleles,
            aptitude: f64::INFINITY,
            points: Vec::new(),
        }
    }

    /// Draws `length` pairwise-distinct alleles uniformly from `[1, max_allele]`.
    ///
    /// The caller guarantees `length <= max_allele`; configurations are
    /// checked for this in [`GenerationConfig::validate`](super::GenerationConfig::validate).
    ///
    /// # Panics
    /// Panics if `length > max_allele`.
    pub fn random<R: Rng>(length: usize, max_allele: u8, rng: &mut R) -> Self {
        let alleles = index::sample(rng, max_allele as usize, length)
            .into_iter()
            .map(|i| (i + 1) as u8)
            .collect();
        Self {
            alleles,
            aptitude: f64::INFINITY,
            points: Vec::new(),
        }
    }

    pub fn alleles(&self) -> &[u8] {
        &self.alleles
    }

    pub(crate) fn alleles_mut(&mut self) -> &mut [u8] {
        &mut self.alleles
    }

    /// Aptitude of the last evaluation; `f64::INFINITY` before the first one.
    pub fn aptitude(&self) -> f64 {
        self.aptitude
    }

    /// Points produced by the last evaluation.
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }

    /// Decodes, scores, and caches the result.
    pub fn evaluate<P: Problem + ?Sized>(&mut self, problem: &P) {
        let genes = decode_alleles(&self.alleles);
        self.points = problem.points(&genes);
        self.aptitude = problem.aptitude(&self.points);
    }

    #[cfg(test)]
    pub(crate) fn set_aptitude(&mut self, aptitude: f64) {
        self.aptitude = aptitude;
    }

    /// Drops cached evaluation data after the alleles changed.
    pub(crate) fn invalidate(&mut self) {
        self.aptitude = f64::INFINITY;
        self.points.clear();
    }
}

/// Ascending aptitude order in which NaN ranks behind every number.
pub(crate) fn compare_aptitude(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

/// Gene value of one allele: `max(1, allele / 3)`.
pub fn decode_point(allele: u8) -> f64 {
    f64::from((allele / 3).max(1))
}

/// Applies [`decode_point`] to every allele.
pub fn decode_alleles(alleles: &[u8]) -> Vec<f64> {
    alleles.iter().map(|&a| decode_point(a)).collect()
}

/// Replaces every zero allele with 1.
pub fn sanitize_zeros(alleles: &mut [u8]) {
    for a in alleles.iter_mut().filter(|a| **a == 0) {
        *a = 1;
    }
}
