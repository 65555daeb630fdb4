//! The problem seam.
//!
//! The engine knows how to breed byte chromosomes; what a chromosome *means*
//! is supplied by the caller through [`Problem`]. Evaluation is a two-stage
//! pipeline: decoded genes are turned into a vector of points, and the
//! points are scored into a single aptitude.

use super::chromosome::Chromosome;

/// Defines what the engine is optimizing.
///
/// # Thread Safety
///
/// `Problem` must be `Send + Sync` because the engine may evaluate
/// individuals in parallel using rayon.
///
/// # Implementing
///
/// ```
/// use u_genetic::ga::Problem;
///
/// /// Fit three coefficients to a target.
/// struct Target([f64; 3]);
///
/// impl Problem for Target {
///     fn aptitude(&self, points: &[f64]) -> f64 {
///         points.iter().zip(&self.0).map(|(p, t)| (p - t).abs()).sum()
///     }
/// }
/// ```
pub trait Problem: Send + Sync {
    /// Maps decoded genes to the point vector that is scored.
    ///
    /// `genes` holds one value per allele, see
    /// [`decode_alleles`](super::chromosome::decode_alleles).
    /// The default passes the genes through unchanged.
    fn points(&self, genes: &[f64]) -> Vec<f64> {
        genes.to_vec()
    }

    /// Scores a point vector. Lower is better.
    ///
    /// Must be total and pure; the engine neither retries nor sandboxes it.
    /// A NaN aptitude is tolerated but ranks behind every number.
    fn aptitude(&self, points: &[f64]) -> f64;

    /// Called by [`EvolutionRunner`](super::EvolutionRunner) after each
    /// generation with that generation's best individual.
    ///
    /// Useful for progress reporting. The default is a no-op.
    fn on_generation(&self, _index: usize, _best: &Chromosome) {}
}

/// A [`Problem`] assembled from two closures.
///
/// ```
/// use u_genetic::ga::{FnProblem, Problem};
///
/// let problem = FnProblem::new(
///     |genes: &[f64]| genes.iter().map(|g| g * 2.0).collect(),
///     |points: &[f64]| points.iter().sum(),
/// );
/// assert_eq!(problem.aptitude(&problem.points(&[1.0, 2.0])), 6.0);
/// ```
pub struct FnProblem<PF, AF> {
    points_fn: PF,
    aptitude_fn: AF,
}

impl<PF, AF> FnProblem<PF, AF>
where
    PF: Fn(&[f64]) -> Vec<f64> + Send + Sync,
    AF: Fn(&[f64]) -> f64 + Send + Sync,
{
    pub fn new(points_fn: PF, aptitude_fn: AF) -> Self {
        Self {
            points_fn,
            aptitude_fn,
        }
    }
}

impl<PF, AF> Problem for FnProblem<PF, AF>
where
    PF: Fn(&[f64]) -> Vec<f64> + Send + Sync,
    AF: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn points(&self, genes: &[f64]) -> Vec<f64> {
        (self.points_fn)(genes)
    }

    fn aptitude(&self, points: &[f64]) -> f64 {
        (self.aptitude_fn)(points)
    }
}
