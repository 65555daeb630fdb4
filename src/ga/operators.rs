//! Genetic operators on byte alleles.
//!
//! Every operator works on `&[u8]` allele slices and leaves no zero allele
//! behind. A chromosome of `L` alleles is viewed as a bit string of `8·L`
//! bits, each allele most significant bit first, in allele order.
//!
//! # Crossover
//!
//! - [`crossover`]: single cut anywhere in the bit string, not only on
//!   allele boundaries. Alleles around the cut mix bits of both parents.
//!
//! # Mutation
//!
//! - [`mutate_bits`]: flip `b` distinct bits.
//!
//! # Diversification
//!
//! - [`invert_segment`]: reverse a circular segment — O(L)
//! - [`exchange_segments`]: swap two disjoint equal-length segments — O(L)

use super::chromosome::sanitize_zeros;
use crate::error::{GaError, Result};
use rand::seq::index;
use rand::Rng;

// ============================================================================
// Bit views
// ============================================================================

/// Expands alleles into their bit string, MSB first.
pub fn to_bits(alleles: &[u8]) -> Vec<bool> {
    alleles
        .iter()
        .flat_map(|&a| (0..8).rev().map(move |shift| (a >> shift) & 1 == 1))
        .collect()
}

/// Packs a bit string back into alleles. Trailing bits that do not fill a
/// whole byte are ignored.
pub fn from_bits(bits: &[bool]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|byte| byte.iter().fold(0u8, |acc, &b| (acc << 1) | u8::from(b)))
        .collect()
}

// ============================================================================
// Crossover
// ============================================================================

/// Splices two bit strings at bit `point`.
///
/// Returns `(a[..point] ++ b[point..], b[..point] ++ a[point..])` packed as
/// alleles, without zero sanitization.
///
/// # Panics
/// Panics if the parents differ in length or `point > 8·L`.
pub fn splice_at(a: &[u8], b: &[u8], point: usize) -> (Vec<u8>, Vec<u8>) {
    assert_eq!(a.len(), b.len(), "parents must have equal length");
    assert!(point <= a.len() * 8, "crossover point out of range");

    let byte = point / 8;
    let bit = point % 8;

    let mut child1 = Vec::with_capacity(a.len());
    let mut child2 = Vec::with_capacity(a.len());
    child1.extend_from_slice(&a[..byte]);
    child2.extend_from_slice(&b[..byte]);

    if byte < a.len() {
        let start = if bit == 0 {
            byte
        } else {
            // high `bit` bits from the head parent, the rest from the tail parent
            let head = !(0xFFu8 >> bit);
            child1.push((a[byte] & head) | (b[byte] & !head));
            child2.push((b[byte] & head) | (a[byte] & !head));
            byte + 1
        };
        child1.extend_from_slice(&b[start..]);
        child2.extend_from_slice(&a[start..]);
    }

    (child1, child2)
}

/// Single-point bit-level crossover.
///
/// Draws a cut `x` uniformly from `[1, 8·L − 1]` and returns
/// `(bits(p1)[..x] ++ bits(p2)[x..], bits(p2)[..x] ++ bits(p1)[x..])`.
/// Zero alleles in the children are replaced by 1.
///
/// Cutting inside an allele can produce values present in neither parent.
///
/// # Errors
/// [`GaError::ChromosomeLengthMismatch`] if the parents differ in length.
pub fn crossover<R: Rng>(
    parent1: &[u8],
    parent2: &[u8],
    rng: &mut R,
) -> Result<(Vec<u8>, Vec<u8>)> {
    if parent1.len() != parent2.len() {
        return Err(GaError::ChromosomeLengthMismatch {
            left: parent1.len(),
            right: parent2.len(),
        });
    }
    if parent1.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let total_bits = parent1.len() * 8;
    let point = rng.random_range(1..total_bits);
    let (mut child1, mut child2) = splice_at(parent1, parent2, point);
    sanitize_zeros(&mut child1);
    sanitize_zeros(&mut child2);
    Ok((child1, child2))
}

// ============================================================================
// Mutation
// ============================================================================

/// Flips `bits` distinct, uniformly chosen bits in place.
///
/// Zero alleles produced by the flips are replaced by 1.
///
/// # Panics
/// Panics if `bits > 8 · alleles.len()`.
pub fn mutate_bits<R: Rng>(alleles: &mut [u8], bits: usize, rng: &mut R) {
    let total_bits = alleles.len() * 8;
    for pos in index::sample(rng, total_bits, bits) {
        alleles[pos / 8] ^= 0x80 >> (pos % 8);
    }
    sanitize_zeros(alleles);
}

// ============================================================================
// Diversification
// ============================================================================

/// Reverses a circular segment of 1 to `L − 2` alleles starting at a random
/// offset. The segment wraps past the end.
///
/// No-op for fewer than 3 alleles.
pub fn invert_segment<R: Rng>(alleles: &mut [u8], rng: &mut R) {
    let n = alleles.len();
    if n < 3 {
        return;
    }
    let start = rng.random_range(0..n);
    let span = rng.random_range(0..n - 2);

    let mut i = start;
    let mut j = start + span;
    while i < j {
        alleles.swap(i % n, j % n);
        i += 1;
        j -= 1;
    }
    sanitize_zeros(alleles);
}

/// Swaps two disjoint segments of equal random size `s ∈ [1, ⌊L/2⌋]`.
///
/// No-op for fewer than 2 alleles.
pub fn exchange_segments<R: Rng>(alleles: &mut [u8], rng: &mut R) {
    let n = alleles.len();
    if n < 2 {
        return;
    }
    let size = rng.random_range(1..=n / 2);
    let first = rng.random_range(0..=n - 2 * size);
    let second = rng.random_range(first + size..=n - size);

    let (head, tail) = alleles.split_at_mut(second);
    head[first..first + size].swap_with_slice(&mut tail[..size]);
    sanitize_zeros(alleles);
}

// ============================================================================
// Tests
// ============================================================================
