//! Criterion benchmarks for the u-genetic engine.
//!
//! Uses a synthetic curve-fitting problem to measure engine overhead
//! (breeding, evaluation fan-out, elitist merge) independent of any domain.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use u_genetic::ga::{operators, EvolutionRunner, Generation, GenerationConfig, Problem};
use u_genetic::random::create_rng;

// ===========================================================================
// Curve fit: sum of absolute errors against a reference polynomial
// ===========================================================================

struct PolyFit {
    reference: Vec<f64>,
}

fn poly(coefficients: &[f64]) -> Vec<f64> {
    (0..200)
        .map(|i| {
            let x = f64::from(i) / 20.0;
            coefficients
                .iter()
                .rev()
                .fold(0.0, |acc, &c| acc * x + c)
        })
        .collect()
}

impl Problem for PolyFit {
    fn points(&self, genes: &[f64]) -> Vec<f64> {
        poly(genes)
    }

    fn aptitude(&self, points: &[f64]) -> f64 {
        points
            .iter()
            .zip(&self.reference)
            .map(|(p, r)| (p - r).abs())
            .sum()
    }
}

fn poly_problem(len: usize) -> Arc<PolyFit> {
    let solution: Vec<f64> = (0..len).map(|i| (i % 7 + 1) as f64).collect();
    Arc::new(PolyFit {
        reference: poly(&solution),
    })
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_crossover(c: &mut Criterion) {
    let mut group = c.benchmark_group("crossover");
    for &len in &[6usize, 32, 128] {
        let p1: Vec<u8> = (0..len).map(|i| (i % 250 + 1) as u8).collect();
        let p2: Vec<u8> = p1.iter().rev().copied().collect();
        let mut rng = create_rng(42);
        group.bench_with_input(BenchmarkId::from_parameter(len), &(p1, p2), |b, (p1, p2)| {
            b.iter(|| black_box(operators::crossover(black_box(p1), black_box(p2), &mut rng)))
        });
    }
    group.finish();
}

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");
    group.sample_size(20);

    for (pop, parallel) in [(100usize, false), (1000, false), (1000, true)] {
        let config = GenerationConfig::new(pop, 6, 255)
            .with_parallel(parallel)
            .with_seed(42);
        let generation = Generation::new(poly_problem(6), config).expect("valid config");
        group.bench_with_input(
            BenchmarkId::new(if parallel { "parallel" } else { "sequential" }, pop),
            &generation,
            |b, g| b.iter(|| black_box(g.next().expect("step"))),
        );
    }
    group.finish();
}

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run");
    group.sample_size(10);

    for (pop, gens) in [(100usize, 50usize), (1000, 20)] {
        let config = GenerationConfig::new(pop, 6, 255).with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(format!("p{}_g{}", pop, gens), pop),
            &config,
            |b, cfg| {
                b.iter(|| {
                    let result = EvolutionRunner::run(poly_problem(6), cfg.clone(), gens);
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_crossover, bench_advance, bench_run);
criterion_main!(benches);
