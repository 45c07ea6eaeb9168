//! Criterion benchmarks for `np-math`.
//!
//! Compares the two dominance strategies on real region sets and times the
//! full analysis as the outcome count grows.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use np_math::{
    analyze_with, dominated_flags, enumerate_regions, region_metrics, AnalysisOptions,
    DominanceStrategy,
};

/// Deterministic, uneven distribution over `n` outcomes.
fn skewed(n: usize, seed: f64) -> Vec<f64> {
    let raw: Vec<f64> = (0..n).map(|i| 1.0 + ((i as f64 + seed) * 0.7).sin().abs()).collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|x| x / total).collect()
}

fn bench_dominance(c: &mut Criterion) {
    let mut group = c.benchmark_group("dominance");

    for n in [6usize, 8, 10] {
        let null = skewed(n, 0.0);
        let alt = skewed(n, 3.0);
        let points: Vec<[f64; 2]> = enumerate_regions(n)
            .into_iter()
            .map(|r| region_metrics(r, &null, &alt).dominance_point())
            .collect();

        for strategy in [DominanceStrategy::FrontierSweep, DominanceStrategy::Pairwise] {
            group.bench_with_input(
                BenchmarkId::new(strategy.to_string(), n),
                &points,
                |b, pts| b.iter(|| black_box(dominated_flags(black_box(pts), strategy))),
            );
        }
    }

    group.finish();
}

fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    group.sample_size(20);

    for n in [8usize, 12, 14] {
        let null = skewed(n, 1.0);
        let alt = skewed(n, 5.0);
        let options = AnalysisOptions::default();
        group.bench_with_input(BenchmarkId::new("frontier_sweep", n), &n, |b, _| {
            b.iter(|| black_box(analyze_with(black_box(&null), black_box(&alt), &options)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dominance, bench_analysis);
criterion_main!(benches);
