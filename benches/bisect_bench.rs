//! Criterion benchmarks for u-bisect.
//!
//! Uses synthetic random graphs to measure cost evaluation and full
//! annealing runs at several sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use u_bisect::bisect::{AnnealConfig, AnnealRunner, CostEvaluator, Partition};
use u_bisect::Graph;

// ===========================================================================
// Synthetic graphs
// ===========================================================================

fn random_graph(n: usize, density: f64, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut weights = vec![0.0; n * n];
    for i in 0..n {
        for j in i + 1..n {
            if rng.random_bool(density) {
                let w = rng.random_range(1..10) as f64;
                weights[i * n + j] = w;
                weights[j * n + i] = w;
            }
        }
    }
    Graph::from_flat(n, weights).expect("synthetic graph is valid")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_cost_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("cost_evaluation");

    for &n in &[16usize, 64, 256] {
        let graph = random_graph(n, 0.3, 1);
        let partition = Partition::random(n, &mut StdRng::seed_from_u64(2));
        let evaluator = CostEvaluator::default();
        group.bench_with_input(BenchmarkId::from_parameter(n), &(graph, partition), |b, (g, p)| {
            b.iter(|| {
                let cost = evaluator.evaluate_partition(black_box(g), black_box(p));
                black_box(cost)
            })
        });
    }
    group.finish();
}

fn bench_anneal(c: &mut Criterion) {
    let mut group = c.benchmark_group("anneal");
    group.sample_size(10);

    for &n in &[10usize, 20, 40] {
        let graph = random_graph(n, 0.3, 3);
        let config = AnnealConfig::default().with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(graph, config), |b, (g, c)| {
            b.iter(|| {
                let result = AnnealRunner::run(black_box(g), black_box(c));
                black_box(result)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cost_evaluation, bench_anneal);
criterion_main!(benches);
