//! Benchmark suite for dsm-analysis.
//!
//! Covers the two read-side algorithms on a moderately dense symmetric
//! matrix: multi-level propagation and ART1 clustering.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use uuid::Uuid;

use dsm_analysis::art1::{art1_cluster, Art1Params};
use dsm_analysis::propagation::{propagation_analysis, PropagationParams};
use dsm_core::matrix::{Matrix, MatrixVariant};

/// A symmetric matrix of `n` items where item i connects to items i±1 and
/// i±3, giving every node a handful of neighbors.
fn banded_matrix(n: usize) -> (Matrix, Vec<Uuid>) {
    let mut m = Matrix::new(MatrixVariant::Symmetric);
    let pairs: Vec<(Uuid, Uuid)> = (0..n)
        .map(|i| m.create_item_pair(format!("item {}", i)).unwrap())
        .collect();
    for i in 0..n {
        for offset in [1usize, 3] {
            if i + offset < n {
                m.modify_connection_symmetric(
                    pairs[i].0,
                    pairs[i + offset].1,
                    "band",
                    1.0 + offset as f64,
                    Default::default(),
                )
                .unwrap();
            }
        }
    }
    let rows = pairs.into_iter().map(|(r, _)| r).collect();
    (m, rows)
}

fn bench_propagation(c: &mut Criterion) {
    let (m, rows) = banded_matrix(200);
    let params = PropagationParams::new(rows[0])
        .num_levels(5)
        .count_by_weight(true);
    c.bench_function("propagation_200_items_5_levels", |b| {
        b.iter(|| propagation_analysis(&m, &params))
    });
}

fn bench_clustering(c: &mut Criterion) {
    let (m, _) = banded_matrix(60);
    let params = Art1Params::default().vigilance(0.3).max_groups(12);
    c.bench_function("art1_cluster_60_items", |b| {
        b.iter_batched(
            || m.create_copy(),
            |copy| art1_cluster(&copy, &params),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_propagation, bench_clustering);
criterion_main!(benches);
