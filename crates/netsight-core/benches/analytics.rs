use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};

use netsight_core::graph::{EdgeRow, GraphStore};
use netsight_core::{CentralityEngine, LayoutEngine};

const SIZES: [usize; 3] = [50, 200, 500];
const RELATIONS: [&str; 4] = ["alliance", "conflict", "command", "bribe"];

/// Sparse random multigraph with about three edges per node.
fn random_store(nodes: usize, seed: u64) -> GraphStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let rows: Vec<EdgeRow> = (0..nodes * 3)
        .filter_map(|_| {
            let a = rng.gen_range(0..nodes);
            let b = rng.gen_range(0..nodes);
            let w = rng.gen_range(0.5..10.0);
            let r = RELATIONS[rng.gen_range(0..RELATIONS.len())];
            (a != b).then(|| EdgeRow::new(format!("n{a}"), format!("n{b}"), w, r))
        })
        .collect();
    GraphStore::build(&rows).expect("generated rows are valid")
}

fn bench_centrality(c: &mut Criterion) {
    let mut group = c.benchmark_group("centrality.compute");
    let engine = CentralityEngine::default();

    for size in SIZES {
        let store = random_store(size, 0x5EED);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &store, |b, store| {
            b.iter(|| black_box(engine.compute(store).len()));
        });
    }

    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout.compute");
    let engine = LayoutEngine::default();

    for size in SIZES {
        let store = random_store(size, 0x5EED);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &store, |b, store| {
            b.iter(|| black_box(engine.compute(store).len()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_centrality, bench_layout);
criterion_main!(benches);
