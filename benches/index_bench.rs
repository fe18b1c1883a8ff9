//! Benchmarks for index construction and k-NN search.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tokio_util::sync::CancellationToken;

use neardex::{MetricKind, SearchOptions, VpTree};

fn random_words(n: usize) -> Vec<String> {
    (0..n)
        .map(|_| {
            let len = 3 + rand::random::<u32>() % 10;
            (0..len)
                .map(|_| (b'a' + rand::random::<u8>() % 26) as char)
                .collect()
        })
        .collect()
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for size in [1_000, 10_000] {
        let words = random_words(size);
        let cancel = CancellationToken::new();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                VpTree::build_with(
                    MetricKind::LevenshteinBytes,
                    black_box(words.clone()),
                    42,
                    &cancel,
                )
                .unwrap()
            });
        });
    }

    group.finish();
}

fn benchmark_knn(c: &mut Criterion) {
    let mut group = c.benchmark_group("knn");

    for size in [1_000, 10_000] {
        let words = random_words(size);
        let queries = random_words(50);
        let cancel = CancellationToken::new();
        let tree =
            VpTree::build_with(MetricKind::LevenshteinBytes, words, 42, &cancel).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                for q in &queries {
                    tree.search(black_box(q), &SearchOptions::new(5)).unwrap();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_build, benchmark_knn);
criterion_main!(benches);
