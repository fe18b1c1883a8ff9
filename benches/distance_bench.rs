//! Benchmarks for the distance kernels.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use neardex::metric::{damerau, levenshtein, trigram};

const PAIRS: [(&str, &str); 4] = [
    ("kitten", "sitting"),
    ("levenshtein", "levenshtein"),
    ("prefixAAsuffix", "prefixBsuffix"),
    (
        "the quick brown fox jumps over the lazy dog",
        "pack my box with five dozen liquor jugs",
    ),
];

fn benchmark_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernels");

    group.bench_function("levenshtein_bytes", |b| {
        b.iter(|| {
            for (x, y) in PAIRS {
                black_box(levenshtein::distance_bytes(black_box(x), black_box(y)));
            }
        });
    });

    group.bench_function("levenshtein_codepoints", |b| {
        b.iter(|| {
            for (x, y) in PAIRS {
                black_box(levenshtein::distance_codepoints(black_box(x), black_box(y)));
            }
        });
    });

    group.bench_function("damerau_codepoints", |b| {
        b.iter(|| {
            for (x, y) in PAIRS {
                black_box(damerau::distance_codepoints(black_box(x), black_box(y)));
            }
        });
    });

    group.bench_function("jaccard_trigrams", |b| {
        b.iter(|| {
            for (x, y) in PAIRS {
                black_box(trigram::jaccard_distance(black_box(x), black_box(y)));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_kernels);
criterion_main!(benches);
