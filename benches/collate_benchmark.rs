#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};
use rust_ptune::ptune::collate::collate;
use rust_ptune::ptune::features::PTuneFeature;

static BATCH_SIZE: usize = 64;

fn create_features(batch_size: usize) -> Vec<PTuneFeature> {
    (0..batch_size)
        .map(|row| {
            let enc_length = 64 + (row * 7) % 448;
            let dec_length = 2 + (row * 3) % 30;
            PTuneFeature {
                enc_query: (0..enc_length).map(|position| 10 + position as i64).collect(),
                dec_input: (0..dec_length).map(|position| 10 + position as i64).collect(),
                labels: (0..dec_length).map(|position| 11 + position as i64).collect(),
                lang: None,
            }
        })
        .collect()
}

fn collation_benchmark(c: &mut Criterion) {
    let features = create_features(BATCH_SIZE);
    c.bench_function("Collation", |b| {
        b.iter(|| collate(black_box(&features), 0))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(50);
    targets = collation_benchmark
}

criterion_main!(benches);
