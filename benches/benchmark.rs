use std::collections::HashMap;

use criterion::{criterion_group, criterion_main, Criterion};
use svm_tfidf_corpus::{Corpus, TrainingRecord};

/// Synthetic vocabulary `term0 .. termN` and records that each contain a
/// deterministic slice of it.
fn build_corpus(feature_num: usize, doc_num: usize) -> (Corpus, Vec<String>) {
    let features: Vec<String> = (0..feature_num).map(|i| format!("term{}", i)).collect();
    let classes = ["a", "b", "c"];
    let records: Vec<TrainingRecord> = (0..doc_num)
        .map(|doc| {
            let features: HashMap<usize, f64> = (0..20)
                .map(|k| ((doc * 7 + k * 13) % feature_num + 1, 1.0))
                .collect();
            TrainingRecord::new((doc % classes.len()) as i32 + 1, features)
        })
        .collect();
    let corpus = Corpus::new(&classes, &features, &records).expect("corpus");
    (corpus, features)
}

fn vectorize_benchmark(c: &mut Criterion) {
    let (corpus, features) = build_corpus(5_000, 2_000);

    // a long text mixing vocabulary terms and filler words
    let mut text = String::new();
    for i in 0..2_000 {
        text.push_str(&features[(i * 31) % features.len()]);
        text.push_str(" filler words here, ");
    }

    c.bench_function("build_corpus", |b| {
        b.iter(|| build_corpus(5_000, 2_000))
    });

    c.bench_function("vector", |b| {
        b.iter(|| corpus.vector(&text))
    });

    c.bench_function("tokenize", |b| {
        b.iter(|| corpus.tokenizer().tokenize(&text).len())
    });
}

criterion_group!(benches, vectorize_benchmark);
criterion_main!(benches);
