//! Substitution throughput benchmarks
//!
//! Measures inline/externalize rewriting of the structure buffer with
//! varying image counts and payload sizes.
//!
//! Run benchmarks: `cargo bench --bench substitution_throughput`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use quire_core::{AssetRegistry, SubstitutionEngine};
use quire_types::ImageFormat;
use std::hint::black_box;

/// A registry with `count` images of `size` bytes and a document that
/// references each of them twice.
fn fixture(count: usize, size: usize) -> (AssetRegistry, String) {
    let mut registry = AssetRegistry::new();
    let mut document = String::new();
    for i in 0..count {
        let name = format!("figure ({}).png", i);
        let payload: Vec<u8> = (0..size).map(|b| (b + i) as u8).collect();
        registry.add_image(name.clone(), ImageFormat::Png, payload);
        document.push_str(&format!(
            "<figure><img src=\"images/{0}\"><figcaption>Figure {1}</figcaption></figure>\n<p>See images/{0}.</p>\n",
            name, i
        ));
    }
    (registry, document)
}

fn benchmark_inline(c: &mut Criterion) {
    let mut group = c.benchmark_group("inline");
    for count in [1, 10, 100] {
        let (registry, document) = fixture(count, 16 * 1024);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("images", count), &document, |b, doc| {
            let engine = SubstitutionEngine::new(&registry);
            b.iter(|| black_box(engine.inline(black_box(doc))));
        });
    }
    group.finish();
}

fn benchmark_externalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("externalize");
    for size in [1024, 64 * 1024, 1024 * 1024] {
        let (registry, document) = fixture(10, size);
        let inline = SubstitutionEngine::new(&registry).inline(&document);
        group.throughput(Throughput::Bytes(inline.len() as u64));
        group.bench_with_input(BenchmarkId::new("payload_bytes", size), &inline, |b, doc| {
            let engine = SubstitutionEngine::new(&registry);
            b.iter(|| black_box(engine.externalize(black_box(doc))));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_inline, benchmark_externalize);
criterion_main!(benches);
