//! Symbol interner benchmarks.
//!
//! Run with: `cargo bench --bench symbol_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use minic_util::Symbol;

fn bench_intern(c: &mut Criterion) {
    let mut group = c.benchmark_group("intern");
    group.throughput(Throughput::Elements(1));

    group.bench_function("intern_new_string", |b| {
        let mut counter = 0u64;
        b.iter(|| {
            counter += 1;
            Symbol::intern(&format!("new_string_{}", counter))
        })
    });

    group.bench_function("intern_existing_string", |b| {
        let _sym = Symbol::intern("existing_string");
        b.iter(|| black_box(Symbol::intern("existing_string")))
    });

    group.finish();
}

fn bench_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("comparison");
    group.throughput(Throughput::Elements(1));

    let sym1 = Symbol::intern("hello");
    let sym2 = Symbol::intern("hello");
    let sym3 = Symbol::intern("world");

    group.bench_function("symbol_eq_symbol", |b| {
        b.iter(|| {
            black_box(sym1 == sym2);
            black_box(sym1 == sym3);
        })
    });

    group.bench_function("symbol_eq_str", |b| {
        b.iter(|| {
            black_box(sym1.eq_str("hello"));
            black_box(sym1.eq_str("world"));
        })
    });

    group.finish();
}

fn bench_varying_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("varying_sizes");

    for &size in &[1, 10, 100, 1000, 10000] {
        let string = "a".repeat(size);
        group.bench_with_input(BenchmarkId::new("intern", size), &string, |b, s| {
            b.iter(|| black_box(Symbol::intern(s)))
        });
    }

    group.finish();
}

fn bench_stats(c: &mut Criterion) {
    for i in 0..1000 {
        let _ = Symbol::intern(&format!("bench_{}", i));
    }

    c.bench_function("stats", |b| b.iter(|| black_box(Symbol::stats())));
}

criterion_group!(
    benches,
    bench_intern,
    bench_comparison,
    bench_varying_sizes,
    bench_stats,
);
criterion_main!(benches);
