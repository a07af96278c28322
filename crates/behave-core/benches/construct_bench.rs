//! Criterion benchmarks for registry construction.
//!
//! Two benchmark groups:
//! - `construct`: full scan, parse, seed and wire of chain documents of
//!   increasing size, plus the sample document
//! - `attach`: attach and live-reload of one fuel-model record

use std::path::Path;

use behave_core::config::EngineConfig;
use behave_core::scan::scan_definition;
use behave_core::test_utils::*;
use behave_core::registry::EngineRegistry;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

fn bench_construct(c: &mut Criterion) {
    let config = EngineConfig::default();
    let mut group = c.benchmark_group("construct");

    for n in [100usize, 1_000, 5_000] {
        let doc = chain_definition(n);
        group.bench_with_input(BenchmarkId::new("chain", n), &doc, |b, doc| {
            b.iter(|| EngineRegistry::from_definition(doc, &config).unwrap());
        });
    }

    group.bench_function("sample", |b| {
        b.iter(|| EngineRegistry::from_definition(SAMPLE_DEFINITION, &config).unwrap());
    });

    let doc = chain_definition(5_000);
    group.bench_function("scan_only", |b| {
        b.iter(|| scan_definition(&doc));
    });

    group.finish();
}

fn bench_attach(c: &mut Criterion) {
    let mut registry = sample_registry();
    let path = Path::new("FuelModels/GR14.bpf");
    c.bench_function("attach/reload", |b| {
        b.iter(|| {
            registry
                .attach_fuel_model_str(path, SAMPLE_FUEL_MODEL)
                .unwrap()
        });
    });
}

criterion_group!(benches, bench_construct, bench_attach);
criterion_main!(benches);
