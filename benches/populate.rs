mod common;

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use surface_scatter::prelude::*;

const COUNTS: [usize; 4] = [50, 200, 1000, 5000];

fn plane() -> PlanePatch {
    PlanePatch::xy(100.0)
}

fn populate_unconstrained_benches(c: &mut Criterion) {
    let surface = plane();
    let mut group = c.benchmark_group("populate/unconstrained");

    for &count in &COUNTS {
        group.throughput(common::elements_throughput(count));
        let request = PopulateRequest::new(count).with_seed(0xC0FFEE);

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                let result = populate(&surface, &request).expect("populate");
                black_box(result.len());
            });
        });
    }

    group.finish();
}

fn populate_fixed_separation_benches(c: &mut Criterion) {
    let surface = plane();
    let mut group = c.benchmark_group("populate/fixed_separation");

    for &count in &COUNTS {
        group.throughput(common::elements_throughput(count));
        let request = PopulateRequest::new(count)
            .with_separation(Separation::Fixed(1.0))
            .with_seed(0xBEEF);

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                let result = populate(&surface, &request).expect("populate");
                black_box(result.len());
            });
        });
    }

    group.finish();
}

fn populate_field_separation_benches(c: &mut Criterion) {
    let surface = plane();
    let mut group = c.benchmark_group("populate/field_separation");

    for &count in &COUNTS {
        group.throughput(common::elements_throughput(count));
        let request = PopulateRequest::new(count)
            .with_separation(Separation::Field {
                field: Arc::new(ConstantField::new(0.5)),
                random_radius: true,
            })
            .with_seed(0xA11CE);

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                let result = populate(&surface, &request).expect("populate");
                black_box(result.len());
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = populate_unconstrained_benches, populate_fixed_separation_benches, populate_field_separation_benches
}
criterion_main!(benches);
