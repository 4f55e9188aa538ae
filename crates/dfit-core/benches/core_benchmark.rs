use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use dfit_core::{Distribution, Family, finite_values};
use std::hint::black_box;

fn bench_finite_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("core_sample_view");

    for n in [1_000usize, 10_000, 100_000] {
        // Every 17th entry is NaN so the skip path is exercised.
        let data: Vec<f64> =
            (0..n).map(|i| if i % 17 == 0 { f64::NAN } else { (i as f64) * 1e-3 }).collect();
        group.bench_with_input(BenchmarkId::new("finite_values", n), &data, |b, d| {
            b.iter(|| black_box(finite_values(&d[..]).len()))
        });
    }

    group.finish();
}

fn bench_from_params(c: &mut Criterion) {
    c.bench_function("distribution_from_params_all_families", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for family in Family::ALL {
                let params = vec![1.5; family.n_parameters()];
                let d = Distribution::from_params(family, &params).unwrap();
                acc += d.params()[0];
            }
            black_box(acc)
        })
    });
}

criterion_group!(benches, bench_finite_values, bench_from_params);
criterion_main!(benches);
