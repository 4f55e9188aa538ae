use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use dfit_inference::{Estimator, Methodology};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Gamma};
use std::hint::black_box;

fn gamma_sample(n: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(42);
    let dist = Gamma::new(4.0, 0.5).unwrap();
    (0..n).map(|_| dist.sample(&mut rng)).collect()
}

fn bench_estimators(c: &mut Criterion) {
    let xs = gamma_sample(10_000);
    let small = gamma_sample(1_000);

    let mut group = c.benchmark_group("estimate");
    for e in Estimator::ALL {
        // The KDE fit is quadratic in n.
        let data = if e.methodology() == Methodology::LeastSquares { &small } else { &xs };
        group.bench_with_input(BenchmarkId::new(e.name(), data.len()), data, |b, data| {
            b.iter(|| black_box(e.estimate(black_box(data))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_estimators);
criterion_main!(benches);
