//! Property tests over the whole strategy table.

use dfit_core::{Distribution, Result};
use dfit_inference::{Estimator, Methodology};
use proptest::prelude::*;

fn same_outcome(a: &Result<Distribution>, b: &Result<Distribution>, rel: f64) -> bool {
    match (a, b) {
        (Ok(x), Ok(y)) => {
            x.family() == y.family()
                && x.params().iter().zip(y.params()).all(|(p, q)| (p - q).abs() <= rel * p.abs().max(q.abs()).max(1.0))
        }
        (Err(x), Err(y)) => x.kind() == y.kind(),
        _ => false,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Reordering the input never changes the result beyond rounding.
    #[test]
    fn prop_permutation_invariance(data in proptest::collection::vec(0.1f64..100.0, 8..60)) {
        let mut reversed = data.clone();
        reversed.reverse();
        for e in Estimator::ALL {
            // The least-squares fit amplifies summation-order rounding through its stopping rule.
            if e.methodology() == Methodology::LeastSquares {
                continue;
            }
            let a = e.estimate(&data);
            let b = e.estimate(&reversed);
            prop_assert!(same_outcome(&a, &b, 1e-6), "{}: {:?} vs {:?}", e, a, b);
        }
    }

    // Repeated calls on the same sample agree bit for bit.
    #[test]
    fn prop_repeated_estimates_are_bit_identical(data in proptest::collection::vec(-50.0f64..50.0, 0..60)) {
        for e in Estimator::ALL {
            match (e.estimate(&data), e.estimate(&data)) {
                (Ok(a), Ok(b)) => {
                    prop_assert_eq!(a.family(), b.family());
                    let bits = |d: &Distribution| d.params().iter().map(|p| p.to_bits()).collect::<Vec<_>>();
                    prop_assert_eq!(bits(&a), bits(&b), "{}", e);
                }
                (Err(a), Err(b)) => prop_assert_eq!(a, b, "{}", e),
                (a, b) => prop_assert!(false, "{}: {:?} vs {:?}", e, a, b),
            }
        }
    }

    // Non-finite entries are skipped without perturbing anything.
    #[test]
    fn prop_non_finite_entries_are_ignored(
        data in proptest::collection::vec(-50.0f64..50.0, 4..40),
        positions in proptest::collection::vec(0usize..40, 1..6),
    ) {
        let mut noisy = data.clone();
        for (i, &p) in positions.iter().enumerate() {
            let junk = [f64::NAN, f64::INFINITY, f64::NEG_INFINITY][i % 3];
            noisy.insert(p.min(noisy.len()), junk);
        }
        for e in Estimator::ALL {
            let a = e.estimate(&data);
            let b = e.estimate(&noisy);
            prop_assert!(same_outcome(&a, &b, 0.0), "{}: {:?} vs {:?}", e, a, b);
        }
    }

    // Successful results are always finite, including log-space fits of
    // samples that reach zero or below.
    #[test]
    fn prop_results_are_finite(data in proptest::collection::vec(-20.0f64..20.0, 0..50)) {
        for e in Estimator::ALL {
            if let Ok(d) = e.estimate(&data) {
                prop_assert!(d.is_finite(), "{} gave {}", e, d);
                prop_assert_eq!(d.family(), e.family());
            }
        }
    }

    #[test]
    fn prop_log_fits_shift_below_minimum(data in proptest::collection::vec(-20.0f64..20.0, 3..50)) {
        let min = data.iter().copied().fold(f64::INFINITY, f64::min);
        for e in [Estimator::LogNormalLogMom, Estimator::LogGammaLogMom, Estimator::LogNormalLogMad] {
            let shift = match e.estimate(&data) {
                Ok(Distribution::LogNormal { shift, .. }) | Ok(Distribution::LogGamma { shift, .. }) => shift,
                _ => continue,
            };
            prop_assert!(shift < min || (min > 0.0 && shift == 0.0), "{}: shift {} vs min {}", e, shift, min);
        }
    }

    #[test]
    fn prop_gamma_mom_is_positive(data in proptest::collection::vec(0.01f64..1e3, 2..50)) {
        match Estimator::GammaMom.estimate(&data) {
            Ok(Distribution::Gamma { k, theta }) => prop_assert!(k > 0.0 && theta > 0.0),
            Ok(other) => prop_assert!(false, "unexpected {}", other),
            // Only a constant sample has zero variance.
            Err(_) => prop_assert!(data.iter().all(|&x| x == data[0])),
        }
    }

    #[test]
    fn prop_normal_location_equivariance(
        data in proptest::collection::vec(-10.0f64..10.0, 5..40),
        offset in -100.0f64..100.0,
    ) {
        let moved: Vec<f64> = data.iter().map(|x| x + offset).collect();
        for e in [Estimator::NormalMad, Estimator::NormalLmm] {
            if let (Ok(Distribution::Normal { mu: a, sigma: s }), Ok(Distribution::Normal { mu: b, sigma: t })) =
                (e.estimate(&data), e.estimate(&moved))
            {
                prop_assert!((b - a - offset).abs() < 1e-9 * (1.0 + offset.abs() + a.abs()));
                prop_assert!((s - t).abs() < 1e-8 * (1.0 + s + offset.abs()));
            }
        }
    }
}

#[test]
fn test_empty_sample_fails_everywhere() {
    let empty: [f64; 0] = [];
    for e in Estimator::ALL {
        assert!(e.estimate(&empty).is_err(), "{}", e);
    }
}

#[test]
fn test_f32_views_match_f64() {
    let single: Vec<f32> = vec![1.5, 2.25, 3.0, 4.75, 6.5, 9.0, 12.5];
    let double: Vec<f64> = single.iter().map(|&x| x as f64).collect();
    for e in Estimator::ALL {
        assert!(same_outcome(&e.estimate(&single), &e.estimate(&double), 0.0), "{}", e);
    }
}
