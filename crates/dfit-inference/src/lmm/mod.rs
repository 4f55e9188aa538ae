//! L-moment estimators.
//!
//! Location-scale families are closed-form in `λ1` and `λ2`; shape families
//! (in [`shape`]) additionally invert `τ3`.
//!
//! Reference: J. R. M. Hosking, "Fortran routines for use with the method of
//! L-moments", IBM Research Report RC20525 (1996).

pub mod shape;

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use dfit_core::{Distribution, Error, Result};
use dfit_prob::LMoments;
use dfit_prob::math::{EULER_MASCHERONI, LN_2};

use crate::estimator::{LMomentsEstimator, checked};

pub use shape::{
    GeneralizedExtremeValueLmm, GeneralizedLogisticAlternateLmm, GeneralizedParetoLmm, LogNormalBilkovaLmm,
    LogNormalLmm, SkewGNormalLmm, WeibullLmm,
};

/// `λ2 / σ` of the standard Rayleigh, `sqrt(π/2)·(1 - 1/√2)`.
const RAYLEIGH_L2: f64 = 1.253_314_137_315_500_3 * (1.0 - FRAC_1_SQRT_2);
/// Mean of the standard Rayleigh, `sqrt(π/2)`.
const RAYLEIGH_MEAN: f64 = 1.253_314_137_315_500_3;

/// `λ2`, failing with `DegenerateSample` unless it is strictly positive.
pub(crate) fn positive_l2(lm: &LMoments) -> Result<f64> {
    let l2 = lm.l2();
    if !(l2 > 0.0) {
        return Err(Error::DegenerateSample(format!("L-scale must be > 0, got {}", l2)));
    }
    Ok(l2)
}

/// Normal: `σ = λ2·√π`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalLmm;

/// Shifted exponential.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialLmm;

/// Gumbel (maximum).
#[derive(Debug, Clone, Copy, Default)]
pub struct GumbelLmm;

/// Logistic: `λ2` is the scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogisticLmm;

/// Laplace.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaplaceLmm;

/// Uniform on `λ1 ± 3λ2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformLmm;

/// Rayleigh with location.
#[derive(Debug, Clone, Copy, Default)]
pub struct RayleighLmm;

/// Gamma from the L-coefficient of variation `λ2/λ1` (Hosking `pelgam`).
#[derive(Debug, Clone, Copy, Default)]
pub struct GammaLmm;

impl LMomentsEstimator for NormalLmm {
    fn num_moments(&self) -> usize {
        2
    }

    fn estimate_from_lmoments(&self, lm: &LMoments) -> Result<Distribution> {
        let sigma = positive_l2(lm)? * PI.sqrt();
        checked(Distribution::Normal { mu: lm.l1(), sigma }, &[sigma])
    }
}

impl LMomentsEstimator for ExponentialLmm {
    fn num_moments(&self) -> usize {
        2
    }

    fn estimate_from_lmoments(&self, lm: &LMoments) -> Result<Distribution> {
        let l2 = positive_l2(lm)?;
        let rate = 0.5 / l2;
        checked(Distribution::Exponential { rate, location: lm.l1() - 2.0 * l2 }, &[rate])
    }
}

impl LMomentsEstimator for GumbelLmm {
    fn num_moments(&self) -> usize {
        2
    }

    fn estimate_from_lmoments(&self, lm: &LMoments) -> Result<Distribution> {
        let beta = positive_l2(lm)? / LN_2;
        checked(Distribution::Gumbel { mu: lm.l1() - EULER_MASCHERONI * beta, beta }, &[beta])
    }
}

impl LMomentsEstimator for LogisticLmm {
    fn num_moments(&self) -> usize {
        2
    }

    fn estimate_from_lmoments(&self, lm: &LMoments) -> Result<Distribution> {
        let scale = positive_l2(lm)?;
        checked(Distribution::Logistic { location: lm.l1(), scale }, &[scale])
    }
}

impl LMomentsEstimator for LaplaceLmm {
    fn num_moments(&self) -> usize {
        2
    }

    fn estimate_from_lmoments(&self, lm: &LMoments) -> Result<Distribution> {
        // λ2 of a Laplace is 3/(4·rate).
        let rate = 0.75 / positive_l2(lm)?;
        checked(Distribution::Laplace { rate, location: lm.l1() }, &[rate])
    }
}

impl LMomentsEstimator for UniformLmm {
    fn num_moments(&self) -> usize {
        2
    }

    fn estimate_from_lmoments(&self, lm: &LMoments) -> Result<Distribution> {
        let half = 3.0 * positive_l2(lm)?;
        checked(Distribution::Uniform { min: lm.l1() - half, max: lm.l1() + half }, &[half])
    }
}

impl LMomentsEstimator for RayleighLmm {
    fn num_moments(&self) -> usize {
        2
    }

    fn estimate_from_lmoments(&self, lm: &LMoments) -> Result<Distribution> {
        let sigma = positive_l2(lm)? / RAYLEIGH_L2;
        checked(Distribution::Rayleigh { mu: lm.l1() - sigma * RAYLEIGH_MEAN, sigma }, &[sigma])
    }
}

impl LMomentsEstimator for GammaLmm {
    fn num_moments(&self) -> usize {
        2
    }

    fn estimate_from_lmoments(&self, lm: &LMoments) -> Result<Distribution> {
        const A1: f64 = -0.3080;
        const A2: f64 = -0.05812;
        const A3: f64 = 0.01765;
        const B1: f64 = 0.7213;
        const B2: f64 = -0.5947;
        const B3: f64 = -2.1817;
        const B4: f64 = 1.2113;

        let l1 = lm.l1();
        let l2 = positive_l2(lm)?;
        if !(l1 > 0.0) {
            return Err(Error::InvalidMomentRatio(format!("gamma needs a positive mean, got {}", l1)));
        }
        let cv = l2 / l1;
        if !(cv < 1.0) {
            return Err(Error::InvalidMomentRatio(format!(
                "gamma needs L-CV in (0, 1), got {}",
                cv
            )));
        }
        let k = if cv >= 0.5 {
            let t = 1.0 - cv;
            t * (B1 + t * B2) / (1.0 + t * (B3 + t * B4))
        } else {
            let t = PI * cv * cv;
            (1.0 + A1 * t) / (t * (1.0 + t * (A2 + t * A3)))
        };
        // θ is a rate: mean = k/θ.
        let theta = k / l1;
        checked(Distribution::Gamma { k, theta }, &[k, theta])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn lm(data: &[f64], nmom: usize) -> LMoments {
        LMoments::from_sample(data, nmom).unwrap()
    }

    #[test]
    fn test_rayleigh_constants() {
        assert_relative_eq!(RAYLEIGH_MEAN, (PI / 2.0).sqrt(), epsilon = 1e-15);
        assert_relative_eq!(RAYLEIGH_L2, (PI / 2.0).sqrt() * (1.0 - 0.5f64.sqrt()), epsilon = 1e-15);
    }

    #[test]
    fn test_location_scale_closed_forms() {
        // λ1 = 3, λ2 = 1
        let m = lm(&[1.0, 2.0, 3.0, 4.0, 5.0], 2);
        assert_eq!(
            NormalLmm.estimate_from_lmoments(&m).unwrap(),
            Distribution::Normal { mu: 3.0, sigma: PI.sqrt() }
        );
        assert_eq!(
            ExponentialLmm.estimate_from_lmoments(&m).unwrap(),
            Distribution::Exponential { rate: 0.5, location: 1.0 }
        );
        assert_eq!(
            LogisticLmm.estimate_from_lmoments(&m).unwrap(),
            Distribution::Logistic { location: 3.0, scale: 1.0 }
        );
        assert_eq!(
            LaplaceLmm.estimate_from_lmoments(&m).unwrap(),
            Distribution::Laplace { rate: 0.75, location: 3.0 }
        );
        assert_eq!(
            UniformLmm.estimate_from_lmoments(&m).unwrap(),
            Distribution::Uniform { min: 0.0, max: 6.0 }
        );
        let Distribution::Gumbel { mu, beta } = GumbelLmm.estimate_from_lmoments(&m).unwrap() else {
            panic!("expected Gumbel")
        };
        assert_relative_eq!(beta, 1.0 / LN_2, epsilon = 1e-14);
        assert_relative_eq!(mu, 3.0 - EULER_MASCHERONI / LN_2, epsilon = 1e-14);
        let Distribution::Rayleigh { mu, sigma } = RayleighLmm.estimate_from_lmoments(&m).unwrap() else {
            panic!("expected Rayleigh")
        };
        assert_relative_eq!(mu + sigma * RAYLEIGH_MEAN, 3.0, epsilon = 1e-14);
    }

    #[test]
    fn test_uniform_lmm_recovers_grid_bounds() {
        // Population λ2 of U(a, b) is (b - a)/6; a fine grid is close.
        let data: Vec<f64> = (0..=1000).map(|i| i as f64 / 1000.0).collect();
        let Distribution::Uniform { min, max } = UniformLmm.estimate_from_lmoments(&lm(&data, 2)).unwrap()
        else {
            panic!("expected uniform")
        };
        assert_relative_eq!(min, 0.0, epsilon = 2e-3);
        assert_relative_eq!(max, 1.0, epsilon = 2e-3);
    }

    #[test]
    fn test_zero_l_scale_is_degenerate() {
        let m = lm(&[2.0, 2.0, 2.0], 2);
        let err = NormalLmm.estimate_from_lmoments(&m).unwrap_err();
        assert_eq!(err.kind(), dfit_core::ErrorKind::DegenerateSample);
    }

    #[test]
    fn test_gamma_lmm_exponential_case() {
        // Exponential(1): λ1 = 1, λ2 = 1/2, so L-CV = 1/2 and k ≈ 1.
        let n = 4000;
        let data: Vec<f64> = (0..n).map(|i| -(1.0 - (i as f64 + 0.5) / n as f64).ln()).collect();
        let Distribution::Gamma { k, theta } = GammaLmm.estimate_from_lmoments(&lm(&data, 2)).unwrap() else {
            panic!("expected gamma")
        };
        assert_relative_eq!(k, 1.0, epsilon = 2e-2);
        assert_relative_eq!(theta, 1.0, epsilon = 2e-2);
    }

    #[test]
    fn test_gamma_lmm_branches_agree_at_split() {
        let small = |cv: f64| {
            let t = PI * cv * cv;
            (1.0 - 0.3080 * t) / (t * (1.0 - t * (0.05812 - t * 0.01765)))
        };
        let large = |cv: f64| {
            let t = 1.0 - cv;
            t * (0.7213 - t * 0.5947) / (1.0 + t * (-2.1817 + t * 1.2113))
        };
        assert_relative_eq!(small(0.5), large(0.5), max_relative = 1e-3);
    }

    #[test]
    fn test_gamma_lmm_rejects_non_positive_mean() {
        let err = GammaLmm.estimate_from_lmoments(&lm(&[-3.0, -1.0, 0.5], 2)).unwrap_err();
        assert_eq!(err.kind(), dfit_core::ErrorKind::InvalidMomentRatio);
    }
}
