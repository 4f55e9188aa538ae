//! L-moment estimators for three-parameter (shape) families.
//!
//! The shape is recovered from the L-skewness `τ3`, using Hosking's rational
//! approximations with a Newton refinement where they lose accuracy.

use std::f64::consts::PI;

use dfit_core::{Distribution, Error, Result};
use dfit_prob::LMoments;
use dfit_prob::math::{EULER_MASCHERONI, LN_2, LN_3, erf, gamma};
use dfit_prob::normal::standard_quantile;

use super::positive_l2;
use crate::estimator::{LMomentsEstimator, checked};
use crate::solver::{NewtonConfig, newton_raphson};

/// Below this `|τ3|` the shape is taken as exactly zero.
const TAU3_ZERO: f64 = 1e-8;
/// Below this `|g|` the GEV shape is taken as zero.
const GEV_SHAPE_ZERO: f64 = 1e-5;
/// Largest `|τ3|` for which the generalized normal approximation holds.
const GNO_TAU3_MAX: f64 = 0.95;
/// Newton refinement is used for GEV when `τ3` falls below this.
const GEV_NEWTON_BELOW: f64 = -0.8;
/// Seed the GEV Newton refinement from the asymptote below this `τ3`.
const GEV_ASYMPTOTIC_SEED_BELOW: f64 = -0.97;

/// GEV location `xi`, scale `alpha` and Hosking shape `k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct GevParams {
    pub xi: f64,
    pub alpha: f64,
    pub k: f64,
}

fn gumbel_limit(l1: f64, l2: f64) -> GevParams {
    let alpha = l2 / LN_2;
    GevParams { xi: l1 - EULER_MASCHERONI * alpha, alpha, k: 0.0 }
}

/// Hosking's GEV inversion (`pelgev`).
pub(crate) fn gev_from_lmoments(l1: f64, l2: f64, t3: f64, newton: &NewtonConfig) -> Result<GevParams> {
    if !(t3.abs() < 1.0) {
        return Err(Error::InvalidMomentRatio(format!("GEV needs |tau3| < 1, got {}", t3)));
    }
    if t3.abs() < TAU3_ZERO {
        log::debug!("GEV: tau3={} treated as zero shape", t3);
        return Ok(gumbel_limit(l1, l2));
    }

    let g = if t3 > 0.0 {
        const C1: f64 = 1.59921491;
        const C2: f64 = -0.48832213;
        const C3: f64 = 0.01573152;
        const D1: f64 = -0.64363929;
        const D2: f64 = 0.08985247;
        let z = 1.0 - t3;
        (-1.0 + z * (C1 + z * (C2 + z * C3))) / (1.0 + z * (D1 + z * D2))
    } else {
        const A0: f64 = 0.28377530;
        const A1: f64 = -1.21096399;
        const A2: f64 = -2.50728214;
        const A3: f64 = -1.13455566;
        const A4: f64 = -0.07138022;
        const B1: f64 = 2.06189696;
        const B2: f64 = 1.31912239;
        const B3: f64 = 0.25077104;
        let g = (A0 + t3 * (A1 + t3 * (A2 + t3 * (A3 + t3 * A4)))) / (1.0 + t3 * (B1 + t3 * (B2 + t3 * B3)));
        if t3 < GEV_NEWTON_BELOW { refine_gev_shape(t3, g, newton)? } else { g }
    };

    if g.abs() < GEV_SHAPE_ZERO {
        log::debug!("GEV: shape {} treated as zero", g);
        return Ok(gumbel_limit(l1, l2));
    }
    let gam = gamma(1.0 + g);
    let alpha = l2 * g / (gam * (1.0 - 2f64.powf(-g)));
    let xi = l1 - alpha * (1.0 - gam) / g;
    Ok(GevParams { xi, alpha, k: g })
}

/// Solve `(1 - 3^-g) / (1 - 2^-g) = (τ3 + 3) / 2` for `g`.
fn refine_gev_shape(t3: f64, approx: f64, config: &NewtonConfig) -> Result<f64> {
    let seed = if t3 <= GEV_ASYMPTOTIC_SEED_BELOW { 1.0 - (1.0 + t3).ln() / LN_2 } else { approx };
    let target = 0.5 * (t3 + 3.0);
    // The relative step tolerance may be below machine precision; a residual
    // within a few ULPs of the target also counts as converged.
    let config = NewtonConfig {
        abs_residual_tol: config.abs_residual_tol.max(8.0 * f64::EPSILON * target),
        ..*config
    };
    let out = newton_raphson("GEV shape", seed, &config, |g| {
        let x2 = 2f64.powf(-g);
        let x3 = 3f64.powf(-g);
        let xx2 = 1.0 - x2;
        let xx3 = 1.0 - x3;
        let t = xx3 / xx2;
        let deriv = (xx2 * x3 * LN_3 - xx3 * x2 * LN_2) / (xx2 * xx2);
        (t - target, deriv)
    })?;
    Ok(out.root)
}

/// Generalized extreme value (Hosking parameterization, `k > 0` bounded above).
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralizedExtremeValueLmm;

/// Three-parameter Weibull: the GEV inversion applied to the reflected sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeibullLmm;

/// Generalized Pareto (Hosking `pelgpa`, shape reported as `ξ = -k`).
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralizedParetoLmm;

/// Generalized logistic, Hosking's parameterization (`pelglo`).
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralizedLogisticAlternateLmm;

/// Skew generalized normal (Hosking's generalized normal, `pelgno`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SkewGNormalLmm;

/// Three-parameter lognormal through the generalized normal inversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNormalLmm;

/// Three-parameter lognormal, Bílková's approximation of `σ` from `τ3`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNormalBilkovaLmm;

impl LMomentsEstimator for GeneralizedExtremeValueLmm {
    fn num_moments(&self) -> usize {
        3
    }

    fn estimate_from_lmoments(&self, lm: &LMoments) -> Result<Distribution> {
        let p = gev_from_lmoments(lm.l1(), positive_l2(lm)?, lm.t3()?, &NewtonConfig::GEV)?;
        checked(Distribution::GeneralizedExtremeValue { mu: p.xi, sigma: p.alpha, k: p.k }, &[p.alpha])
    }
}

fn weibull_from_lmoments(l1: f64, l2: f64, t3: f64) -> Result<Distribution> {
    let p = gev_from_lmoments(-l1, l2, -t3, &NewtonConfig::WEIBULL)?;
    if p.k == 0.0 {
        return Err(Error::InvalidParameter(format!(
            "Weibull shape diverges for tau3={}",
            t3
        )));
    }
    let k = 1.0 / p.k;
    let lambda = p.alpha / p.k;
    let theta = -p.xi - lambda;
    checked(Distribution::Weibull { k, lambda, theta }, &[k, lambda])
}

impl LMomentsEstimator for WeibullLmm {
    fn num_moments(&self) -> usize {
        3
    }

    fn estimate_from_lmoments(&self, lm: &LMoments) -> Result<Distribution> {
        weibull_from_lmoments(lm.l1(), positive_l2(lm)?, lm.t3()?)
    }
}

fn generalized_pareto_from_lmoments(l1: f64, l2: f64, t3: f64) -> Result<Distribution> {
    if !(t3.abs() < 1.0) {
        return Err(Error::InvalidMomentRatio(format!(
            "generalized Pareto needs |tau3| < 1, got {}",
            t3
        )));
    }
    let xi = (3.0 * t3 - 1.0) / (1.0 + t3);
    let sigma = (1.0 - xi) * (2.0 - xi) * l2;
    let mu = l1 - (2.0 - xi) * l2;
    checked(Distribution::GeneralizedPareto { mu, sigma, xi }, &[sigma])
}

impl LMomentsEstimator for GeneralizedParetoLmm {
    fn num_moments(&self) -> usize {
        3
    }

    fn estimate_from_lmoments(&self, lm: &LMoments) -> Result<Distribution> {
        generalized_pareto_from_lmoments(lm.l1(), positive_l2(lm)?, lm.t3()?)
    }
}

fn generalized_logistic_from_lmoments(l1: f64, l2: f64, t3: f64) -> Result<Distribution> {
    let shape = -t3;
    if !(shape.abs() < 1.0) {
        return Err(Error::InvalidMomentRatio(format!(
            "generalized logistic needs |tau3| < 1, got {}",
            t3
        )));
    }
    if shape.abs() < 1e-6 {
        return checked(Distribution::GeneralizedLogisticAlternate { location: l1, scale: l2, shape: 0.0 }, &[l2]);
    }
    let spi = shape * PI;
    let scale = l2 * spi.sin() / spi;
    let location = l1 - scale * (1.0 / shape - PI / spi.sin());
    checked(Distribution::GeneralizedLogisticAlternate { location, scale, shape }, &[scale])
}

impl LMomentsEstimator for GeneralizedLogisticAlternateLmm {
    fn num_moments(&self) -> usize {
        3
    }

    fn estimate_from_lmoments(&self, lm: &LMoments) -> Result<Distribution> {
        generalized_logistic_from_lmoments(lm.l1(), positive_l2(lm)?, lm.t3()?)
    }
}

/// Generalized normal location `xi`, scale `alpha` and shape `g` (`pelgno`).
fn gno_from_lmoments(l1: f64, l2: f64, t3: f64) -> Result<(f64, f64, f64)> {
    const E0: f64 = 2.0466534;
    const E1: f64 = -3.6544371;
    const E2: f64 = 1.8396733;
    const E3: f64 = -0.20360244;
    const F1: f64 = -2.0182173;
    const F2: f64 = 1.2420401;
    const F3: f64 = -0.21741801;

    if !(t3.abs() < GNO_TAU3_MAX) {
        return Err(Error::InvalidMomentRatio(format!(
            "generalized normal needs |tau3| < {}, got {}",
            GNO_TAU3_MAX, t3
        )));
    }
    if t3.abs() <= TAU3_ZERO {
        return Ok((l1, l2 * PI.sqrt(), 0.0));
    }
    let tt = t3 * t3;
    let g = -t3 * (E0 + tt * (E1 + tt * (E2 + tt * E3))) / (1.0 + tt * (F1 + tt * (F2 + tt * F3)));
    let e = (0.5 * g * g).exp();
    let alpha = l2 * g / (e * erf(0.5 * g));
    let xi = l1 + alpha * (e - 1.0) / g;
    Ok((xi, alpha, g))
}

impl LMomentsEstimator for SkewGNormalLmm {
    fn num_moments(&self) -> usize {
        3
    }

    fn estimate_from_lmoments(&self, lm: &LMoments) -> Result<Distribution> {
        let (mu, sigma, skew) = gno_from_lmoments(lm.l1(), positive_l2(lm)?, lm.t3()?)?;
        checked(Distribution::SkewGeneralizedNormal { mu, sigma, skew }, &[sigma])
    }
}

fn require_right_skew(t3: f64, upper: f64) -> Result<()> {
    if !(t3 > 0.0 && t3 < upper) {
        return Err(Error::InvalidMomentRatio(format!(
            "three-parameter lognormal needs tau3 in (0, {}), got {}",
            upper, t3
        )));
    }
    Ok(())
}

impl LMomentsEstimator for LogNormalLmm {
    fn num_moments(&self) -> usize {
        3
    }

    fn estimate_from_lmoments(&self, lm: &LMoments) -> Result<Distribution> {
        let t3 = lm.t3()?;
        require_right_skew(t3, GNO_TAU3_MAX)?;
        let (xi, alpha, g) = gno_from_lmoments(lm.l1(), positive_l2(lm)?, t3)?;
        let logsigma = -g;
        let scale = alpha / logsigma;
        checked(Distribution::LogNormal { logmu: scale.ln(), logsigma, shift: xi - scale }, &[logsigma])
    }
}

impl LMomentsEstimator for LogNormalBilkovaLmm {
    fn num_moments(&self) -> usize {
        3
    }

    fn estimate_from_lmoments(&self, lm: &LMoments) -> Result<Distribution> {
        let t3 = lm.t3()?;
        require_right_skew(t3, 1.0)?;
        let l2 = positive_l2(lm)?;
        let z = (8.0f64 / 3.0).sqrt() * standard_quantile(0.5 * (1.0 + t3))?;
        let z2 = z * z;
        let logsigma = z * (0.999281 - z2 * (0.006118 - z2 * 0.000127));
        let half_var = 0.5 * logsigma * logsigma;
        let logmu = (l2 / erf(0.5 * logsigma)).ln() - half_var;
        let shift = lm.l1() - (logmu + half_var).exp();
        checked(Distribution::LogNormal { logmu, logsigma, shift }, &[logsigma])
    }
}
