//! Robust estimators from the median and the median absolute deviation.
//!
//! Each family maps `(median, MAD)` to its parameters through the family's
//! own quantile structure: the median is a location quantile and the MAD is
//! a fixed multiple of the scale.

use dfit_core::{Distribution, Result};
use dfit_prob::MedianMad;
use dfit_prob::math::{LN_2, LN_3};
use dfit_prob::normal::{ONE_BY_PHI_INV_075, PHI_INV_075};

use crate::estimator::{MedianMadEstimator, checked};

/// `(median - location) / MAD` of the standard exponential.
const EXPONENTIAL_MEDIAN_OFFSET: f64 = 1.440;
/// `scale / MAD` of the standard exponential.
const EXPONENTIAL_SCALE_BY_MAD: f64 = 2.0781;
/// MAD of the standard Gumbel.
const GUMBEL_MAD: f64 = 0.767_049_251_325_708;
/// Median of the standard Gumbel, `-ln(ln 2)`.
const GUMBEL_MEDIAN: f64 = 0.366_512_920_581_664_35;
/// Median of the standard Rayleigh, `sqrt(2 ln 2)`.
const RAYLEIGH_MEDIAN: f64 = 1.177_410_022_515_474_7;
/// MAD of the standard Rayleigh.
const RAYLEIGH_MAD: f64 = 0.448_453_085_919_913;

/// Normal: `μ = median`, `σ = MAD / Φ⁻¹(0.75)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalMad;

/// Gamma via a Wilson-Hilferty style approximation of the median/MAD ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct GammaMad;

/// Shifted exponential from median and MAD.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialMad;

/// Exponential rate from the median alone (`rate = ln 2 / median`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialMedian;

/// Laplace: the MAD of a Laplace equals `ln 2 / rate`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaplaceMad;

/// Gumbel from median and MAD.
#[derive(Debug, Clone, Copy, Default)]
pub struct GumbelMad;

/// Cauchy: the median and MAD are the location and scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct CauchyMad;

/// Logistic: the MAD is `ln 3` scales.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogisticMad;

/// Log-logistic (Fisk) with zero location.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLogisticMad;

/// Rayleigh with location.
#[derive(Debug, Clone, Copy, Default)]
pub struct RayleighMad;

/// Uniform on `median ± 2·MAD`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformMad;

/// Gamma `(k, θ)` with θ a rate, from a median and MAD.
///
/// Shared with the log-space variant.
pub(crate) fn gamma_from_median_mad(median: f64, mad: f64) -> Result<(f64, f64)> {
    let ratio = PHI_INV_075 * median / mad;
    let k = ratio * ratio + 0.1;
    let theta = (k - 1.0 / 3.0) / median;
    if !(k > 0.0 && k.is_finite() && theta > 0.0 && theta.is_finite()) {
        return Err(dfit_core::Error::InvalidParameter(format!(
            "gamma median/MAD fit gives k={}, theta={} (median={}, mad={})",
            k, theta, median, mad
        )));
    }
    Ok((k, theta))
}

impl MedianMadEstimator for NormalMad {
    fn estimate_from_median_mad(&self, mm: &MedianMad) -> Result<Distribution> {
        let sigma = ONE_BY_PHI_INV_075 * mm.mad;
        checked(Distribution::Normal { mu: mm.median, sigma }, &[sigma])
    }
}

impl MedianMadEstimator for GammaMad {
    fn estimate_from_median_mad(&self, mm: &MedianMad) -> Result<Distribution> {
        let (k, theta) = gamma_from_median_mad(mm.median, mm.mad)?;
        Ok(Distribution::Gamma { k, theta })
    }
}

impl MedianMadEstimator for ExponentialMad {
    fn estimate_from_median_mad(&self, mm: &MedianMad) -> Result<Distribution> {
        let location = mm.median - EXPONENTIAL_MEDIAN_OFFSET * mm.mad;
        let rate = 1.0 / (EXPONENTIAL_SCALE_BY_MAD * mm.mad);
        checked(Distribution::Exponential { rate, location }, &[rate])
    }
}

impl MedianMadEstimator for ExponentialMedian {
    fn estimate_from_median_mad(&self, mm: &MedianMad) -> Result<Distribution> {
        let rate = LN_2 / mm.median;
        checked(Distribution::Exponential { rate, location: 0.0 }, &[rate])
    }
}

impl MedianMadEstimator for LaplaceMad {
    fn estimate_from_median_mad(&self, mm: &MedianMad) -> Result<Distribution> {
        let rate = LN_2 / mm.mad;
        checked(Distribution::Laplace { rate, location: mm.median }, &[rate])
    }
}

impl MedianMadEstimator for GumbelMad {
    fn estimate_from_median_mad(&self, mm: &MedianMad) -> Result<Distribution> {
        let beta = mm.mad / GUMBEL_MAD;
        let mu = mm.median - GUMBEL_MEDIAN * beta;
        checked(Distribution::Gumbel { mu, beta }, &[beta])
    }
}

impl MedianMadEstimator for CauchyMad {
    fn estimate_from_median_mad(&self, mm: &MedianMad) -> Result<Distribution> {
        checked(Distribution::Cauchy { location: mm.median, shape: mm.mad }, &[mm.mad])
    }
}

impl MedianMadEstimator for LogisticMad {
    fn estimate_from_median_mad(&self, mm: &MedianMad) -> Result<Distribution> {
        let scale = mm.mad / LN_3;
        checked(Distribution::Logistic { location: mm.median, scale }, &[scale])
    }
}

impl MedianMadEstimator for LogLogisticMad {
    fn estimate_from_median_mad(&self, mm: &MedianMad) -> Result<Distribution> {
        let shape = mm.median * LN_3 / mm.mad;
        checked(
            Distribution::LogLogistic { scale: mm.median, shape, location: 0.0 },
            &[mm.median, shape],
        )
    }
}

impl MedianMadEstimator for RayleighMad {
    fn estimate_from_median_mad(&self, mm: &MedianMad) -> Result<Distribution> {
        let sigma = mm.mad / RAYLEIGH_MAD;
        let mu = mm.median - RAYLEIGH_MEDIAN * sigma;
        checked(Distribution::Rayleigh { mu, sigma }, &[sigma])
    }
}

impl MedianMadEstimator for UniformMad {
    fn estimate_from_median_mad(&self, mm: &MedianMad) -> Result<Distribution> {
        checked(
            Distribution::Uniform { min: mm.median - 2.0 * mm.mad, max: mm.median + 2.0 * mm.mad },
            &[mm.mad],
        )
    }
}
