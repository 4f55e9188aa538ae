//! Method-of-moments estimators.

use dfit_core::{Distribution, Error, Result};
use dfit_prob::MomentAccumulator;

use crate::estimator::{MomentsEstimator, checked};

/// Normal from mean and sample standard deviation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalMom;

/// Gamma (shape `k`, rate `θ`) from mean and variance.
#[derive(Debug, Clone, Copy, Default)]
pub struct GammaMom;

/// Exponential rate from the mean.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialMom;

/// Inverse Gaussian from mean and variance.
#[derive(Debug, Clone, Copy, Default)]
pub struct InverseGaussianMom;

/// Exponentially modified Gaussian from mean, variance and skewness
/// (Olivier & Norberg).
#[derive(Debug, Clone, Copy, Default)]
pub struct EmgOlivierNorberg;

/// Gamma shape and rate matching `mean` and `variance`.
///
/// Shared with the log-space variant.
pub(crate) fn gamma_from_mean_variance(mean: f64, variance: f64) -> Result<(f64, f64)> {
    if mean == 0.0 || variance == 0.0 {
        return Err(Error::DegenerateSample(format!(
            "gamma moments need non-zero mean and variance (mean={}, variance={})",
            mean, variance
        )));
    }
    let theta = mean / variance;
    let k = mean * theta;
    if !(k > 0.0 && k.is_finite() && theta > 0.0 && theta.is_finite()) {
        return Err(Error::InvalidParameter(format!(
            "gamma moments give k={}, theta={} (mean={}, variance={})",
            k, theta, mean, variance
        )));
    }
    Ok((k, theta))
}

impl MomentsEstimator for NormalMom {
    fn estimate_from_moments(&self, moments: &MomentAccumulator) -> Result<Distribution> {
        let mu = moments.mean()?;
        let sigma = moments.sample_stddev()?;
        if sigma == 0.0 {
            return Err(Error::DegenerateSample("normal fit of a zero-variance sample".to_string()));
        }
        checked(Distribution::Normal { mu, sigma }, &[sigma])
    }
}

impl MomentsEstimator for GammaMom {
    fn estimate_from_moments(&self, moments: &MomentAccumulator) -> Result<Distribution> {
        let (k, theta) = gamma_from_mean_variance(moments.mean()?, moments.sample_variance()?)?;
        Ok(Distribution::Gamma { k, theta })
    }
}

impl MomentsEstimator for ExponentialMom {
    fn estimate_from_moments(&self, moments: &MomentAccumulator) -> Result<Distribution> {
        let mean = moments.mean()?;
        if mean == 0.0 {
            return Err(Error::DegenerateSample("exponential fit with zero mean".to_string()));
        }
        let rate = 1.0 / mean;
        checked(Distribution::Exponential { rate, location: 0.0 }, &[rate])
    }
}

impl MomentsEstimator for InverseGaussianMom {
    fn estimate_from_moments(&self, moments: &MomentAccumulator) -> Result<Distribution> {
        let mu = moments.mean()?;
        let variance = moments.sample_variance()?;
        if variance == 0.0 {
            return Err(Error::DegenerateSample(
                "inverse Gaussian fit of a zero-variance sample".to_string(),
            ));
        }
        let shape = mu * mu * mu / variance;
        checked(Distribution::InverseGaussian { mu, shape }, &[mu, shape])
    }
}

impl MomentsEstimator for EmgOlivierNorberg {
    fn estimate_from_moments(&self, moments: &MomentAccumulator) -> Result<Distribution> {
        let mean = moments.mean()?;
        let sd = moments.sample_stddev()?;
        let skew = moments.sample_skewness()?;
        // The EMG skewness lies in (0, 2).
        if !(skew > 0.0 && skew < 2.0) {
            return Err(Error::InvalidMomentRatio(format!(
                "EMG needs skewness in (0, 2), got {}",
                skew
            )));
        }
        let sk = (0.5 * skew).cbrt();
        let mu = mean - sd * sk;
        let sigma = sd * (1.0 - sk * sk).sqrt();
        let lambda = 1.0 / (sd * sk);
        checked(Distribution::ExponentiallyModifiedGaussian { mu, sigma, lambda }, &[sigma, lambda])
    }
}
