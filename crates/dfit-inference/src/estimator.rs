//! Estimator capability traits.
//!
//! Every strategy is a zero-sized type implementing exactly one of these
//! traits. Each trait names the summary statistic the strategy consumes; the
//! [`Estimator`](crate::Estimator) table computes that summary from the sample
//! and dispatches.

use std::fmt;

use dfit_core::{Distribution, Result};
use dfit_prob::{LMoments, LogSample, MedianMad, MomentAccumulator};

/// Estimation from mean, variance and skewness.
pub trait MomentsEstimator: Send + Sync {
    /// Fit from accumulated moments.
    fn estimate_from_moments(&self, moments: &MomentAccumulator) -> Result<Distribution>;
}

/// Estimation from median and MAD.
pub trait MedianMadEstimator: Send + Sync {
    /// Fit from the sample median and MAD.
    fn estimate_from_median_mad(&self, mm: &MedianMad) -> Result<Distribution>;
}

/// Estimation from sample L-moments.
pub trait LMomentsEstimator: Send + Sync {
    /// Number of L-moments the strategy needs (2 or 3).
    fn num_moments(&self) -> usize;

    /// Fit from L-moments of order `1..=num_moments()`.
    fn estimate_from_lmoments(&self, lm: &LMoments) -> Result<Distribution>;
}

/// Estimation from the log-transformed, shifted sample.
pub trait LogSampleEstimator: Send + Sync {
    /// Fit from `ln(x - shift)` values and their moments.
    fn estimate_from_log(&self, log: &LogSample) -> Result<Distribution>;
}

/// Estimation from the median and MAD of the log-transformed, shifted sample.
pub trait LogMedianMadEstimator: Send + Sync {
    /// Fit from the median/MAD of `ln(x - shift)`.
    fn estimate_from_log_median_mad(&self, mm: &MedianMad, shift: f64) -> Result<Distribution>;
}

/// Estimation from the raw finite values.
pub trait SampleEstimator: Send + Sync {
    /// Fit from the finite sample values, in sample order.
    fn estimate_from_values(&self, values: &[f64]) -> Result<Distribution>;
}

/// Statistical methodology of an estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Methodology {
    /// Method of moments.
    Moments,
    /// Method of moments on log-shifted values.
    LogMoments,
    /// Median and median absolute deviation.
    MedianMad,
    /// Median and MAD on log-shifted values.
    LogMedianMad,
    /// L-moments.
    LMoments,
    /// Iterative maximum likelihood.
    MaximumLikelihood,
    /// Nonlinear least squares against a density estimate.
    LeastSquares,
    /// Sample extremes.
    MinMax,
}

impl Methodology {
    /// Short name.
    pub fn name(self) -> &'static str {
        match self {
            Methodology::Moments => "MOM",
            Methodology::LogMoments => "LogMOM",
            Methodology::MedianMad => "MAD",
            Methodology::LogMedianMad => "LogMAD",
            Methodology::LMoments => "LMM",
            Methodology::MaximumLikelihood => "MLE",
            Methodology::LeastSquares => "LeastSquares",
            Methodology::MinMax => "MinMax",
        }
    }
}

impl fmt::Display for Methodology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fail with `InvalidParameter` unless every parameter of `dist` is finite
/// and every value in `positive` is finite and `> 0`.
pub(crate) fn checked(dist: Distribution, positive: &[f64]) -> Result<Distribution> {
    if !dist.is_finite() {
        return Err(dfit_core::Error::InvalidParameter(format!("non-finite estimate {}", dist)));
    }
    if let Some(p) = positive.iter().find(|p| !(**p > 0.0)) {
        return Err(dfit_core::Error::InvalidParameter(format!(
            "estimate {} has non-positive parameter {}",
            dist, p
        )));
    }
    Ok(dist)
}
