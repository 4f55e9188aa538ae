//! Median/MAD estimators on log-shifted samples.

use dfit_core::{Distribution, Result};
use dfit_prob::MedianMad;
use dfit_prob::math::LN_2;
use dfit_prob::normal::ONE_BY_PHI_INV_075;

use crate::estimator::{LogMedianMadEstimator, checked};
use crate::mad::gamma_from_median_mad;

/// MAD of the standard Gumbel (minimum), the law of `k·ln(X/λ)` for Weibull `X`.
const GUMBEL_MAD: f64 = 0.767_049_251_325_708;

/// Three-parameter lognormal: normal median/MAD fit of the logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNormalLogMad;

/// Log-gamma: Gamma median/MAD fit of the logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogGammaLogMad;

/// Three-parameter Weibull from the median/MAD of the logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeibullLogMad;

impl LogMedianMadEstimator for LogNormalLogMad {
    fn estimate_from_log_median_mad(&self, mm: &MedianMad, shift: f64) -> Result<Distribution> {
        let logsigma = ONE_BY_PHI_INV_075 * mm.mad;
        checked(Distribution::LogNormal { logmu: mm.median, logsigma, shift }, &[logsigma])
    }
}

impl LogMedianMadEstimator for LogGammaLogMad {
    fn estimate_from_log_median_mad(&self, mm: &MedianMad, shift: f64) -> Result<Distribution> {
        let (k, theta) = gamma_from_median_mad(mm.median, mm.mad)?;
        checked(Distribution::LogGamma { k, theta, shift }, &[k, theta])
    }
}

impl LogMedianMadEstimator for WeibullLogMad {
    fn estimate_from_log_median_mad(&self, mm: &MedianMad, shift: f64) -> Result<Distribution> {
        let k = GUMBEL_MAD / mm.mad;
        // median of ln X is ln λ + ln(ln 2)/k
        let lambda = (mm.median - LN_2.ln() / k).exp();
        checked(Distribution::Weibull { k, lambda, theta: shift }, &[k, lambda])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lognormal_log_mad() {
        let mm = MedianMad { median: 0.5, mad: 2.0 };
        let d = LogNormalLogMad.estimate_from_log_median_mad(&mm, -1.0).unwrap();
        assert_eq!(d, Distribution::LogNormal { logmu: 0.5, logsigma: 2.0 * ONE_BY_PHI_INV_075, shift: -1.0 });
    }

    #[test]
    fn test_weibull_log_mad_on_exact_quantiles() {
        // For Weibull(k, λ), ln X = ln λ + G/k with G standard Gumbel (minimum).
        let (k, lambda): (f64, f64) = (1.7, 4.0);
        let median = lambda.ln() + LN_2.ln() / k;
        let mad = GUMBEL_MAD / k;
        let d = WeibullLogMad.estimate_from_log_median_mad(&MedianMad { median, mad }, 0.0).unwrap();
        let Distribution::Weibull { k: kh, lambda: lh, theta } = d else { panic!("expected Weibull") };
        assert_relative_eq!(kh, k, epsilon = 1e-12);
        assert_relative_eq!(lh, lambda, epsilon = 1e-12);
        assert_eq!(theta, 0.0);
    }

    #[test]
    fn test_gumbel_min_mad_constant() {
        // CDF of G = ln(E), E ~ Exp(1): 1 - exp(-e^g); median ln(ln 2).
        let cdf = |g: f64| 1.0 - (-(g.exp())).exp();
        let m = LN_2.ln();
        assert_relative_eq!(cdf(m + GUMBEL_MAD) - cdf(m - GUMBEL_MAD), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_log_gamma_log_mad_carries_shift() {
        let mm = MedianMad { median: 2.0, mad: 0.5 };
        let Distribution::LogGamma { k, theta, shift } =
            LogGammaLogMad.estimate_from_log_median_mad(&mm, -3.0).unwrap()
        else {
            panic!("expected log-gamma")
        };
        assert!(k > 0.0 && theta > 0.0);
        assert_eq!(shift, -3.0);
    }
}
