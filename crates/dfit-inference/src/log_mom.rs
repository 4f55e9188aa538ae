//! Method-of-moments estimators on log-shifted samples.
//!
//! The sample is shifted so every finite value is strictly positive
//! ([`LogSample`]); the moments of `ln(x - shift)` are then fitted, and the
//! shift is reported as a parameter of the result.

use dfit_core::{Distribution, Error, Result};
use dfit_prob::LogSample;

use crate::estimator::{LogSampleEstimator, checked};
use crate::mom::gamma_from_mean_variance;

/// Three-parameter lognormal from the mean and standard deviation of the logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNormalLogMom;

/// Log-gamma from the Gamma moment equations applied to the logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogGammaLogMom;

/// Three-parameter Weibull from a least-squares Weibull probability plot of
/// the shifted values.
///
/// Median ranks use Bernard's approximation `(i - 0.3) / (n + 0.4)`. This is
/// a regression fit rather than a true moment match, and is biased on small
/// samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeibullLogMom;

impl LogSampleEstimator for LogNormalLogMom {
    fn estimate_from_log(&self, log: &LogSample) -> Result<Distribution> {
        let logmu = log.moments().mean()?;
        let logsigma = log.moments().sample_stddev()?;
        if logsigma == 0.0 {
            return Err(Error::DegenerateSample("log values have zero variance".to_string()));
        }
        checked(Distribution::LogNormal { logmu, logsigma, shift: log.shift() }, &[logsigma])
    }
}

impl LogSampleEstimator for LogGammaLogMom {
    fn estimate_from_log(&self, log: &LogSample) -> Result<Distribution> {
        let (k, theta) =
            gamma_from_mean_variance(log.moments().mean()?, log.moments().sample_variance()?)?;
        Ok(Distribution::LogGamma { k, theta, shift: log.shift() })
    }
}

impl LogSampleEstimator for WeibullLogMom {
    fn estimate_from_log(&self, log: &LogSample) -> Result<Distribution> {
        let n = log.logs().len();
        if n < 2 {
            return Err(Error::InsufficientData(format!(
                "Weibull plot regression needs at least 2 values, got {}",
                n
            )));
        }
        let mut xs = log.logs().to_vec();
        xs.sort_unstable_by(f64::total_cmp);
        let nf = n as f64;
        let ys: Vec<f64> = (0..n)
            .map(|i| {
                let f = (i as f64 + 0.7) / (nf + 0.4);
                (-(1.0 - f).ln()).ln()
            })
            .collect();

        let mean_x = xs.iter().sum::<f64>() / nf;
        let mean_y = ys.iter().sum::<f64>() / nf;
        let (mut sxx, mut sxy) = (0.0, 0.0);
        for (x, y) in xs.iter().zip(&ys) {
            sxx += (x - mean_x) * (x - mean_x);
            sxy += (x - mean_x) * (y - mean_y);
        }
        if !(sxx > 0.0) {
            return Err(Error::DegenerateSample("log values have zero variance".to_string()));
        }
        // y = k·ln(x - shift) - k·ln(λ)
        let k = sxy / sxx;
        let intercept = mean_y - k * mean_x;
        let lambda = (-intercept / k).exp();
        checked(Distribution::Weibull { k, lambda, theta: log.shift() }, &[k, lambda])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dfit_prob::LogShiftConfig;

    fn log_sample(data: &[f64]) -> LogSample {
        LogSample::from_sample(data, &LogShiftConfig::default()).unwrap()
    }

    #[test]
    fn test_lognormal_log_mom() {
        let e = std::f64::consts::E;
        let d = LogNormalLogMom.estimate_from_log(&log_sample(&[1.0, e, e * e])).unwrap();
        let Distribution::LogNormal { logmu, logsigma, shift } = d else { panic!("expected lognormal") };
        assert_relative_eq!(logmu, 1.0, epsilon = 1e-14);
        assert_relative_eq!(logsigma, 1.0, epsilon = 1e-14);
        assert_eq!(shift, 0.0);
    }

    #[test]
    fn test_lognormal_log_mom_shifts_non_positive_samples() {
        let d = LogNormalLogMom.estimate_from_log(&log_sample(&[-4.0, -1.0, 0.0, 2.0, 5.0])).unwrap();
        let Distribution::LogNormal { shift, .. } = d else { panic!("expected lognormal") };
        assert!(shift < -4.0);
        assert!(d.is_finite());
    }

    #[test]
    fn test_log_gamma_log_mom() {
        let data: Vec<f64> = [1.5, 2.0, 3.0, 4.5, 7.0, 12.0].iter().map(|l: &f64| l.exp()).collect();
        let ls = log_sample(&data);
        let Distribution::LogGamma { k, theta, shift } = LogGammaLogMom.estimate_from_log(&ls).unwrap()
        else {
            panic!("expected log-gamma")
        };
        assert_eq!(shift, 0.0);
        assert_relative_eq!(k / theta, ls.moments().mean().unwrap(), epsilon = 1e-12);
    }

    #[test]
    fn test_log_gamma_log_mom_rejects_negative_log_mean() {
        let err = LogGammaLogMom.estimate_from_log(&log_sample(&[0.1, 0.2, 0.3])).unwrap_err();
        assert_eq!(err.kind(), dfit_core::ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_weibull_plot_known_approximate_exact_on_rank_quantiles() {
        // Known-approximate on random data; exact Weibull(k=2, λ=3) quantiles
        // at Bernard's ranks lie on the plot line.
        let n = 50;
        let data: Vec<f64> = (0..n)
            .map(|i| {
                let f = (i as f64 + 0.7) / (n as f64 + 0.4);
                3.0 * (-(1.0 - f).ln()).powf(0.5)
            })
            .collect();
        let d = WeibullLogMom.estimate_from_log(&log_sample(&data)).unwrap();
        let Distribution::Weibull { k, lambda, theta } = d else { panic!("expected Weibull") };
        assert_relative_eq!(k, 2.0, epsilon = 1e-10);
        assert_relative_eq!(lambda, 3.0, epsilon = 1e-10);
        assert_eq!(theta, 0.0);
    }

    #[test]
    fn test_weibull_plot_needs_two_values() {
        let err = WeibullLogMom.estimate_from_log(&log_sample(&[2.0])).unwrap_err();
        assert_eq!(err.kind(), dfit_core::ErrorKind::InsufficientData);
    }
}
