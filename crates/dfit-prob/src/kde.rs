//! Gaussian kernel density estimate evaluated at the sample points.

use dfit_core::{Error, Result};

use crate::moments::MomentAccumulator;
use crate::normal::{FRAC_1_SQRT_2PI, PHI_INV_075, standard_pdf};

/// Integral of the squared Gaussian kernel, `1 / (2√π)`.
const KERNEL_ROUGHNESS: f64 = 0.5 * FRAC_1_SQRT_2PI * std::f64::consts::SQRT_2;

/// KDE bandwidth settings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KdeConfig {
    /// Kernel standard deviation. `None` uses the robust sample scale
    /// `min(s, IQR / 1.349)`.
    pub bandwidth: Option<f64>,
}

/// Density estimate at every point of a sorted sample.
///
/// For data drawn from `N(μ, σ²)` the estimate is centred on `N(μ, σ² + h²)`,
/// where `h` is the kernel bandwidth.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelDensity {
    bandwidth: f64,
    density: Vec<f64>,
    std_error: Vec<f64>,
}

/// `min(s, IQR / 1.349)` of an ascending sample, falling back to `s` when
/// the interquartile range collapses.
fn robust_scale(sorted: &[f64]) -> Result<f64> {
    let n = sorted.len();
    let stddev = MomentAccumulator::from_values(sorted.iter().copied()).sample_stddev()?;
    let iqr = sorted[3 * n / 4] - sorted[n / 4];
    let spread = iqr / (2.0 * PHI_INV_075);
    Ok(if spread > 0.0 { stddev.min(spread) } else { stddev })
}

impl KernelDensity {
    /// Evaluate the density at each element of `sorted` (ascending, finite).
    ///
    /// Pairwise evaluation, `O(n²)`.
    pub fn evaluate(sorted: &[f64], config: &KdeConfig) -> Result<Self> {
        let n = sorted.len();
        if n < 2 {
            return Err(Error::InsufficientData(format!(
                "kernel density needs at least 2 values, got {}",
                n
            )));
        }
        if !(sorted[n - 1] > sorted[0]) {
            return Err(Error::DegenerateSample(
                "kernel density of a zero-range sample".to_string(),
            ));
        }
        let bandwidth = match config.bandwidth {
            Some(h) if !(h > 0.0 && h.is_finite()) => {
                return Err(Error::Validation(format!("KDE bandwidth must be finite and > 0, got {}", h)));
            }
            Some(h) => h,
            None => robust_scale(sorted)?,
        };

        let scale = n as f64 * bandwidth;
        let mut density = Vec::with_capacity(n);
        let mut std_error = Vec::with_capacity(n);
        for &xi in sorted {
            let raw: f64 = sorted.iter().map(|&xj| standard_pdf((xj - xi) / bandwidth)).sum();
            let f = raw / scale;
            density.push(f);
            std_error.push((f * KERNEL_ROUGHNESS / scale).sqrt());
        }
        Ok(Self { bandwidth, density, std_error })
    }

    /// Kernel standard deviation `h`.
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Density at each sample point.
    pub fn density(&self) -> &[f64] {
        &self.density
    }

    /// Asymptotic standard error of each density value, `√(f·R(K) / (n·h))`.
    pub fn std_error(&self) -> &[f64] {
        &self.std_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normal::{pdf, standard_quantile};
    use approx::assert_relative_eq;

    fn normal_grid(n: usize) -> Vec<f64> {
        (0..n).map(|i| standard_quantile((i as f64 + 0.5) / n as f64).unwrap()).collect()
    }

    #[test]
    fn test_bandwidth_selection() {
        let data = normal_grid(400);
        let kde = KernelDensity::evaluate(&data, &KdeConfig { bandwidth: Some(0.05) }).unwrap();
        assert_eq!(kde.bandwidth(), 0.05);

        let stddev = MomentAccumulator::from_values(data.iter().copied()).sample_stddev().unwrap();
        let spread = (data[300] - data[100]) / (2.0 * PHI_INV_075);
        let kde = KernelDensity::evaluate(&data, &KdeConfig::default()).unwrap();
        assert_eq!(kde.bandwidth(), stddev.min(spread));
        assert_relative_eq!(kde.bandwidth(), 1.0, max_relative = 0.02);
    }

    #[test]
    fn test_density_is_smoothed_normal() {
        let data = normal_grid(2000);
        let kde = KernelDensity::evaluate(&data, &KdeConfig { bandwidth: Some(0.5) }).unwrap();
        let width = (1.0f64 + 0.25).sqrt();
        for i in [200, 700, 1000, 1600] {
            assert_relative_eq!(kde.density()[i], pdf(data[i], 0.0, width), max_relative = 1e-2);
        }
    }

    #[test]
    fn test_std_error_scales_with_density() {
        let data = normal_grid(500);
        let kde = KernelDensity::evaluate(&data, &KdeConfig { bandwidth: Some(0.4) }).unwrap();
        for (f, se) in kde.density().iter().zip(kde.std_error()) {
            assert!(*se > 0.0);
            assert_relative_eq!(se * se * 500.0 * 0.4 * 2.0 * std::f64::consts::PI.sqrt(), *f, max_relative = 1e-12);
        }
        // Absolute error shrinks with the density in the tails.
        assert!(kde.std_error()[0] < kde.std_error()[250]);
    }

    #[test]
    fn test_errors() {
        assert!(KernelDensity::evaluate(&[1.0], &KdeConfig::default()).is_err());
        let err = KernelDensity::evaluate(&[2.0, 2.0, 2.0], &KdeConfig::default()).unwrap_err();
        assert_eq!(err.kind(), dfit_core::ErrorKind::DegenerateSample);
        for h in [0.0, -1.0, f64::NAN] {
            let err = KernelDensity::evaluate(&[1.0, 2.0], &KdeConfig { bandwidth: Some(h) }).unwrap_err();
            assert_eq!(err.kind(), dfit_core::ErrorKind::Validation);
        }
    }
}
