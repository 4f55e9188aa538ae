//! Normal fit to a kernel density estimate.
//!
//! A Gaussian curve is fitted by Levenberg-Marquardt to the KDE evaluated at
//! each sample point. Since the fit only needs the bulk of the density, it
//! tolerates truncated or partially observed data better than moments do.
//! The KDE is pairwise, so cost is `O(n²)` per call; avoid very large samples.

use dfit_core::{Distribution, Error, Result};
use dfit_prob::median_mad::select_median;
use dfit_prob::{KdeConfig, KernelDensity, MomentAccumulator};

use crate::estimator::{SampleEstimator, checked};
use crate::levenberg_marquardt::{GaussianCurve, LevenbergMarquardtConfig, levenberg_marquardt};

/// Normal `(μ, σ)` by least squares against a Gaussian KDE.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalLevenbergMarquardtKde;

impl NormalLevenbergMarquardtKde {
    /// Fit with explicit KDE and optimizer settings.
    ///
    /// The curve is fitted to the smoothed density, whose width is
    /// `√(σ² + h²)` for bandwidth `h`; the kernel width is removed from the
    /// fitted scale before returning.
    pub fn estimate_with_config(
        &self,
        values: &[f64],
        kde: &KdeConfig,
        lm: &LevenbergMarquardtConfig,
    ) -> Result<Distribution> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
        if sorted.len() < 2 {
            return Err(Error::InsufficientData(format!(
                "KDE fit needs at least 2 finite values, got {}",
                sorted.len()
            )));
        }
        let stddev = MomentAccumulator::from_values(sorted.iter().copied()).sample_stddev()?;
        sorted.sort_unstable_by(f64::total_cmp);
        let density = KernelDensity::evaluate(&sorted, kde)?;
        let h = density.bandwidth();
        let median = select_median(&mut sorted.clone());

        let fit = levenberg_marquardt(
            &GaussianCurve,
            &sorted,
            density.density(),
            density.std_error(),
            &[median, stddev.hypot(h), 1.0],
            &[true, true, false],
            lm,
        )?;
        log::debug!("KDE normal fit (bandwidth {:e}): {}", h, fit);
        let (mu, width) = (fit.params[0], fit.params[1].abs());
        if !(width > h) {
            return Err(Error::DegenerateSample(format!(
                "fitted KDE width {} does not exceed the bandwidth {}",
                width, h
            )));
        }
        let sigma = ((width - h) * (width + h)).sqrt();
        checked(Distribution::Normal { mu, sigma }, &[sigma])
    }
}

impl SampleEstimator for NormalLevenbergMarquardtKde {
    fn estimate_from_values(&self, values: &[f64]) -> Result<Distribution> {
        self.estimate_with_config(values, &KdeConfig::default(), &LevenbergMarquardtConfig::default())
    }
}
