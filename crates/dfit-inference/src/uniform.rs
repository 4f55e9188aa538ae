//! Uniform estimators from the sample extremes.

use dfit_core::{Distribution, Error, Result};
use dfit_prob::MomentAccumulator;

use crate::estimator::{SampleEstimator, checked};

/// Uniform on `[min, max]` of the finite values.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformMinMax;

/// Uniform on the extremes widened by half the mean spacing,
/// `(max - min) / (2(n - 1))`, on each side.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformEnhancedMinMax;

fn extremes(values: &[f64]) -> Result<(f64, f64, usize)> {
    let acc = MomentAccumulator::from_values(values.iter().copied());
    if acc.count() == 0 {
        return Err(Error::InsufficientData("uniform fit needs a finite value".to_string()));
    }
    let (min, max) = (acc.min(), acc.max());
    if !(max > min) {
        return Err(Error::DegenerateSample(format!("uniform fit of a constant sample ({})", min)));
    }
    Ok((min, max, acc.count()))
}

impl SampleEstimator for UniformMinMax {
    fn estimate_from_values(&self, values: &[f64]) -> Result<Distribution> {
        let (min, max, _) = extremes(values)?;
        Ok(Distribution::Uniform { min, max })
    }
}

impl SampleEstimator for UniformEnhancedMinMax {
    fn estimate_from_values(&self, values: &[f64]) -> Result<Distribution> {
        let (min, max, n) = extremes(values)?;
        let grow = (max - min) / (2.0 * (n as f64 - 1.0));
        checked(Distribution::Uniform { min: min - grow, max: max + grow }, &[grow])
    }
}
