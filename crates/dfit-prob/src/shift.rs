//! Shift selection for log-space estimation.
//!
//! Log-space estimators fit `ln(x - shift)`. The shift is chosen just below
//! the sample minimum so that every finite value stays strictly positive after
//! shifting, and the logarithm is never evaluated on a non-positive argument.

use dfit_core::{Error, Result, SampleView, sample_values};

use crate::moments::MomentAccumulator;

/// Default margin, as a fraction of the sample range.
pub const DEFAULT_MARGIN: f64 = 1e-10;

/// Shift selector settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogShiftConfig {
    /// If the sample minimum exceeds this value, it is used as the shift.
    pub min_allowed: f64,
    /// Gap kept below the minimum, as a fraction of `max - min`.
    pub margin: f64,
}

impl Default for LogShiftConfig {
    fn default() -> Self {
        Self { min_allowed: 0.0, margin: DEFAULT_MARGIN }
    }
}

/// Choose an additive shift so that `x - shift > 0` for every finite `x`.
///
/// Single pass for the finite min/max. If `min > min_allowed` the shift is
/// `min_allowed`; otherwise it is `min - margin·(max - min)`. A zero range
/// uses `max(|min|, 1)` as the span, and the gap never falls below a few ULPs
/// of `min`, so the shifted minimum is strictly positive even when
/// `margin·(max - min)` would be absorbed by rounding.
///
/// Returns `InsufficientData` if the sample has no finite value.
pub fn select_shift<S: SampleView + ?Sized>(sample: &S, config: &LogShiftConfig) -> Result<f64> {
    if !(config.margin > 0.0) || !config.margin.is_finite() {
        return Err(Error::Validation(format!(
            "shift margin must be finite and > 0, got {}",
            config.margin
        )));
    }
    let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
    for x in sample_values(sample).filter(|x| x.is_finite()) {
        min = min.min(x);
        max = max.max(x);
    }
    if min > max {
        return Err(Error::InsufficientData("shift selection needs a finite value".to_string()));
    }
    if min > config.min_allowed {
        return Ok(config.min_allowed);
    }
    let span = if max > min { max - min } else { min.abs().max(1.0) };
    let gap = (config.margin * span).max(4.0 * f64::EPSILON * min.abs()).max(f64::MIN_POSITIVE);
    let mut shift = min - gap;
    // Rounding can still land the shift on `min` for huge magnitudes.
    while !(min - shift > 0.0) {
        shift = shift - gap.max(f64::EPSILON * shift.abs());
    }
    Ok(shift)
}

/// Natural logs of the strictly positive shifted values of a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSample {
    shift: f64,
    logs: Vec<f64>,
    moments: MomentAccumulator,
}

impl LogSample {
    /// Select a shift with `config`, then log-transform every finite value.
    ///
    /// Shifted values that are not strictly positive are dropped before the
    /// logarithm is taken.
    pub fn from_sample<S: SampleView + ?Sized>(sample: &S, config: &LogShiftConfig) -> Result<Self> {
        let shift = select_shift(sample, config)?;
        Self::with_shift(sample, shift)
    }

    /// Log-transform every finite value of `sample` shifted by `shift`.
    pub fn with_shift<S: SampleView + ?Sized>(sample: &S, shift: f64) -> Result<Self> {
        let mut logs = Vec::with_capacity(sample.len());
        let mut moments = MomentAccumulator::new();
        let mut skipped = 0usize;
        for x in sample_values(sample) {
            let shifted = x - shift;
            if !(shifted > 0.0) || !shifted.is_finite() {
                skipped += 1;
                continue;
            }
            let lx = shifted.ln();
            logs.push(lx);
            moments.ingest(lx);
        }
        if skipped > 0 {
            log::debug!("log transform skipped {} non-positive or non-finite values", skipped);
        }
        if logs.is_empty() {
            return Err(Error::InsufficientData(format!(
                "no value remains strictly positive after shifting by {}",
                shift
            )));
        }
        Ok(Self { shift, logs, moments })
    }

    /// Additive shift that was subtracted before taking logs.
    pub fn shift(&self) -> f64 {
        self.shift
    }

    /// Log values, in sample order.
    pub fn logs(&self) -> &[f64] {
        &self.logs
    }

    /// Moments of the log values.
    pub fn moments(&self) -> &MomentAccumulator {
        &self.moments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_positive_sample_uses_allowed_minimum() {
        let shift = select_shift(&[0.5, 2.0, 3.0][..], &LogShiftConfig::default()).unwrap();
        assert_eq!(shift, 0.0);
    }

    #[test]
    fn test_non_positive_minimum_shifts_below_min() {
        let data = [-2.0, 0.0, 3.0, 8.0];
        let shift = select_shift(&data[..], &LogShiftConfig::default()).unwrap();
        assert_relative_eq!(shift, -2.0 - 1e-10 * 10.0, epsilon = 1e-15);
        assert!(data.iter().all(|x| x - shift > 0.0));
    }

    #[test]
    fn test_constant_non_positive_sample() {
        let data = [-3.0; 4];
        let shift = select_shift(&data[..], &LogShiftConfig::default()).unwrap();
        assert!(-3.0 - shift > 0.0);
    }

    #[test]
    fn test_huge_magnitude_minimum_stays_positive() {
        let data = [-1e12, -1e12 + 1e-3];
        let shift = select_shift(&data[..], &LogShiftConfig::default()).unwrap();
        assert!(data.iter().all(|x| x - shift > 0.0));
    }

    #[test]
    fn test_custom_allowed_minimum() {
        let config = LogShiftConfig { min_allowed: 1.0, margin: DEFAULT_MARGIN };
        assert_eq!(select_shift(&[2.0, 3.0][..], &config).unwrap(), 1.0);
        let shift = select_shift(&[0.5, 3.0][..], &config).unwrap();
        assert!(shift < 0.5);
    }

    #[test]
    fn test_no_finite_values() {
        let err = select_shift(&[f64::NAN][..], &LogShiftConfig::default()).unwrap_err();
        assert_eq!(err.kind(), dfit_core::ErrorKind::InsufficientData);
    }

    #[test]
    fn test_log_sample_filters_and_logs() {
        let data = [f64::NAN, 1.0, std::f64::consts::E, f64::INFINITY];
        let ls = LogSample::from_sample(&data[..], &LogShiftConfig::default()).unwrap();
        assert_eq!(ls.shift(), 0.0);
        assert_eq!(ls.logs().len(), 2);
        assert_relative_eq!(ls.moments().mean().unwrap(), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_log_sample_with_non_positive_minimum_is_finite() {
        let data = [-5.0, -1.0, 0.0, 2.0, 9.0];
        let ls = LogSample::from_sample(&data[..], &LogShiftConfig::default()).unwrap();
        assert_eq!(ls.logs().len(), data.len());
        assert!(ls.logs().iter().all(|l| l.is_finite()));
    }

    proptest! {
        #[test]
        fn prop_every_finite_value_survives_the_shift(
            data in proptest::collection::vec(proptest::num::f64::ANY, 1..60),
        ) {
            let finite: Vec<f64> = data.iter().copied().filter(|x| x.is_finite() && x.abs() < 1e300).collect();
            prop_assume!(!finite.is_empty());
            let ls = LogSample::from_sample(&finite, &LogShiftConfig::default()).unwrap();
            prop_assert_eq!(ls.logs().len(), finite.len());
            prop_assert!(ls.logs().iter().all(|l| l.is_finite()));
        }
    }
}
