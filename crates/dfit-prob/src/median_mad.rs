//! Median and median absolute deviation (MAD).
//!
//! Both medians are found by selection (`select_nth_unstable_by`, expected
//! linear time), never by a full sort.

use dfit_core::{Error, Result, SampleView, finite_values};

/// Median and MAD of a sample.
///
/// `mad` is always strictly positive: a zero MAD (more than half of the
/// deviations are zero) is replaced by the smallest strictly positive
/// deviation, or by `1.0` when every value equals the median.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MedianMad {
    /// Sample median.
    pub median: f64,
    /// Median absolute deviation from the median.
    pub mad: f64,
}

impl MedianMad {
    /// Median and MAD of the finite entries of `sample`.
    pub fn from_sample<S: SampleView + ?Sized>(sample: &S) -> Result<Self> {
        let values = finite_values(sample);
        if values.len() < sample.len() {
            log::debug!("median/MAD skipped {} non-finite values", sample.len() - values.len());
        }
        Self::from_values(values)
    }

    /// Median and MAD of an owned buffer. Non-finite values are dropped.
    pub fn from_values(mut values: Vec<f64>) -> Result<Self> {
        values.retain(|x| x.is_finite());
        if values.is_empty() {
            return Err(Error::InsufficientData(
                "median/MAD needs at least one finite value".to_string(),
            ));
        }
        let median = select_median(&mut values);
        for v in values.iter_mut() {
            *v = (*v - median).abs();
        }
        let mut mad = select_median(&mut values);
        if !(mad > 0.0) {
            mad = smallest_positive(&values).unwrap_or(1.0);
            log::debug!("MAD is zero, falling back to {}", mad);
        }
        Ok(Self { median, mad })
    }
}

/// Median by selection; reorders `values`. Even lengths average the two
/// middle order statistics. `values` must be non-empty and NaN free.
pub fn select_median(values: &mut [f64]) -> f64 {
    let n = values.len();
    debug_assert!(n > 0);
    let mid = n / 2;
    let (lower, upper, _) = values.select_nth_unstable_by(mid, f64::total_cmp);
    let upper = *upper;
    if n % 2 == 1 {
        return upper;
    }
    // After selection every element left of `mid` is <= values[mid].
    let lower = lower.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    0.5 * (lower + upper)
}

fn smallest_positive(values: &[f64]) -> Option<f64> {
    values.iter().copied().filter(|&d| d > 0.0).min_by(f64::total_cmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_odd_sample() {
        let mm = MedianMad::from_sample(&[1.0, 2.0, 3.0, 4.0, 5.0][..]).unwrap();
        assert_eq!(mm.median, 3.0);
        assert_eq!(mm.mad, 1.0);
    }

    #[test]
    fn test_unsorted_even_sample() {
        let mm = MedianMad::from_sample(&[4.0, 1.0, 3.0, 2.0][..]).unwrap();
        assert_relative_eq!(mm.median, 2.5, epsilon = 1e-15);
        // deviations 1.5, 1.5, 0.5, 0.5
        assert_relative_eq!(mm.mad, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_constant_sample_falls_back_to_one() {
        let mm = MedianMad::from_sample(&[7.0, 7.0, 7.0, 7.0][..]).unwrap();
        assert_eq!(mm.median, 7.0);
        assert_eq!(mm.mad, 1.0);
    }

    #[test]
    fn test_mostly_tied_sample_uses_smallest_positive_deviation() {
        let mm = MedianMad::from_sample(&[5.0, 5.0, 5.0, 5.0, 5.5, 8.0, 2.0][..]).unwrap();
        assert_eq!(mm.median, 5.0);
        assert_eq!(mm.mad, 0.5);
    }

    #[test]
    fn test_non_finite_skipped() {
        let mm = MedianMad::from_sample(&[f64::NAN, 1.0, 2.0, 3.0, f64::INFINITY][..]).unwrap();
        assert_eq!(mm.median, 2.0);
        assert_eq!(mm.mad, 1.0);
    }

    #[test]
    fn test_empty_is_insufficient() {
        let err = MedianMad::from_sample(&[f64::NAN][..]).unwrap_err();
        assert_eq!(err.kind(), dfit_core::ErrorKind::InsufficientData);
    }

    #[test]
    fn test_select_median_matches_sort() {
        let data: Vec<f64> = (0..101).map(|i| ((i * 37) % 101) as f64 * 0.5 - 3.0).collect();
        let mut sorted = data.clone();
        sorted.sort_by(f64::total_cmp);
        let mut scratch = data.clone();
        assert_eq!(select_median(&mut scratch), sorted[50]);
        let mut even = data[..100].to_vec();
        let mut even_sorted = even.clone();
        even_sorted.sort_by(f64::total_cmp);
        assert_relative_eq!(
            select_median(&mut even),
            0.5 * (even_sorted[49] + even_sorted[50]),
            epsilon = 1e-12
        );
    }
}
