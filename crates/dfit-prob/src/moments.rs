//! Incremental moment accumulation.
//!
//! Mean, second and third central moments are updated one value at a time
//! (Welford 1962; Terriberry's extension to M3), avoiding the catastrophic
//! cancellation of the naive `E[X²] - E[X]²` formula.

use dfit_core::{Error, Result, SampleView, sample_values};

/// Running count, mean, `M2 = Σ(x-mean)²` and `M3 = Σ(x-mean)³`.
///
/// Non-finite values are skipped by [`MomentAccumulator::ingest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentAccumulator {
    count: usize,
    mean: f64,
    m2: f64,
    m3: f64,
    min: f64,
    max: f64,
}

impl Default for MomentAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl MomentAccumulator {
    /// Empty accumulator.
    pub fn new() -> Self {
        Self { count: 0, mean: 0.0, m2: 0.0, m3: 0.0, min: f64::INFINITY, max: f64::NEG_INFINITY }
    }

    /// Accumulate every finite entry of `sample`.
    pub fn from_sample<S: SampleView + ?Sized>(sample: &S) -> Self {
        let mut acc = Self::new();
        for x in sample_values(sample) {
            acc.ingest(x);
        }
        acc
    }

    /// Accumulate every finite value of an iterator.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let mut acc = Self::new();
        for x in values {
            acc.ingest(x);
        }
        acc
    }

    /// Add one value. NaN and ±∞ are skipped.
    pub fn ingest(&mut self, x: f64) {
        if !x.is_finite() {
            return;
        }
        let n1 = self.count as f64;
        self.count += 1;
        let n = self.count as f64;
        let delta = x - self.mean;
        let delta_n = delta / n;
        let term1 = delta * delta_n * n1;
        self.mean += delta_n;
        self.m3 += term1 * delta_n * (n - 2.0) - 3.0 * delta_n * self.m2;
        self.m2 += term1;
        self.min = self.min.min(x);
        self.max = self.max.max(x);
    }

    /// Number of finite values ingested.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Smallest finite value ingested (`+∞` when empty).
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest finite value ingested (`-∞` when empty).
    pub fn max(&self) -> f64 {
        self.max
    }

    fn require(&self, needed: usize, what: &str) -> Result<()> {
        if self.count < needed {
            return Err(Error::InsufficientData(format!(
                "{} needs at least {} finite values, got {}",
                what, needed, self.count
            )));
        }
        Ok(())
    }

    /// Arithmetic mean (count ≥ 1).
    pub fn mean(&self) -> Result<f64> {
        self.require(1, "mean")?;
        Ok(self.mean)
    }

    /// Sample variance with Bessel's correction, `M2 / (n - 1)` (count ≥ 2).
    pub fn sample_variance(&self) -> Result<f64> {
        self.require(2, "sample variance")?;
        Ok(self.m2 / (self.count as f64 - 1.0))
    }

    /// Population variance `M2 / n` (count ≥ 1).
    pub fn population_variance(&self) -> Result<f64> {
        self.require(1, "population variance")?;
        Ok(self.m2 / self.count as f64)
    }

    /// Sample standard deviation (count ≥ 2).
    pub fn sample_stddev(&self) -> Result<f64> {
        self.sample_variance().map(f64::sqrt)
    }

    /// Adjusted Fisher–Pearson sample skewness `G1` (count ≥ 3).
    ///
    /// `G1 = g1 · sqrt(n(n-1)) / (n-2)` with `g1 = sqrt(n)·M3 / M2^{3/2}`.
    pub fn sample_skewness(&self) -> Result<f64> {
        self.require(3, "sample skewness")?;
        if !(self.m2 > 0.0) {
            return Err(Error::DegenerateSample(
                "skewness is undefined for a sample with zero variance".to_string(),
            ));
        }
        let n = self.count as f64;
        let g1 = n.sqrt() * self.m3 / self.m2.powf(1.5);
        Ok(g1 * (n * (n - 1.0)).sqrt() / (n - 2.0))
    }
}
