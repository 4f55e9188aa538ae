//! Sample L-moments from unbiased probability-weighted moments.
//!
//! Reference: J. R. M. Hosking, "L-moments: analysis and estimation of
//! distributions using linear combinations of order statistics",
//! J. Royal Statistical Society B 52 (1990).

use dfit_core::{Error, Result, SampleView, finite_values};

/// Sample L-moments `λ1, λ2` and ratios `τ3..τk`.
#[derive(Debug, Clone, PartialEq)]
pub struct LMoments {
    // [λ1, λ2, τ3, ..., τk]
    values: Vec<f64>,
}

impl LMoments {
    /// L-moments of order `1..=nmom` of the finite entries of `sample`.
    ///
    /// Fails with `Validation` if `nmom < 2` and `InsufficientData` if fewer
    /// than `nmom` finite values remain.
    pub fn from_sample<S: SampleView + ?Sized>(sample: &S, nmom: usize) -> Result<Self> {
        let mut sorted = finite_values(sample);
        sorted.sort_unstable_by(f64::total_cmp);
        Self::from_sorted(&sorted, nmom)
    }

    /// L-moments of an ascending, finite slice.
    pub fn from_sorted(sorted: &[f64], nmom: usize) -> Result<Self> {
        if nmom < 2 {
            return Err(Error::Validation(format!(
                "L-moments need at least order 2, got {}",
                nmom
            )));
        }
        let n = sorted.len();
        if n < nmom {
            return Err(Error::InsufficientData(format!(
                "{} L-moments need at least {} finite values, got {}",
                nmom, nmom, n
            )));
        }
        debug_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));

        // b_j = n^-1 Σ_i x_(i) · C(i, j) / C(n-1, j), i zero based.
        let mut b = vec![0.0; nmom];
        for (i, &x) in sorted.iter().enumerate() {
            let mut term = x;
            b[0] += term;
            let mut z = i as f64;
            for bj in b.iter_mut().skip(1) {
                term *= z;
                *bj += term;
                z -= 1.0;
            }
        }
        let nf = n as f64;
        b[0] /= nf;
        let mut denom = nf;
        for (j, bj) in b.iter_mut().enumerate().skip(1) {
            denom *= nf - j as f64;
            *bj /= denom;
        }

        let mut values = pwm_to_lmoments(&b);
        let l2 = values[1];
        for tau in values.iter_mut().skip(2) {
            *tau = if l2 == 0.0 { 0.0 } else { *tau / l2 };
        }
        Ok(Self { values })
    }

    /// Number of moments computed.
    pub fn num_moments(&self) -> usize {
        self.values.len()
    }

    /// First L-moment (the mean).
    pub fn l1(&self) -> f64 {
        self.values[0]
    }

    /// Second L-moment (half the mean absolute pairwise difference).
    pub fn l2(&self) -> f64 {
        self.values[1]
    }

    /// L-moment ratio `τr = λr / λ2` for `r ≥ 3`, if computed.
    pub fn ratio(&self, r: usize) -> Option<f64> {
        if r < 3 { None } else { self.values.get(r - 1).copied() }
    }

    /// L-skewness `τ3`.
    pub fn t3(&self) -> Result<f64> {
        self.ratio(3).ok_or_else(|| {
            Error::Validation("L-skewness requested but only 2 L-moments were computed".to_string())
        })
    }

    /// L-kurtosis `τ4`, if computed.
    pub fn t4(&self) -> Option<f64> {
        self.ratio(4)
    }
}

/// `λ_{k+1} = Σ_i p*_{k,i} b_i` with the shifted Legendre coefficients
/// `p*_{k,i} = (-1)^{k-i} C(k,i) C(k+i,i)`.
fn pwm_to_lmoments(b: &[f64]) -> Vec<f64> {
    let mut out = b.to_vec();
    for k in 1..b.len() {
        let kf = k as f64;
        let mut p = if k % 2 == 0 { 1.0 } else { -1.0 };
        let mut acc = p * b[0];
        for i in 0..k {
            let ai = i as f64 + 1.0;
            p *= -(kf + ai) * (kf - i as f64) / (ai * ai);
            acc += p * b[i + 1];
        }
        out[k] = acc;
    }
    out
}
