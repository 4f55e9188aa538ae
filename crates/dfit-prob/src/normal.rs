//! Normal distribution utilities.

use dfit_core::{Error, Result};
use statrs::function::erf::erf_inv;

/// `1 / sqrt(2π)`.
pub const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// `Φ⁻¹(0.75)`: the MAD of a standard normal.
pub const PHI_INV_075: f64 = 0.674_489_750_196_081_7;

/// `1 / Φ⁻¹(0.75)`: MAD to standard deviation factor for normal data.
pub const ONE_BY_PHI_INV_075: f64 = 1.482_602_218_505_602;

/// PDF of a Normal distribution `N(mu, sigma)` at `x`. Caller guarantees `sigma > 0`.
#[inline]
pub fn pdf(x: f64, mu: f64, sigma: f64) -> f64 {
    let z = (x - mu) / sigma;
    FRAC_1_SQRT_2PI / sigma * (-0.5 * z * z).exp()
}

/// PDF of the standard normal at `z`.
#[inline]
pub fn standard_pdf(z: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * z * z).exp()
}

/// Standard normal quantile `Φ⁻¹(p)` for `p` in `(0, 1)`.
pub fn standard_quantile(p: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(Error::Validation(format!("probability must be in (0, 1), got {}", p)));
    }
    Ok(std::f64::consts::SQRT_2 * erf_inv(2.0 * p - 1.0))
}
