//! Special functions used by the estimators.
//!
//! `gamma`, `digamma` and `erf` come from `statrs`; trigamma is implemented
//! here for the Gamma Newton refinements.

pub use statrs::function::erf::erf;
pub use statrs::function::gamma::{digamma, gamma};

/// Euler–Mascheroni constant γ.
pub const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;

/// `ln(2)`.
pub const LN_2: f64 = std::f64::consts::LN_2;

/// `ln(3)`.
pub const LN_3: f64 = 1.098_612_288_668_109_8;

/// Below this argument the pole term dominates trigamma.
const SMALL_ARG: f64 = 1e-5;

/// Above this argument the asymptotic series is accurate to `O(x^-8)`.
const ASYMPTOTIC_ARG: f64 = 49.0;

/// Trigamma function `ψ'(x)` for `x > 0`.
///
/// Uses `ψ'(x) ≈ 1/x²` near zero, the asymptotic series for large `x`, and
/// the recurrence `ψ'(x) = ψ'(x + 1) + 1/x²` in between (Schneider 1978,
/// Algorithm AS 121). Returns NaN for `x <= 0` or NaN input.
pub fn trigamma(x: f64) -> f64 {
    if !(x > 0.0) {
        return f64::NAN;
    }
    if x <= SMALL_ARG {
        return 1.0 / (x * x);
    }
    let mut x = x;
    let mut acc = 0.0;
    while x <= ASYMPTOTIC_ARG {
        acc += 1.0 / (x * x);
        x += 1.0;
    }
    let ix = 1.0 / x;
    let ix2 = ix * ix;
    acc + ix + 0.5 * ix2 + ix2 * ix * (1.0 / 6.0 - ix2 * (1.0 / 30.0 - ix2 / 42.0))
}
