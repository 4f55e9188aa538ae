//! Levenberg-Marquardt nonlinear least squares.
//!
//! Minimises `χ² = Σ ((y_i - f(x_i; p)) / s_i)²` over a subset of the
//! parameters. Each iteration solves the damped normal equations
//! `(JᵀJ + λ·diag(JᵀJ)) δ = Jᵀr` with `nalgebra`; λ shrinks after an accepted
//! step and grows after a rejected one.

use std::fmt;

use dfit_core::{Error, Result};
use nalgebra::{DMatrix, DVector};

use crate::solver::RefineState;

/// Configuration for Levenberg-Marquardt
#[derive(Debug, Clone)]
pub struct LevenbergMarquardtConfig {
    /// Maximum number of accepted or rejected steps.
    pub max_iter: usize,
    /// Initial damping.
    pub lambda_init: f64,
    /// Damping multiplier after a rejected step.
    pub lambda_up: f64,
    /// Damping multiplier after an accepted step.
    pub lambda_down: f64,
    /// Stop (converged) once the damping exceeds this without improvement.
    pub lambda_max: f64,
    /// Stop when an accepted step improves χ² by less than this fraction.
    pub f_rtol: f64,
    /// Stop when every fitted parameter moves by less than this fraction.
    pub x_rtol: f64,
}

impl Default for LevenbergMarquardtConfig {
    fn default() -> Self {
        Self {
            max_iter: 200,
            lambda_init: 1e-3,
            lambda_up: 10.0,
            lambda_down: 0.1,
            lambda_max: 1e12,
            f_rtol: 1e-10,
            x_rtol: 1e-10,
        }
    }
}

/// Result of a Levenberg-Marquardt fit
#[derive(Debug, Clone)]
pub struct LevenbergMarquardtFit {
    /// Best-fit parameters (unfitted ones unchanged).
    pub params: Vec<f64>,
    /// Final χ².
    pub chisq: f64,
    /// Iterations used.
    pub iterations: usize,
    /// Steps that lowered χ². Zero means the seed was returned unchanged.
    pub accepted: usize,
    /// Terminal state.
    pub state: RefineState,
}

impl fmt::Display for LevenbergMarquardtFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LevenbergMarquardtFit(chisq={:.6e}, n_iter={}, accepted={}, state={})",
            self.chisq, self.iterations, self.accepted, self.state
        )
    }
}

/// Model curve fitted by Levenberg-Marquardt.
pub trait FittingFunction {
    /// Model value at `x`.
    fn eval(&self, x: f64, params: &[f64]) -> f64;

    /// Partial derivatives with respect to each parameter (numerical if not overridden).
    fn gradient(&self, x: f64, params: &[f64], grad: &mut [f64]) {
        let mut p = params.to_vec();
        for i in 0..params.len() {
            let eps = 1e-7 * params[i].abs().max(1.0);
            p[i] = params[i] + eps;
            let f_plus = self.eval(x, &p);
            p[i] = params[i] - eps;
            let f_minus = self.eval(x, &p);
            p[i] = params[i];
            grad[i] = (f_plus - f_minus) / (2.0 * eps);
        }
    }
}

/// Gaussian curve `w·φ((x - μ)/σ)/σ` with parameters `[μ, σ, w]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianCurve;

impl FittingFunction for GaussianCurve {
    fn eval(&self, x: f64, params: &[f64]) -> f64 {
        let (mu, sigma, w) = (params[0], params[1], params[2]);
        w * dfit_prob::normal::pdf(x, mu, sigma)
    }

    fn gradient(&self, x: f64, params: &[f64], grad: &mut [f64]) {
        let (mu, sigma, w) = (params[0], params[1], params[2]);
        let z = (x - mu) / sigma;
        let p = dfit_prob::normal::pdf(x, mu, sigma);
        grad[0] = w * p * z / sigma;
        grad[1] = w * p * (z * z - 1.0) / sigma;
        grad[2] = p;
    }
}

/// Fitting problem: data, per-point standard deviations and the fitted mask.
struct Problem<'a, F: FittingFunction + ?Sized> {
    func: &'a F,
    x: &'a [f64],
    y: &'a [f64],
    s: &'a [f64],
    fitted: Vec<usize>,
}

impl<F: FittingFunction + ?Sized> Problem<'_, F> {
    fn chisq(&self, params: &[f64]) -> f64 {
        self.x
            .iter()
            .zip(self.y)
            .zip(self.s)
            .map(|((&x, &y), &s)| {
                let r = (y - self.func.eval(x, params)) / s;
                r * r
            })
            .sum()
    }

    /// `JᵀJ` and `Jᵀr` restricted to the fitted parameters.
    fn normal_equations(&self, params: &[f64]) -> (DMatrix<f64>, DVector<f64>) {
        let m = self.fitted.len();
        let mut alpha = DMatrix::<f64>::zeros(m, m);
        let mut beta = DVector::<f64>::zeros(m);
        let mut grad = vec![0.0; params.len()];
        for ((&x, &y), &s) in self.x.iter().zip(self.y).zip(self.s) {
            self.func.gradient(x, params, &mut grad);
            let w = 1.0 / (s * s);
            let r = y - self.func.eval(x, params);
            for (a, &i) in self.fitted.iter().enumerate() {
                beta[a] += w * r * grad[i];
                for (b, &j) in self.fitted.iter().enumerate().take(a + 1) {
                    alpha[(a, b)] += w * grad[i] * grad[j];
                }
            }
        }
        for a in 0..m {
            for b in 0..a {
                alpha[(b, a)] = alpha[(a, b)];
            }
        }
        (alpha, beta)
    }
}

fn solve_damped(alpha: &DMatrix<f64>, beta: &DVector<f64>, lambda: f64) -> Option<DVector<f64>> {
    let mut damped = alpha.clone();
    for i in 0..damped.nrows() {
        damped[(i, i)] *= 1.0 + lambda;
    }
    match damped.clone().cholesky() {
        Some(chol) => Some(chol.solve(beta)),
        None => damped.lu().solve(beta),
    }
}

fn log_damping_exit(accepted: usize, iterations: usize, chisq: f64) {
    if accepted == 0 {
        log::debug!(
            "Levenberg-Marquardt: damping limit reached with no accepted step after {} iterations; returning the seed (chisq={:e})",
            iterations,
            chisq
        );
    } else {
        log::debug!("Levenberg-Marquardt: damping limit reached after {} accepted steps", accepted);
    }
}

/// Fit `func` to `(x, y)` with per-point standard deviations `s`, starting at
/// `initial`. Only parameters whose `fit_mask` entry is `true` are varied.
pub fn levenberg_marquardt<F: FittingFunction + ?Sized>(
    func: &F,
    x: &[f64],
    y: &[f64],
    s: &[f64],
    initial: &[f64],
    fit_mask: &[bool],
    config: &LevenbergMarquardtConfig,
) -> Result<LevenbergMarquardtFit> {
    if x.is_empty() || x.len() != y.len() || x.len() != s.len() {
        return Err(Error::Validation(format!(
            "Levenberg-Marquardt needs equal, non-empty x/y/s (got {}/{}/{})",
            x.len(),
            y.len(),
            s.len()
        )));
    }
    if fit_mask.len() != initial.len() {
        return Err(Error::Validation(format!(
            "fit mask has {} entries for {} parameters",
            fit_mask.len(),
            initial.len()
        )));
    }
    if s.iter().any(|v| !(*v > 0.0)) {
        return Err(Error::Validation("standard deviations must be > 0".to_string()));
    }
    let fitted: Vec<usize> = fit_mask.iter().enumerate().filter(|(_, f)| **f).map(|(i, _)| i).collect();
    if fitted.is_empty() {
        return Err(Error::Validation("no parameter selected for fitting".to_string()));
    }
    if config.max_iter == 0 || !(config.lambda_up > 1.0) || !(config.lambda_down > 0.0 && config.lambda_down < 1.0) {
        return Err(Error::Validation(format!("invalid Levenberg-Marquardt config {:?}", config)));
    }

    let problem = Problem { func, x, y, s, fitted };
    let mut params = initial.to_vec();
    let mut chisq = problem.chisq(&params);
    if !chisq.is_finite() {
        return Err(Error::NonConvergence(format!("non-finite initial chi-square at {:?}", params)));
    }
    let mut lambda = config.lambda_init;
    let mut state = RefineState::Initial;
    let mut iterations = 0;
    let mut accepted = 0;
    let (mut alpha, mut beta) = problem.normal_equations(&params);

    while !state.is_terminal() {
        if iterations == config.max_iter {
            state = RefineState::MaxIterExceeded;
            break;
        }
        state = RefineState::Iterating;
        iterations += 1;

        let Some(delta) = solve_damped(&alpha, &beta, lambda) else {
            lambda *= config.lambda_up;
            if lambda > config.lambda_max {
                state = RefineState::Converged;
                log_damping_exit(accepted, iterations, chisq);
            }
            continue;
        };
        let mut trial = params.clone();
        for (a, &i) in problem.fitted.iter().enumerate() {
            trial[i] += delta[a];
        }
        if trial.iter().any(|p| !p.is_finite()) {
            state = RefineState::NonFiniteStep;
            break;
        }
        let trial_chisq = problem.chisq(&trial);
        log::trace!("LM iter {}: lambda={:e} chisq={:e} trial={:e}", iterations, lambda, chisq, trial_chisq);

        if trial_chisq < chisq {
            let small_step = problem
                .fitted
                .iter()
                .all(|&i| (trial[i] - params[i]).abs() <= config.x_rtol * trial[i].abs().max(f64::MIN_POSITIVE));
            let small_gain = (chisq - trial_chisq) <= config.f_rtol * chisq;
            params = trial;
            chisq = trial_chisq;
            accepted += 1;
            lambda *= config.lambda_down;
            if small_step || small_gain {
                state = RefineState::Converged;
            } else {
                (alpha, beta) = problem.normal_equations(&params);
            }
        } else {
            lambda *= config.lambda_up;
            // No improvement even for tiny gradient steps: at a minimum.
            if lambda > config.lambda_max {
                state = RefineState::Converged;
                log_damping_exit(accepted, iterations, chisq);
            }
        }
    }

    match state {
        RefineState::Converged => Ok(LevenbergMarquardtFit { params, chisq, iterations, accepted, state }),
        _ => {
            log::warn!("Levenberg-Marquardt stopped after {} iterations ({})", iterations, state);
            Err(Error::NonConvergence(format!(
                "Levenberg-Marquardt: {} after {} iterations (chisq={})",
                state, iterations, chisq
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gaussian_points(mu: f64, sigma: f64, w: f64) -> (Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..81).map(|i| mu - 4.0 * sigma + i as f64 * 0.1 * sigma).collect();
        let y = x.iter().map(|&xi| GaussianCurve.eval(xi, &[mu, sigma, w])).collect();
        (x, y)
    }

    struct NumericGaussian;

    impl FittingFunction for NumericGaussian {
        fn eval(&self, x: f64, params: &[f64]) -> f64 {
            GaussianCurve.eval(x, params)
        }
    }

    #[test]
    fn test_analytic_gradient_matches_numeric() {
        let params = [1.5, 0.7, 2.0];
        for x in [-0.5, 1.0, 1.5, 2.9] {
            let mut analytic = [0.0; 3];
            let mut numeric = [0.0; 3];
            GaussianCurve.gradient(x, &params, &mut analytic);
            NumericGaussian.gradient(x, &params, &mut numeric);
            for (a, n) in analytic.iter().zip(&numeric) {
                assert_relative_eq!(*a, *n, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_recovers_exact_gaussian() {
        let (x, y) = gaussian_points(3.0, 1.5, 1.0);
        let s = vec![1.0; x.len()];
        let fit = levenberg_marquardt(
            &GaussianCurve,
            &x,
            &y,
            &s,
            &[2.5, 2.0, 1.0],
            &[true, true, false],
            &LevenbergMarquardtConfig::default(),
        )
        .unwrap();
        assert_eq!(fit.state, RefineState::Converged);
        assert_relative_eq!(fit.params[0], 3.0, epsilon = 1e-6);
        assert_relative_eq!(fit.params[1], 1.5, epsilon = 1e-6);
        assert_eq!(fit.params[2], 1.0);
        assert!(fit.accepted > 0);
        assert!(fit.to_string().contains("converged"));
    }

    #[test]
    fn test_numeric_gradient_fit_with_all_parameters() {
        let (x, y) = gaussian_points(-1.0, 0.5, 3.0);
        let s = vec![1.0; x.len()];
        let fit = levenberg_marquardt(
            &NumericGaussian,
            &x,
            &y,
            &s,
            &[-0.8, 0.6, 2.0],
            &[true; 3],
            &LevenbergMarquardtConfig::default(),
        )
        .unwrap();
        assert_relative_eq!(fit.params[0], -1.0, epsilon = 1e-5);
        assert_relative_eq!(fit.params[1], 0.5, epsilon = 1e-5);
        assert_relative_eq!(fit.params[2], 3.0, epsilon = 1e-4);
    }

    #[test]
    fn test_seed_at_optimum_reports_no_accepted_step() {
        let (x, y) = gaussian_points(3.0, 1.5, 1.0);
        let s = vec![1.0; x.len()];
        let seed = [3.0, 1.5, 1.0];
        let fit = levenberg_marquardt(
            &GaussianCurve,
            &x,
            &y,
            &s,
            &seed,
            &[true, true, false],
            &LevenbergMarquardtConfig::default(),
        )
        .unwrap();
        assert_eq!(fit.state, RefineState::Converged);
        assert_eq!(fit.accepted, 0);
        assert_eq!(fit.params, seed);
        assert!(fit.to_string().contains("accepted=0"));
    }

    #[test]
    fn test_iteration_budget() {
        let (x, y) = gaussian_points(3.0, 1.5, 1.0);
        let s = vec![1.0; x.len()];
        let config = LevenbergMarquardtConfig { max_iter: 1, ..LevenbergMarquardtConfig::default() };
        let err = levenberg_marquardt(&GaussianCurve, &x, &y, &s, &[1.0, 3.0, 1.0], &[true, true, false], &config)
            .unwrap_err();
        assert_eq!(err.kind(), dfit_core::ErrorKind::NonConvergence);
    }

    #[test]
    fn test_validation() {
        let cfg = LevenbergMarquardtConfig::default();
        assert!(levenberg_marquardt(&GaussianCurve, &[], &[], &[], &[0.0, 1.0, 1.0], &[true; 3], &cfg).is_err());
        assert!(
            levenberg_marquardt(&GaussianCurve, &[1.0], &[1.0], &[1.0], &[0.0, 1.0, 1.0], &[false; 3], &cfg).is_err()
        );
        assert!(
            levenberg_marquardt(&GaussianCurve, &[1.0], &[1.0], &[0.0], &[0.0, 1.0, 1.0], &[true; 3], &cfg).is_err()
        );
    }
}
