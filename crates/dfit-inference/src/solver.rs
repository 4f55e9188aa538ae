//! Bounded scalar Newton-Raphson refinement.
//!
//! Refiners move through [`RefineState`]: `Initial` until the first step,
//! `Iterating` while steps are taken, then exactly one terminal state. Only
//! `Converged` yields a value; the two failure states surface as
//! [`Error::NonConvergence`].

use std::fmt;

use dfit_core::{Error, Result};

/// Refiner lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefineState {
    /// Seeded, no step taken yet.
    Initial,
    /// Steps in progress.
    Iterating,
    /// Step or residual tolerance met.
    Converged,
    /// Iteration budget exhausted before convergence.
    MaxIterExceeded,
    /// An update produced NaN or an infinity.
    NonFiniteStep,
}

impl RefineState {
    /// `true` for the three end states.
    pub fn is_terminal(self) -> bool {
        matches!(self, RefineState::Converged | RefineState::MaxIterExceeded | RefineState::NonFiniteStep)
    }
}

impl fmt::Display for RefineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RefineState::Initial => "initial",
            RefineState::Iterating => "iterating",
            RefineState::Converged => "converged",
            RefineState::MaxIterExceeded => "max iterations exceeded",
            RefineState::NonFiniteStep => "non-finite step",
        };
        f.write_str(s)
    }
}

/// Newton-Raphson settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonConfig {
    /// Maximum number of Newton steps.
    pub max_iter: usize,
    /// Stop when `|x_new - x| <= rel_tol * |x_new|`.
    pub rel_tol: f64,
    /// Also stop when `|residual| <= abs_residual_tol` (0 disables).
    pub abs_residual_tol: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self { max_iter: 100, rel_tol: 1e-8, abs_residual_tol: 0.0 }
    }
}

impl NewtonConfig {
    /// Generalized extreme value shape refinement.
    pub const GEV: Self = Self { max_iter: 20, rel_tol: 1e-20, abs_residual_tol: 0.0 };
    /// Weibull (reflected GEV) shape refinement.
    pub const WEIBULL: Self = Self { max_iter: 20, rel_tol: 1e-14, abs_residual_tol: 0.0 };

    /// Reject settings that could never terminate successfully.
    pub fn validate(&self) -> Result<()> {
        if self.max_iter == 0 {
            return Err(Error::Validation("Newton max_iter must be > 0".to_string()));
        }
        if !(self.rel_tol >= 0.0) || !(self.abs_residual_tol >= 0.0) {
            return Err(Error::Validation(format!(
                "Newton tolerances must be >= 0 (rel_tol={}, abs_residual_tol={})",
                self.rel_tol, self.abs_residual_tol
            )));
        }
        Ok(())
    }
}

/// Converged Newton root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonOutcome {
    /// Root estimate.
    pub root: f64,
    /// Newton steps taken.
    pub iterations: usize,
    /// Terminal state (always `Converged` for a returned outcome).
    pub state: RefineState,
}

/// Find a root of `f` starting at `x0`.
///
/// `f` returns `(residual, derivative)`. `label` only appears in log output
/// and error messages.
pub fn newton_raphson<F>(label: &str, x0: f64, config: &NewtonConfig, mut f: F) -> Result<NewtonOutcome>
where
    F: FnMut(f64) -> (f64, f64),
{
    config.validate()?;
    let mut state = RefineState::Initial;
    let mut x = x0;
    let mut iterations = 0;
    if !x.is_finite() {
        state = RefineState::NonFiniteStep;
    }
    while !state.is_terminal() {
        let (residual, derivative) = f(x);
        if config.abs_residual_tol > 0.0 && residual.abs() <= config.abs_residual_tol {
            state = RefineState::Converged;
            break;
        }
        if iterations == config.max_iter {
            state = RefineState::MaxIterExceeded;
            break;
        }
        state = RefineState::Iterating;
        iterations += 1;
        let next = x - residual / derivative;
        log::trace!("{}: iter {} x={} residual={}", label, iterations, next, residual);
        if !next.is_finite() {
            state = RefineState::NonFiniteStep;
        } else {
            if (next - x).abs() <= config.rel_tol * next.abs() {
                state = RefineState::Converged;
            }
            x = next;
        }
    }

    match state {
        RefineState::Converged => Ok(NewtonOutcome { root: x, iterations, state }),
        _ => {
            log::warn!("{}: Newton refinement stopped after {} steps ({})", label, iterations, state);
            Err(Error::NonConvergence(format!(
                "{}: {} after {} Newton steps (last x={})",
                label, state, iterations, x
            )))
        }
    }
}
