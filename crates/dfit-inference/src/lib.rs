//! # dfit-inference
//!
//! Distribution parameter estimators for dfit.
//!
//! This crate provides:
//! - Method of moments, on the raw and the log-shifted sample
//! - Median/MAD robust estimators, on the raw and the log-shifted sample
//! - L-moment estimators, including the shape families
//! - Gamma maximum likelihood (Choi-Wette)
//! - A normal least-squares fit against a kernel density estimate
//! - Uniform min/max estimators
//!
//! ## Architecture
//!
//! Every strategy is a unit struct implementing one capability trait from
//! [`estimator`], keyed by the summary statistic it consumes. [`Estimator`]
//! is the flat table over all of them: it computes that summary from a
//! [`dfit_core::SampleView`] and dispatches.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Gamma and log-gamma maximum likelihood after Choi and Wette.
pub mod choi_wette;
/// Capability traits and the methodology tag.
pub mod estimator;
/// Normal fit to a kernel density estimate.
pub mod kde_fit;
/// Levenberg-Marquardt curve fitting.
pub mod levenberg_marquardt;
/// L-moment estimators.
pub mod lmm;
/// Median/MAD estimators on the log-shifted sample.
pub mod log_mad;
/// Method of moments on the log-shifted sample.
pub mod log_mom;
/// Median/MAD estimators.
pub mod mad;
/// Method of moments.
pub mod mom;
/// The flat strategy table.
pub mod registry;
/// Scalar Newton-Raphson refinement.
pub mod solver;
/// Uniform min/max estimators.
pub mod uniform;

pub use estimator::{
    LMomentsEstimator, LogMedianMadEstimator, LogSampleEstimator, MedianMadEstimator, Methodology,
    MomentsEstimator, SampleEstimator,
};
pub use levenberg_marquardt::{
    FittingFunction, GaussianCurve, LevenbergMarquardtConfig, LevenbergMarquardtFit, levenberg_marquardt,
};
pub use registry::{Capability, Estimator};
pub use solver::{NewtonConfig, NewtonOutcome, RefineState, newton_raphson};
