//! Special functions and sample statistics for dfit.
//!
//! This crate hosts the sample-side building blocks shared by the estimators:
//! - special functions (digamma/trigamma, gamma, erf, normal quantile)
//! - incremental moments and the log-space shift selector
//! - robust (median/MAD) and order-statistic (L-moment) summaries
//! - a Gaussian kernel density estimate

pub mod kde;
pub mod lmoments;
pub mod math;
pub mod median_mad;
pub mod moments;
pub mod normal;
pub mod shift;

pub use kde::{KdeConfig, KernelDensity};
pub use lmoments::LMoments;
pub use median_mad::MedianMad;
pub use moments::MomentAccumulator;
pub use shift::{LogSample, LogShiftConfig, select_shift};
