//! Error types for dfit

use std::fmt;

use thiserror::Error;

/// dfit error type
///
/// Every estimation failure is terminal for the call that produced it. Callers
/// decide whether to retry with a different estimator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Sample too small for the requested moment order
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A required statistic (mean, median, MAD, variance, L2) is zero
    #[error("Degenerate sample: {0}")]
    DegenerateSample(String),

    /// An L-moment ratio falls outside the domain of the target family
    #[error("Invalid moment ratio: {0}")]
    InvalidMomentRatio(String),

    /// An iterative refiner exhausted its budget or produced a non-finite update
    #[error("Non-convergence: {0}")]
    NonConvergence(String),

    /// Derived parameters are non-positive or non-finite
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Caller misuse: bad configuration, bad moment order, wrong tuple arity
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Discriminant of [`Error`], without the reason string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::InsufficientData`].
    InsufficientData,
    /// See [`Error::DegenerateSample`].
    DegenerateSample,
    /// See [`Error::InvalidMomentRatio`].
    InvalidMomentRatio,
    /// See [`Error::NonConvergence`].
    NonConvergence,
    /// See [`Error::InvalidParameter`].
    InvalidParameter,
    /// See [`Error::Validation`].
    Validation,
}

impl Error {
    /// Error kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InsufficientData(_) => ErrorKind::InsufficientData,
            Error::DegenerateSample(_) => ErrorKind::DegenerateSample,
            Error::InvalidMomentRatio(_) => ErrorKind::InvalidMomentRatio,
            Error::NonConvergence(_) => ErrorKind::NonConvergence,
            Error::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Error::Validation(_) => ErrorKind::Validation,
        }
    }

    /// Human-readable reason, without the kind prefix.
    pub fn reason(&self) -> &str {
        match self {
            Error::InsufficientData(s)
            | Error::DegenerateSample(s)
            | Error::InvalidMomentRatio(s)
            | Error::NonConvergence(s)
            | Error::InvalidParameter(s)
            | Error::Validation(s) => s,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InsufficientData => "insufficient data",
            ErrorKind::DegenerateSample => "degenerate sample",
            ErrorKind::InvalidMomentRatio => "invalid moment ratio",
            ErrorKind::NonConvergence => "non-convergence",
            ErrorKind::InvalidParameter => "invalid parameter",
            ErrorKind::Validation => "validation",
        };
        f.write_str(name)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
