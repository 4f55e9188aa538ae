//! Common data types for dfit

use std::fmt;

use crate::{Error, Result};

/// Distribution family tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Normal (Gaussian).
    Normal,
    /// Three-parameter lognormal (`ln(x - shift) ~ Normal`).
    LogNormal,
    /// Gamma, shape/rate.
    Gamma,
    /// Log-gamma (`ln(x - shift) ~ Gamma`).
    LogGamma,
    /// Shifted exponential.
    Exponential,
    /// Laplace (double exponential).
    Laplace,
    /// Gumbel (maximum).
    Gumbel,
    /// Logistic.
    Logistic,
    /// Log-logistic (Fisk).
    LogLogistic,
    /// Generalized logistic, Hosking's parameterization.
    GeneralizedLogisticAlternate,
    /// Generalized extreme value, Hosking's parameterization.
    GeneralizedExtremeValue,
    /// Generalized Pareto.
    GeneralizedPareto,
    /// Rayleigh with location.
    Rayleigh,
    /// Three-parameter Weibull.
    Weibull,
    /// Continuous uniform.
    Uniform,
    /// Cauchy.
    Cauchy,
    /// Skew generalized normal (Hosking's generalized normal).
    SkewGeneralizedNormal,
    /// Inverse Gaussian (Wald).
    InverseGaussian,
    /// Exponentially modified Gaussian.
    ExponentiallyModifiedGaussian,
}

impl Family {
    /// Every family, in declaration order.
    pub const ALL: [Family; 19] = [
        Family::Normal,
        Family::LogNormal,
        Family::Gamma,
        Family::LogGamma,
        Family::Exponential,
        Family::Laplace,
        Family::Gumbel,
        Family::Logistic,
        Family::LogLogistic,
        Family::GeneralizedLogisticAlternate,
        Family::GeneralizedExtremeValue,
        Family::GeneralizedPareto,
        Family::Rayleigh,
        Family::Weibull,
        Family::Uniform,
        Family::Cauchy,
        Family::SkewGeneralizedNormal,
        Family::InverseGaussian,
        Family::ExponentiallyModifiedGaussian,
    ];

    /// Family name.
    pub fn name(self) -> &'static str {
        match self {
            Family::Normal => "Normal",
            Family::LogNormal => "LogNormal",
            Family::Gamma => "Gamma",
            Family::LogGamma => "LogGamma",
            Family::Exponential => "Exponential",
            Family::Laplace => "Laplace",
            Family::Gumbel => "Gumbel",
            Family::Logistic => "Logistic",
            Family::LogLogistic => "LogLogistic",
            Family::GeneralizedLogisticAlternate => "GeneralizedLogisticAlternate",
            Family::GeneralizedExtremeValue => "GeneralizedExtremeValue",
            Family::GeneralizedPareto => "GeneralizedPareto",
            Family::Rayleigh => "Rayleigh",
            Family::Weibull => "Weibull",
            Family::Uniform => "Uniform",
            Family::Cauchy => "Cauchy",
            Family::SkewGeneralizedNormal => "SkewGeneralizedNormal",
            Family::InverseGaussian => "InverseGaussian",
            Family::ExponentiallyModifiedGaussian => "ExponentiallyModifiedGaussian",
        }
    }

    /// Parameter names, in the order of [`Distribution::params`].
    pub fn parameter_names(self) -> &'static [&'static str] {
        match self {
            Family::Normal => &["mu", "sigma"],
            Family::LogNormal => &["logmu", "logsigma", "shift"],
            Family::Gamma => &["k", "theta"],
            Family::LogGamma => &["k", "theta", "shift"],
            Family::Exponential => &["rate", "location"],
            Family::Laplace => &["rate", "location"],
            Family::Gumbel => &["mu", "beta"],
            Family::Logistic => &["location", "scale"],
            Family::LogLogistic => &["scale", "shape", "location"],
            Family::GeneralizedLogisticAlternate => &["location", "scale", "shape"],
            Family::GeneralizedExtremeValue => &["mu", "sigma", "k"],
            Family::GeneralizedPareto => &["mu", "sigma", "xi"],
            Family::Rayleigh => &["mu", "sigma"],
            Family::Weibull => &["k", "lambda", "theta"],
            Family::Uniform => &["min", "max"],
            Family::Cauchy => &["location", "shape"],
            Family::SkewGeneralizedNormal => &["mu", "sigma", "skew"],
            Family::InverseGaussian => &["mu", "shape"],
            Family::ExponentiallyModifiedGaussian => &["mu", "sigma", "lambda"],
        }
    }

    /// Number of parameters.
    pub fn n_parameters(self) -> usize {
        self.parameter_names().len()
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Estimated distribution: family tag plus its parameter record.
///
/// Values are produced once per successful estimation and never mutated.
/// Consumers pattern-match on the variant, or use [`Distribution::family`] and
/// [`Distribution::params`] to hand the tuple to an evaluation component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distribution {
    /// `N(mu, sigma)`.
    Normal {
        /// Mean.
        mu: f64,
        /// Standard deviation.
        sigma: f64,
    },
    /// `ln(x - shift) ~ N(logmu, logsigma)`.
    LogNormal {
        /// Mean of the log.
        logmu: f64,
        /// Standard deviation of the log.
        logsigma: f64,
        /// Additive shift.
        shift: f64,
    },
    /// Gamma with shape `k` and rate `theta` (inverse scale): mean `k/theta`.
    Gamma {
        /// Shape.
        k: f64,
        /// Rate (inverse scale).
        theta: f64,
    },
    /// `ln(x - shift) ~ Gamma(k, theta)` with `theta` a rate.
    LogGamma {
        /// Shape.
        k: f64,
        /// Rate (inverse scale).
        theta: f64,
        /// Additive shift.
        shift: f64,
    },
    /// Exponential with `rate`, starting at `location`.
    Exponential {
        /// Rate.
        rate: f64,
        /// Location (lower bound of the support).
        location: f64,
    },
    /// Laplace with `rate = 1/scale` around `location`.
    Laplace {
        /// Rate (inverse scale).
        rate: f64,
        /// Location.
        location: f64,
    },
    /// Gumbel (maximum).
    Gumbel {
        /// Mode.
        mu: f64,
        /// Scale.
        beta: f64,
    },
    /// Logistic.
    Logistic {
        /// Location.
        location: f64,
        /// Scale.
        scale: f64,
    },
    /// Log-logistic: `F(x) = 1 / (1 + ((x - location)/scale)^-shape)`.
    LogLogistic {
        /// Scale (median of `x - location`).
        scale: f64,
        /// Shape.
        shape: f64,
        /// Location.
        location: f64,
    },
    /// Generalized logistic (Hosking), `shape = 0` is the logistic.
    GeneralizedLogisticAlternate {
        /// Location.
        location: f64,
        /// Scale.
        scale: f64,
        /// Shape.
        shape: f64,
    },
    /// GEV (Hosking sign convention): `F(x) = exp(-(1 - k(x - mu)/sigma)^(1/k))`.
    GeneralizedExtremeValue {
        /// Location.
        mu: f64,
        /// Scale.
        sigma: f64,
        /// Shape, `0` is the Gumbel limit.
        k: f64,
    },
    /// Generalized Pareto: `F(x) = 1 - (1 + xi(x - mu)/sigma)^(-1/xi)`.
    GeneralizedPareto {
        /// Location.
        mu: f64,
        /// Scale.
        sigma: f64,
        /// Shape.
        xi: f64,
    },
    /// Rayleigh with location.
    Rayleigh {
        /// Location.
        mu: f64,
        /// Scale.
        sigma: f64,
    },
    /// Weibull with shape `k`, scale `lambda` and location `theta`.
    Weibull {
        /// Shape.
        k: f64,
        /// Scale.
        lambda: f64,
        /// Location.
        theta: f64,
    },
    /// Continuous uniform on `[min, max]`.
    Uniform {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// Cauchy.
    Cauchy {
        /// Location (median).
        location: f64,
        /// Scale (half width at half maximum).
        shape: f64,
    },
    /// Hosking's generalized normal.
    SkewGeneralizedNormal {
        /// Location.
        mu: f64,
        /// Scale.
        sigma: f64,
        /// Skew (shape), `0` is the normal.
        skew: f64,
    },
    /// Inverse Gaussian.
    InverseGaussian {
        /// Mean.
        mu: f64,
        /// Shape.
        shape: f64,
    },
    /// Exponentially modified Gaussian.
    ExponentiallyModifiedGaussian {
        /// Mean of the Gaussian component.
        mu: f64,
        /// Standard deviation of the Gaussian component.
        sigma: f64,
        /// Rate of the exponential component.
        lambda: f64,
    },
}

impl Distribution {
    /// Family tag of this distribution.
    pub fn family(&self) -> Family {
        match self {
            Distribution::Normal { .. } => Family::Normal,
            Distribution::LogNormal { .. } => Family::LogNormal,
            Distribution::Gamma { .. } => Family::Gamma,
            Distribution::LogGamma { .. } => Family::LogGamma,
            Distribution::Exponential { .. } => Family::Exponential,
            Distribution::Laplace { .. } => Family::Laplace,
            Distribution::Gumbel { .. } => Family::Gumbel,
            Distribution::Logistic { .. } => Family::Logistic,
            Distribution::LogLogistic { .. } => Family::LogLogistic,
            Distribution::GeneralizedLogisticAlternate { .. } => {
                Family::GeneralizedLogisticAlternate
            }
            Distribution::GeneralizedExtremeValue { .. } => Family::GeneralizedExtremeValue,
            Distribution::GeneralizedPareto { .. } => Family::GeneralizedPareto,
            Distribution::Rayleigh { .. } => Family::Rayleigh,
            Distribution::Weibull { .. } => Family::Weibull,
            Distribution::Uniform { .. } => Family::Uniform,
            Distribution::Cauchy { .. } => Family::Cauchy,
            Distribution::SkewGeneralizedNormal { .. } => Family::SkewGeneralizedNormal,
            Distribution::InverseGaussian { .. } => Family::InverseGaussian,
            Distribution::ExponentiallyModifiedGaussian { .. } => {
                Family::ExponentiallyModifiedGaussian
            }
        }
    }

    /// Parameters in the order given by [`Family::parameter_names`].
    pub fn params(&self) -> Vec<f64> {
        match *self {
            Distribution::Normal { mu, sigma } => vec![mu, sigma],
            Distribution::LogNormal { logmu, logsigma, shift } => vec![logmu, logsigma, shift],
            Distribution::Gamma { k, theta } => vec![k, theta],
            Distribution::LogGamma { k, theta, shift } => vec![k, theta, shift],
            Distribution::Exponential { rate, location } => vec![rate, location],
            Distribution::Laplace { rate, location } => vec![rate, location],
            Distribution::Gumbel { mu, beta } => vec![mu, beta],
            Distribution::Logistic { location, scale } => vec![location, scale],
            Distribution::LogLogistic { scale, shape, location } => vec![scale, shape, location],
            Distribution::GeneralizedLogisticAlternate { location, scale, shape } => {
                vec![location, scale, shape]
            }
            Distribution::GeneralizedExtremeValue { mu, sigma, k } => vec![mu, sigma, k],
            Distribution::GeneralizedPareto { mu, sigma, xi } => vec![mu, sigma, xi],
            Distribution::Rayleigh { mu, sigma } => vec![mu, sigma],
            Distribution::Weibull { k, lambda, theta } => vec![k, lambda, theta],
            Distribution::Uniform { min, max } => vec![min, max],
            Distribution::Cauchy { location, shape } => vec![location, shape],
            Distribution::SkewGeneralizedNormal { mu, sigma, skew } => vec![mu, sigma, skew],
            Distribution::InverseGaussian { mu, shape } => vec![mu, shape],
            Distribution::ExponentiallyModifiedGaussian { mu, sigma, lambda } => {
                vec![mu, sigma, lambda]
            }
        }
    }

    /// Rebuild a distribution from a family tag and an ordered parameter tuple.
    pub fn from_params(family: Family, params: &[f64]) -> Result<Self> {
        let n = family.n_parameters();
        if params.len() != n {
            return Err(Error::Validation(format!(
                "{} expects {} parameters, got {}",
                family,
                n,
                params.len()
            )));
        }
        let p = params;
        Ok(match family {
            Family::Normal => Distribution::Normal { mu: p[0], sigma: p[1] },
            Family::LogNormal => {
                Distribution::LogNormal { logmu: p[0], logsigma: p[1], shift: p[2] }
            }
            Family::Gamma => Distribution::Gamma { k: p[0], theta: p[1] },
            Family::LogGamma => Distribution::LogGamma { k: p[0], theta: p[1], shift: p[2] },
            Family::Exponential => Distribution::Exponential { rate: p[0], location: p[1] },
            Family::Laplace => Distribution::Laplace { rate: p[0], location: p[1] },
            Family::Gumbel => Distribution::Gumbel { mu: p[0], beta: p[1] },
            Family::Logistic => Distribution::Logistic { location: p[0], scale: p[1] },
            Family::LogLogistic => {
                Distribution::LogLogistic { scale: p[0], shape: p[1], location: p[2] }
            }
            Family::GeneralizedLogisticAlternate => Distribution::GeneralizedLogisticAlternate {
                location: p[0],
                scale: p[1],
                shape: p[2],
            },
            Family::GeneralizedExtremeValue => {
                Distribution::GeneralizedExtremeValue { mu: p[0], sigma: p[1], k: p[2] }
            }
            Family::GeneralizedPareto => {
                Distribution::GeneralizedPareto { mu: p[0], sigma: p[1], xi: p[2] }
            }
            Family::Rayleigh => Distribution::Rayleigh { mu: p[0], sigma: p[1] },
            Family::Weibull => Distribution::Weibull { k: p[0], lambda: p[1], theta: p[2] },
            Family::Uniform => Distribution::Uniform { min: p[0], max: p[1] },
            Family::Cauchy => Distribution::Cauchy { location: p[0], shape: p[1] },
            Family::SkewGeneralizedNormal => {
                Distribution::SkewGeneralizedNormal { mu: p[0], sigma: p[1], skew: p[2] }
            }
            Family::InverseGaussian => Distribution::InverseGaussian { mu: p[0], shape: p[1] },
            Family::ExponentiallyModifiedGaussian => {
                Distribution::ExponentiallyModifiedGaussian { mu: p[0], sigma: p[1], lambda: p[2] }
            }
        })
    }

    /// `true` when every parameter is finite.
    pub fn is_finite(&self) -> bool {
        self.params().iter().all(|p| p.is_finite())
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let family = self.family();
        write!(f, "{}(", family)?;
        for (i, (name, value)) in family.parameter_names().iter().zip(self.params()).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        f.write_str(")")
    }
}
