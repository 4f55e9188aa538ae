//! The strategy table.
//!
//! [`Estimator`] enumerates every estimation strategy. Each variant knows its
//! name, methodology and family, computes the summary its strategy consumes
//! and dispatches to the strategy's capability trait.

use std::fmt;

use dfit_core::{Distribution, Family, Result, SampleView, finite_values};
use dfit_prob::{LMoments, LogSample, LogShiftConfig, MedianMad, MomentAccumulator};

use crate::choi_wette::{GammaChoiWette, LogGammaChoiWette};
use crate::estimator::{
    LMomentsEstimator, LogMedianMadEstimator, LogSampleEstimator, MedianMadEstimator, Methodology,
    MomentsEstimator, SampleEstimator,
};
use crate::kde_fit::NormalLevenbergMarquardtKde;
use crate::lmm::{
    ExponentialLmm, GammaLmm, GeneralizedExtremeValueLmm, GeneralizedLogisticAlternateLmm, GeneralizedParetoLmm,
    GumbelLmm, LaplaceLmm, LogNormalBilkovaLmm, LogNormalLmm, LogisticLmm, NormalLmm, RayleighLmm, SkewGNormalLmm,
    UniformLmm, WeibullLmm,
};
use crate::log_mad::{LogGammaLogMad, LogNormalLogMad, WeibullLogMad};
use crate::log_mom::{LogGammaLogMom, LogNormalLogMom, WeibullLogMom};
use crate::mad::{
    CauchyMad, ExponentialMad, ExponentialMedian, GammaMad, GumbelMad, LaplaceMad, LogLogisticMad, LogisticMad,
    NormalMad, RayleighMad, UniformMad,
};
use crate::mom::{EmgOlivierNorberg, ExponentialMom, GammaMom, InverseGaussianMom, NormalMom};
use crate::uniform::{UniformEnhancedMinMax, UniformMinMax};

/// Every estimation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Estimator {
    NormalMom,
    GammaMom,
    ExponentialMom,
    InverseGaussianMom,
    EmgOlivierNorberg,
    LogNormalLogMom,
    LogGammaLogMom,
    WeibullLogMom,
    NormalMad,
    GammaMad,
    ExponentialMad,
    ExponentialMedian,
    LaplaceMad,
    GumbelMad,
    CauchyMad,
    LogisticMad,
    LogLogisticMad,
    RayleighMad,
    UniformMad,
    LogNormalLogMad,
    LogGammaLogMad,
    WeibullLogMad,
    NormalLmm,
    ExponentialLmm,
    GumbelLmm,
    LogisticLmm,
    LaplaceLmm,
    UniformLmm,
    RayleighLmm,
    GammaLmm,
    GeneralizedExtremeValueLmm,
    WeibullLmm,
    GeneralizedParetoLmm,
    GeneralizedLogisticAlternateLmm,
    SkewGNormalLmm,
    LogNormalLmm,
    LogNormalBilkovaLmm,
    GammaChoiWette,
    LogGammaChoiWette,
    NormalLevenbergMarquardtKde,
    UniformMinMax,
    UniformEnhancedMinMax,
}

/// The summary statistic a strategy consumes, with the strategy itself.
#[derive(Clone, Copy)]
pub enum Capability {
    /// Mean, variance, skewness.
    Moments(&'static dyn MomentsEstimator),
    /// Median and MAD.
    MedianMad(&'static dyn MedianMadEstimator),
    /// L-moments.
    LMoments(&'static dyn LMomentsEstimator),
    /// Log-shifted sample.
    LogSample(&'static dyn LogSampleEstimator),
    /// Median and MAD of the log-shifted sample.
    LogMedianMad(&'static dyn LogMedianMadEstimator),
    /// Raw finite values.
    Sample(&'static dyn SampleEstimator),
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Capability::Moments(_) => "Moments",
            Capability::MedianMad(_) => "MedianMad",
            Capability::LMoments(_) => "LMoments",
            Capability::LogSample(_) => "LogSample",
            Capability::LogMedianMad(_) => "LogMedianMad",
            Capability::Sample(_) => "Sample",
        };
        f.write_str(kind)
    }
}

impl Estimator {
    /// All strategies, in table order.
    pub const ALL: [Estimator; 42] = [
        Estimator::NormalMom,
        Estimator::GammaMom,
        Estimator::ExponentialMom,
        Estimator::InverseGaussianMom,
        Estimator::EmgOlivierNorberg,
        Estimator::LogNormalLogMom,
        Estimator::LogGammaLogMom,
        Estimator::WeibullLogMom,
        Estimator::NormalMad,
        Estimator::GammaMad,
        Estimator::ExponentialMad,
        Estimator::ExponentialMedian,
        Estimator::LaplaceMad,
        Estimator::GumbelMad,
        Estimator::CauchyMad,
        Estimator::LogisticMad,
        Estimator::LogLogisticMad,
        Estimator::RayleighMad,
        Estimator::UniformMad,
        Estimator::LogNormalLogMad,
        Estimator::LogGammaLogMad,
        Estimator::WeibullLogMad,
        Estimator::NormalLmm,
        Estimator::ExponentialLmm,
        Estimator::GumbelLmm,
        Estimator::LogisticLmm,
        Estimator::LaplaceLmm,
        Estimator::UniformLmm,
        Estimator::RayleighLmm,
        Estimator::GammaLmm,
        Estimator::GeneralizedExtremeValueLmm,
        Estimator::WeibullLmm,
        Estimator::GeneralizedParetoLmm,
        Estimator::GeneralizedLogisticAlternateLmm,
        Estimator::SkewGNormalLmm,
        Estimator::LogNormalLmm,
        Estimator::LogNormalBilkovaLmm,
        Estimator::GammaChoiWette,
        Estimator::LogGammaChoiWette,
        Estimator::NormalLevenbergMarquardtKde,
        Estimator::UniformMinMax,
        Estimator::UniformEnhancedMinMax,
    ];

    /// Display name, e.g. `"GammaMOM"`.
    pub fn name(self) -> &'static str {
        match self {
            Estimator::NormalMom => "NormalMOM",
            Estimator::GammaMom => "GammaMOM",
            Estimator::ExponentialMom => "ExponentialMOM",
            Estimator::InverseGaussianMom => "InverseGaussianMOM",
            Estimator::EmgOlivierNorberg => "EMGOlivierNorberg",
            Estimator::LogNormalLogMom => "LogNormalLogMOM",
            Estimator::LogGammaLogMom => "LogGammaLogMOM",
            Estimator::WeibullLogMom => "WeibullLogMOM",
            Estimator::NormalMad => "NormalMAD",
            Estimator::GammaMad => "GammaMAD",
            Estimator::ExponentialMad => "ExponentialMAD",
            Estimator::ExponentialMedian => "ExponentialMedian",
            Estimator::LaplaceMad => "LaplaceMAD",
            Estimator::GumbelMad => "GumbelMAD",
            Estimator::CauchyMad => "CauchyMAD",
            Estimator::LogisticMad => "LogisticMAD",
            Estimator::LogLogisticMad => "LogLogisticMAD",
            Estimator::RayleighMad => "RayleighMAD",
            Estimator::UniformMad => "UniformMAD",
            Estimator::LogNormalLogMad => "LogNormalLogMAD",
            Estimator::LogGammaLogMad => "LogGammaLogMAD",
            Estimator::WeibullLogMad => "WeibullLogMAD",
            Estimator::NormalLmm => "NormalLMM",
            Estimator::ExponentialLmm => "ExponentialLMM",
            Estimator::GumbelLmm => "GumbelLMM",
            Estimator::LogisticLmm => "LogisticLMM",
            Estimator::LaplaceLmm => "LaplaceLMM",
            Estimator::UniformLmm => "UniformLMM",
            Estimator::RayleighLmm => "RayleighLMM",
            Estimator::GammaLmm => "GammaLMM",
            Estimator::GeneralizedExtremeValueLmm => "GeneralizedExtremeValueLMM",
            Estimator::WeibullLmm => "WeibullLMM",
            Estimator::GeneralizedParetoLmm => "GeneralizedParetoLMM",
            Estimator::GeneralizedLogisticAlternateLmm => "GeneralizedLogisticAlternateLMM",
            Estimator::SkewGNormalLmm => "SkewGNormalLMM",
            Estimator::LogNormalLmm => "LogNormalLMM",
            Estimator::LogNormalBilkovaLmm => "LogNormalBilkovaLMM",
            Estimator::GammaChoiWette => "GammaChoiWette",
            Estimator::LogGammaChoiWette => "LogGammaChoiWette",
            Estimator::NormalLevenbergMarquardtKde => "NormalLevenbergMarquardtKDE",
            Estimator::UniformMinMax => "UniformMinMax",
            Estimator::UniformEnhancedMinMax => "UniformEnhancedMinMax",
        }
    }

    /// Look up a strategy by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Estimator> {
        Self::ALL.iter().copied().find(|e| e.name() == name)
    }

    /// Family of the returned [`Distribution`].
    pub fn family(self) -> Family {
        match self {
            Estimator::NormalMom
            | Estimator::NormalMad
            | Estimator::NormalLmm
            | Estimator::NormalLevenbergMarquardtKde => Family::Normal,
            Estimator::GammaMom | Estimator::GammaMad | Estimator::GammaLmm | Estimator::GammaChoiWette => {
                Family::Gamma
            }
            Estimator::ExponentialMom
            | Estimator::ExponentialMad
            | Estimator::ExponentialMedian
            | Estimator::ExponentialLmm => Family::Exponential,
            Estimator::InverseGaussianMom => Family::InverseGaussian,
            Estimator::EmgOlivierNorberg => Family::ExponentiallyModifiedGaussian,
            Estimator::LogNormalLogMom
            | Estimator::LogNormalLogMad
            | Estimator::LogNormalLmm
            | Estimator::LogNormalBilkovaLmm => Family::LogNormal,
            Estimator::LogGammaLogMom
            | Estimator::LogGammaLogMad
            | Estimator::LogGammaChoiWette => Family::LogGamma,
            Estimator::WeibullLogMom | Estimator::WeibullLogMad | Estimator::WeibullLmm => Family::Weibull,
            Estimator::LaplaceMad | Estimator::LaplaceLmm => Family::Laplace,
            Estimator::GumbelMad | Estimator::GumbelLmm => Family::Gumbel,
            Estimator::CauchyMad => Family::Cauchy,
            Estimator::LogisticMad | Estimator::LogisticLmm => Family::Logistic,
            Estimator::LogLogisticMad => Family::LogLogistic,
            Estimator::RayleighMad | Estimator::RayleighLmm => Family::Rayleigh,
            Estimator::UniformMad
            | Estimator::UniformLmm
            | Estimator::UniformMinMax
            | Estimator::UniformEnhancedMinMax => Family::Uniform,
            Estimator::GeneralizedExtremeValueLmm => Family::GeneralizedExtremeValue,
            Estimator::GeneralizedParetoLmm => Family::GeneralizedPareto,
            Estimator::GeneralizedLogisticAlternateLmm => Family::GeneralizedLogisticAlternate,
            Estimator::SkewGNormalLmm => Family::SkewGeneralizedNormal,
        }
    }

    /// Statistical methodology.
    pub fn methodology(self) -> Methodology {
        match self.capability() {
            Capability::Moments(_) => Methodology::Moments,
            Capability::MedianMad(_) => Methodology::MedianMad,
            Capability::LMoments(_) => Methodology::LMoments,
            Capability::LogMedianMad(_) => Methodology::LogMedianMad,
            Capability::LogSample(_) => match self {
                Estimator::LogGammaChoiWette => Methodology::MaximumLikelihood,
                _ => Methodology::LogMoments,
            },
            Capability::Sample(_) => match self {
                Estimator::GammaChoiWette => Methodology::MaximumLikelihood,
                Estimator::NormalLevenbergMarquardtKde => Methodology::LeastSquares,
                _ => Methodology::MinMax,
            },
        }
    }

    /// The strategy behind this entry.
    pub fn capability(self) -> Capability {
        match self {
            Estimator::NormalMom => Capability::Moments(&NormalMom),
            Estimator::GammaMom => Capability::Moments(&GammaMom),
            Estimator::ExponentialMom => Capability::Moments(&ExponentialMom),
            Estimator::InverseGaussianMom => Capability::Moments(&InverseGaussianMom),
            Estimator::EmgOlivierNorberg => Capability::Moments(&EmgOlivierNorberg),
            Estimator::LogNormalLogMom => Capability::LogSample(&LogNormalLogMom),
            Estimator::LogGammaLogMom => Capability::LogSample(&LogGammaLogMom),
            Estimator::WeibullLogMom => Capability::LogSample(&WeibullLogMom),
            Estimator::NormalMad => Capability::MedianMad(&NormalMad),
            Estimator::GammaMad => Capability::MedianMad(&GammaMad),
            Estimator::ExponentialMad => Capability::MedianMad(&ExponentialMad),
            Estimator::ExponentialMedian => Capability::MedianMad(&ExponentialMedian),
            Estimator::LaplaceMad => Capability::MedianMad(&LaplaceMad),
            Estimator::GumbelMad => Capability::MedianMad(&GumbelMad),
            Estimator::CauchyMad => Capability::MedianMad(&CauchyMad),
            Estimator::LogisticMad => Capability::MedianMad(&LogisticMad),
            Estimator::LogLogisticMad => Capability::MedianMad(&LogLogisticMad),
            Estimator::RayleighMad => Capability::MedianMad(&RayleighMad),
            Estimator::UniformMad => Capability::MedianMad(&UniformMad),
            Estimator::LogNormalLogMad => Capability::LogMedianMad(&LogNormalLogMad),
            Estimator::LogGammaLogMad => Capability::LogMedianMad(&LogGammaLogMad),
            Estimator::WeibullLogMad => Capability::LogMedianMad(&WeibullLogMad),
            Estimator::NormalLmm => Capability::LMoments(&NormalLmm),
            Estimator::ExponentialLmm => Capability::LMoments(&ExponentialLmm),
            Estimator::GumbelLmm => Capability::LMoments(&GumbelLmm),
            Estimator::LogisticLmm => Capability::LMoments(&LogisticLmm),
            Estimator::LaplaceLmm => Capability::LMoments(&LaplaceLmm),
            Estimator::UniformLmm => Capability::LMoments(&UniformLmm),
            Estimator::RayleighLmm => Capability::LMoments(&RayleighLmm),
            Estimator::GammaLmm => Capability::LMoments(&GammaLmm),
            Estimator::GeneralizedExtremeValueLmm => Capability::LMoments(&GeneralizedExtremeValueLmm),
            Estimator::WeibullLmm => Capability::LMoments(&WeibullLmm),
            Estimator::GeneralizedParetoLmm => Capability::LMoments(&GeneralizedParetoLmm),
            Estimator::GeneralizedLogisticAlternateLmm => Capability::LMoments(&GeneralizedLogisticAlternateLmm),
            Estimator::SkewGNormalLmm => Capability::LMoments(&SkewGNormalLmm),
            Estimator::LogNormalLmm => Capability::LMoments(&LogNormalLmm),
            Estimator::LogNormalBilkovaLmm => Capability::LMoments(&LogNormalBilkovaLmm),
            Estimator::GammaChoiWette => Capability::Sample(&GammaChoiWette),
            Estimator::LogGammaChoiWette => Capability::LogSample(&LogGammaChoiWette),
            Estimator::NormalLevenbergMarquardtKde => Capability::Sample(&NormalLevenbergMarquardtKde),
            Estimator::UniformMinMax => Capability::Sample(&UniformMinMax),
            Estimator::UniformEnhancedMinMax => Capability::Sample(&UniformEnhancedMinMax),
        }
    }

    /// Estimate distribution parameters from `sample`.
    ///
    /// Non-finite entries are skipped. Fails with the strategy's specific
    /// error rather than returning a partial result.
    pub fn estimate<S: SampleView + ?Sized>(self, sample: &S) -> Result<Distribution> {
        log::debug!("{}: estimating from {} values", self.name(), sample.len());
        let result = match self.capability() {
            Capability::Moments(e) => e.estimate_from_moments(&MomentAccumulator::from_sample(sample)),
            Capability::MedianMad(e) => e.estimate_from_median_mad(&MedianMad::from_sample(sample)?),
            Capability::LMoments(e) => e.estimate_from_lmoments(&LMoments::from_sample(sample, e.num_moments())?),
            Capability::LogSample(e) => e.estimate_from_log(&LogSample::from_sample(sample, &LogShiftConfig::default())?),
            Capability::LogMedianMad(e) => {
                let log = LogSample::from_sample(sample, &LogShiftConfig::default())?;
                let mm = MedianMad::from_values(log.logs().to_vec())?;
                e.estimate_from_log_median_mad(&mm, log.shift())
            }
            Capability::Sample(e) => e.estimate_from_values(&finite_values(sample)),
        };
        if let Err(err) = &result {
            log::debug!("{}: {}", self.name(), err);
        }
        result
    }
}

impl fmt::Display for Estimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
