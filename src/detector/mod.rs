use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::error::PitchError;
use crate::float::{from_f64, Float};

use self::autocorrelation::AutocorrelationDetector;
use self::mcleod::McLeodDetector;
use self::yin::YINDetector;
use self::zero_crossing::ZeroCrossingDetector;

pub mod autocorrelation;
pub mod internals;
pub mod mcleod;
pub mod yin;
pub mod zero_crossing;

/// A monophonic pitch estimator. Implementations hold only their
/// configuration, so the same detector can be shared between streams and
/// called from several threads at once.
pub trait PitchDetector<T>
where
    T: Float,
{
    /// Estimate the fundamental frequency of `signal` in Hz, or `None` if no
    /// periodicity was found.
    fn get_pitch(&self, signal: &[T], sample_rate: usize) -> Option<T>;
}

/// The detection strategies a pipeline can be built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Zero-crossing rate
    Zcr,
    /// Autocorrelation
    Acf,
    Yin,
    /// McLeod pitch method
    Mpm,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [Algorithm::Zcr, Algorithm::Acf, Algorithm::Yin, Algorithm::Mpm];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Zcr => "zcr",
            Algorithm::Acf => "acf",
            Algorithm::Yin => "yin",
            Algorithm::Mpm => "mpm",
        }
    }

    /// The shortest period, in samples, the algorithm may report.
    pub fn min_lag(&self, sample_rate: usize) -> usize {
        match self {
            Algorithm::Acf => autocorrelation::min_period(sample_rate),
            Algorithm::Zcr | Algorithm::Yin | Algorithm::Mpm => 1,
        }
    }

    /// Frames must cover at least two periods of the shortest lag, plus the
    /// neighbours needed to refine it.
    pub fn minimum_frame_size(&self, sample_rate: usize) -> usize {
        2 * (self.min_lag(sample_rate) + 2)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = PitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .iter()
            .copied()
            .find(|algorithm| algorithm.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PitchError::UnknownAlgorithm(s.to_string()))
    }
}

/// One of the four detectors, picked once when a pipeline is built.
#[derive(Debug, Clone)]
pub enum Detector<T>
where
    T: Float,
{
    ZeroCrossing(ZeroCrossingDetector),
    Autocorrelation(AutocorrelationDetector<T>),
    Yin(YINDetector<T>),
    McLeod(McLeodDetector<T>),
}

impl<T> Detector<T>
where
    T: Float,
{
    /// Build the detector selected by `config.algorithm` with its own thresholds.
    pub fn from_config(config: &PipelineConfig) -> Self {
        let thresholds = &config.thresholds;
        match config.algorithm {
            Algorithm::Zcr => Detector::ZeroCrossing(ZeroCrossingDetector),
            Algorithm::Acf => Detector::Autocorrelation(AutocorrelationDetector::new(from_f64(
                thresholds.acf,
            ))),
            Algorithm::Yin => Detector::Yin(YINDetector::new(from_f64(thresholds.yin))),
            Algorithm::Mpm => Detector::McLeod(McLeodDetector::with_tolerance(
                from_f64(thresholds.mpm),
                from_f64(thresholds.mpm_peak_tolerance),
            )),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            Detector::ZeroCrossing(_) => Algorithm::Zcr,
            Detector::Autocorrelation(_) => Algorithm::Acf,
            Detector::Yin(_) => Algorithm::Yin,
            Detector::McLeod(_) => Algorithm::Mpm,
        }
    }
}

impl<T> PitchDetector<T> for Detector<T>
where
    T: Float,
{
    fn get_pitch(&self, signal: &[T], sample_rate: usize) -> Option<T> {
        match self {
            Detector::ZeroCrossing(detector) => detector.get_pitch(signal, sample_rate),
            Detector::Autocorrelation(detector) => detector.get_pitch(signal, sample_rate),
            Detector::Yin(detector) => detector.get_pitch(signal, sample_rate),
            Detector::McLeod(detector) => detector.get_pitch(signal, sample_rate),
        }
    }
}
