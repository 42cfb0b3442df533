//! Pipeline configuration.
//!
//! Every field has a default, so a JSON config only needs the values it changes:
//!
//! ```
//! use pitch_tracker::config::PipelineConfig;
//! use pitch_tracker::detector::Algorithm;
//!
//! let config = PipelineConfig::from_json_str(r#"{ "algorithm": "mpm", "gate": { "min_rms": 0.01 } }"#).unwrap();
//! assert_eq!(config.algorithm, Algorithm::Mpm);
//! assert_eq!(config.gate.min_rms, 0.01);
//! assert_eq!(config.gate.hysteresis, 0.8);
//! assert_eq!(config.frame_size, 2048);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detector::{autocorrelation, mcleod, yin, Algorithm};
use crate::error::{PitchError, PitchResult};

pub const DEFAULT_SAMPLE_RATE: usize = 48000;
pub const DEFAULT_FRAME_SIZE: usize = 2048;
pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

/// Amplitude gate thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// RMS level above which a closed gate opens.
    pub min_rms: f64,
    /// An open gate closes below `min_rms * hysteresis`.
    pub hysteresis: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        GateConfig {
            min_rms: 0.005,
            hysteresis: 0.8,
        }
    }
}

/// Per-algorithm thresholds. They live on different scales (a correlation
/// ratio, a normalized difference, an NSDF value), so each is set on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub acf: f64,
    pub yin: f64,
    pub mpm: f64,
    pub mpm_peak_tolerance: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            acf: autocorrelation::DEFAULT_THRESHOLD,
            yin: yin::DEFAULT_THRESHOLD,
            mpm: mcleod::DEFAULT_THRESHOLD,
            mpm_peak_tolerance: mcleod::DEFAULT_PEAK_TOLERANCE,
        }
    }
}

/// Frequencies outside this band are reported as out of range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyBand {
    pub min_hz: f64,
    pub max_hz: f64,
}

impl Default for FrequencyBand {
    fn default() -> Self {
        FrequencyBand {
            min_hz: 50.0,
            max_hz: 2000.0,
        }
    }
}

impl FrequencyBand {
    pub fn contains(&self, frequency: f64) -> bool {
        frequency >= self.min_hz && frequency <= self.max_hz
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub algorithm: Algorithm,
    pub sample_rate: usize,
    pub frame_size: usize,
    /// History length of the median smoother; `0` disables smoothing.
    pub smoothing_window: usize,
    pub gate: GateConfig,
    pub thresholds: Thresholds,
    pub band: FrequencyBand,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            algorithm: Algorithm::Yin,
            sample_rate: DEFAULT_SAMPLE_RATE,
            frame_size: DEFAULT_FRAME_SIZE,
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
            gate: GateConfig::default(),
            thresholds: Thresholds::default(),
            band: FrequencyBand::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> PitchResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PitchResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn smoothing_enabled(&self) -> bool {
        self.smoothing_window > 0
    }

    /// Check everything a pipeline needs before it sees its first frame.
    pub fn validate(&self) -> PitchResult<()> {
        if self.sample_rate == 0 {
            return Err(PitchError::InvalidSampleRate(self.sample_rate));
        }
        if self.frame_size == 0 {
            return Err(PitchError::InvalidFrameSize(self.frame_size));
        }
        let minimum = self.algorithm.minimum_frame_size(self.sample_rate);
        if self.frame_size < minimum {
            return Err(PitchError::FrameTooShort {
                algorithm: self.algorithm,
                frame_size: self.frame_size,
                minimum,
            });
        }
        if self.smoothing_window == 1 {
            return Err(PitchError::InvalidSmoothingWindow(self.smoothing_window));
        }

        let GateConfig {
            min_rms,
            hysteresis,
        } = self.gate;
        if !(min_rms.is_finite() && min_rms >= 0.0 && hysteresis > 0.0 && hysteresis <= 1.0) {
            return Err(PitchError::InvalidGate {
                min_rms,
                hysteresis,
            });
        }

        let thresholds = [
            ("acf", self.thresholds.acf),
            ("yin", self.thresholds.yin),
            ("mpm", self.thresholds.mpm),
        ];
        if let Some((name, value)) = thresholds.into_iter().find(|(_, value)| !value.is_finite()) {
            return Err(PitchError::InvalidThreshold { name, value });
        }
        let tolerance = self.thresholds.mpm_peak_tolerance;
        if !(tolerance > 0.0 && tolerance <= 1.0) {
            return Err(PitchError::InvalidThreshold {
                name: "mpm_peak_tolerance",
                value: tolerance,
            });
        }

        let FrequencyBand { min_hz, max_hz } = self.band;
        if !(min_hz > 0.0 && min_hz < max_hz && max_hz.is_finite()) {
            return Err(PitchError::InvalidFrequencyRange {
                min: min_hz,
                max: max_hz,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.smoothing_enabled());
        assert_eq!(config.thresholds.yin, 0.1);
        assert_eq!(config.thresholds.mpm, 0.1);
        assert_eq!(config.thresholds.acf, 0.3);
    }

    #[test]
    fn rejects_zero_sample_rate_and_frame_size() {
        let config = PipelineConfig {
            sample_rate: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(config.validate(), Err(PitchError::InvalidSampleRate(0))));

        let config = PipelineConfig {
            frame_size: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(config.validate(), Err(PitchError::InvalidFrameSize(0))));
    }

    #[test]
    fn rejects_frames_shorter_than_minimum_lag() {
        let config = PipelineConfig {
            algorithm: Algorithm::Acf,
            frame_size: 64,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PitchError::FrameTooShort {
                algorithm: Algorithm::Acf,
                frame_size: 64,
                minimum: 100,
            })
        ));
    }

    #[test]
    fn rejects_single_entry_smoothing() {
        let config = PipelineConfig {
            smoothing_window: 1,
            ..PipelineConfig::default()
        };
        assert!(matches!(config.validate(), Err(PitchError::InvalidSmoothingWindow(1))));

        let config = PipelineConfig {
            smoothing_window: 0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_ok());
        assert!(!config.smoothing_enabled());
    }

    #[test]
    fn rejects_bad_gate_band_and_thresholds() {
        let mut config = PipelineConfig::default();
        config.gate.hysteresis = 1.5;
        assert!(matches!(config.validate(), Err(PitchError::InvalidGate { .. })));

        let mut config = PipelineConfig::default();
        config.band.min_hz = 2500.0;
        assert!(matches!(config.validate(), Err(PitchError::InvalidFrequencyRange { .. })));

        let mut config = PipelineConfig::default();
        config.thresholds.yin = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(PitchError::InvalidThreshold { name: "yin", .. })
        ));

        let mut config = PipelineConfig::default();
        config.thresholds.mpm_peak_tolerance = 0.0;
        assert!(matches!(
            config.validate(),
            Err(PitchError::InvalidThreshold { name: "mpm_peak_tolerance", .. })
        ));
    }

    #[test]
    fn json_round_trip() {
        let config = PipelineConfig {
            algorithm: Algorithm::Acf,
            smoothing_window: 0,
            ..PipelineConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""algorithm":"acf""#));
        assert_eq!(PipelineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn unknown_algorithm_in_json_is_an_error() {
        let err = PipelineConfig::from_json_str(r#"{ "algorithm": "fft" }"#).unwrap_err();
        assert!(matches!(err, PitchError::Config(_)));
    }
}
