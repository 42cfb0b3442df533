//! Per-stream composition of gate, detector and smoother.
//!
//! ```
//! use pitch_tracker::config::PipelineConfig;
//! use pitch_tracker::pipeline::{Pipeline, Reading};
//!
//! let config = PipelineConfig { frame_size: 4800, ..PipelineConfig::default() };
//! let mut pipeline = Pipeline::<f64>::new(config).unwrap();
//!
//! let silence = vec![0.0; 4800];
//! assert_eq!(pipeline.process_frame(&silence).unwrap().reading, Reading::Quiet);
//!
//! let tone: Vec<f64> = (0..4800)
//!     .map(|i| (2.0 * std::f64::consts::PI * 440.0 * i as f64 / 48000.0).sin())
//!     .collect();
//! assert_eq!(pipeline.process_frame(&tone).unwrap().reading, Reading::Stabilizing);
//! let reading = pipeline.process_frame(&tone).unwrap().reading;
//! assert!((reading.frequency().unwrap() - 440.0).abs() < 5.0);
//! ```

use std::fmt;

use log::{debug, trace};

use crate::config::PipelineConfig;
use crate::detector::{Algorithm, Detector, PitchDetector};
use crate::error::{PitchError, PitchResult};
use crate::float::{from_f64, Float};
use crate::utils::buffer::rms;

pub mod gate;
pub mod smoother;

pub use gate::AmplitudeGate;
pub use smoother::PitchSmoother;

/// What a pipeline made of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading<T> {
    /// The amplitude gate is closed.
    Quiet,
    /// A pitch may be present but the smoother has not settled yet.
    Stabilizing,
    /// The detector found no periodicity.
    NoPitch,
    /// A pitch outside the accepted band.
    OutOfRange(T),
    Valid(T),
}

impl<T: Copy> Reading<T> {
    /// The reported frequency, for valid and out-of-range readings.
    pub fn frequency(&self) -> Option<T> {
        match self {
            Reading::Valid(f) | Reading::OutOfRange(f) => Some(*f),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Reading::Valid(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Reading::Quiet => "quiet",
            Reading::Stabilizing => "stabilizing",
            Reading::NoPitch => "no_pitch",
            Reading::OutOfRange(_) => "out_of_range",
            Reading::Valid(_) => "valid",
        }
    }
}

impl<T: Copy> fmt::Display for Reading<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Valid(frequency) => write!(f, "{:.2} Hz", frequency),
            Reading::OutOfRange(frequency) => write!(f, "{:.2} Hz (out of range)", frequency),
            other => f.write_str(other.label()),
        }
    }
}

/// A frame's reading together with the RMS level the gate saw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Analysis<T> {
    pub reading: Reading<T>,
    pub rms: T,
}

/// Gate → detector → smoother for one stream of frames.
///
/// A pipeline owns its gate and smoother state; independent streams each need
/// their own pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline<T>
where
    T: Float,
{
    config: PipelineConfig,
    detector: Detector<T>,
    gate: AmplitudeGate<T>,
    smoother: Option<PitchSmoother<T>>,
    band: (T, T),
}

impl<T> Pipeline<T>
where
    T: Float,
{
    /// Validate `config` and build the detector it selects.
    pub fn new(config: PipelineConfig) -> PitchResult<Self> {
        config.validate()?;

        let detector = Detector::from_config(&config);
        let gate = AmplitudeGate::new(from_f64(config.gate.min_rms), from_f64(config.gate.hysteresis));
        let smoother = if config.smoothing_enabled() {
            Some(PitchSmoother::new(config.smoothing_window))
        } else {
            None
        };
        let band = (from_f64(config.band.min_hz), from_f64(config.band.max_hz));

        debug!(
            "pipeline: {} at {} Hz, {} samples per frame, smoothing {}",
            config.algorithm, config.sample_rate, config.frame_size, config.smoothing_window
        );

        Ok(Pipeline {
            config,
            detector,
            gate,
            smoother,
            band,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn algorithm(&self) -> Algorithm {
        self.detector.algorithm()
    }

    pub fn detector(&self) -> &Detector<T> {
        &self.detector
    }

    pub fn gate(&self) -> &AmplitudeGate<T> {
        &self.gate
    }

    /// Run one frame through the gate, the detector and the smoother.
    pub fn process_frame(&mut self, frame: &[T]) -> PitchResult<Analysis<T>> {
        if frame.len() != self.config.frame_size {
            return Err(PitchError::FrameLengthMismatch {
                expected: self.config.frame_size,
                actual: frame.len(),
            });
        }

        let rms = rms(frame);
        let reading = self.read(frame, rms);
        trace!("rms {:.6}: {}", rms, reading);
        Ok(Analysis { reading, rms })
    }

    fn read(&mut self, frame: &[T], rms: T) -> Reading<T> {
        if !self.gate.process(rms) {
            if let Some(smoother) = self.smoother.as_mut() {
                if !smoother.is_empty() {
                    debug!("smoother reset");
                }
                smoother.reset();
            }
            return Reading::Quiet;
        }

        let mut pitch = self.detector.get_pitch(frame, self.config.sample_rate);
        if let Some(smoother) = self.smoother.as_mut() {
            pitch = smoother.add(pitch);
            if pitch.is_none() {
                return Reading::Stabilizing;
            }
        }

        match pitch {
            Some(frequency) if frequency >= self.band.0 && frequency <= self.band.1 => {
                Reading::Valid(frequency)
            }
            Some(frequency) => Reading::OutOfRange(frequency),
            None => Reading::NoPitch,
        }
    }

    /// Close the gate and forget the smoother history, as at the start of a stream.
    pub fn reset(&mut self) {
        self.gate.close();
        if let Some(smoother) = self.smoother.as_mut() {
            smoother.reset();
        }
    }
}
