//! Error types for the pitch tracker

use thiserror::Error;

use crate::detector::Algorithm;

/// Pitch tracker errors. Everything here is raised while building a pipeline or
/// moving frames in and out of it; a frame without a detectable pitch is not an
/// error.
#[derive(Debug, Error)]
pub enum PitchError {
    /// Sample rate of zero
    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(usize),

    /// Frame size of zero
    #[error("Invalid frame size: {0}")]
    InvalidFrameSize(usize),

    /// Frame too short for the algorithm's lag range
    #[error("Frame of {frame_size} samples is too short for {algorithm}, need at least {minimum}")]
    FrameTooShort {
        algorithm: Algorithm,
        frame_size: usize,
        minimum: usize,
    },

    /// A smoothing window of one can never report a value
    #[error("Invalid smoothing window: {0} (use 0 to disable smoothing, or at least 2)")]
    InvalidSmoothingWindow(usize),

    /// Gate thresholds out of range
    #[error("Invalid gate: min_rms {min_rms}, hysteresis {hysteresis}")]
    InvalidGate { min_rms: f64, hysteresis: f64 },

    /// Detector threshold out of range
    #[error("Invalid {name} threshold: {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    /// Invalid frequency range
    #[error("Invalid frequency range: {min} - {max} Hz")]
    InvalidFrequencyRange { min: f64, max: f64 },

    /// Unknown algorithm name
    #[error("Unknown algorithm: {0} (expected zcr, acf, yin or mpm)")]
    UnknownAlgorithm(String),

    /// Hop of zero between frames
    #[error("Invalid hop size: {0}")]
    InvalidHop(usize),

    /// Frame channel without room for a single frame
    #[error("Invalid channel capacity: {0}")]
    InvalidCapacity(usize),

    /// Frame length differs from the pipeline's frame size
    #[error("Frame has {actual} samples, pipeline expects {expected}")]
    FrameLengthMismatch { expected: usize, actual: usize },

    /// Frame sample rate differs from the pipeline's
    #[error("Frame sampled at {actual} Hz, pipeline expects {expected} Hz")]
    SampleRateMismatch { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for pitch tracker operations
pub type PitchResult<T> = Result<T, PitchError>;
