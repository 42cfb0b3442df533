//! # Pitch Tracker
//! *pitch_tracker* estimates the fundamental frequency of short audio frames
//! and turns the raw per-frame estimates into a stable stream of readings.
//!
//! # Detectors
//! A *detector* is an implementation of a pitch detection algorithm. All of
//! them are stateless and can be shared between threads.
//!
//!   * [ZeroCrossingDetector][detector::zero_crossing]
//!   * [AutocorrelationDetector][detector::autocorrelation]
//!   * [YINDetector][detector::yin]
//!   * [McLeodDetector][detector::mcleod]
//!
//! # Pipeline
//! A [Pipeline] puts one detector behind an [amplitude gate][pipeline::gate]
//! and a [median smoother][pipeline::smoother], and classifies every frame as
//! a [Reading].
//!
//! # Examples
//! ```
//! use pitch_tracker::detector::mcleod::McLeodDetector;
//! use pitch_tracker::detector::PitchDetector;
//!
//! fn main() {
//!     const SAMPLE_RATE: usize = 44100;
//!     const SIZE: usize = 2048;
//!
//!     // Signal coming from some source (microphone, generated, etc...)
//!     let dt = 1.0 / SAMPLE_RATE as f64;
//!     let freq = 300.0;
//!     let signal: Vec<f64> = (0..SIZE)
//!         .map(|x| (2.0 * std::f64::consts::PI * x as f64 * dt * freq).sin())
//!         .collect();
//!
//!     let detector = McLeodDetector::default();
//!
//!     let pitch = detector.get_pitch(&signal, SAMPLE_RATE).unwrap();
//!
//!     println!("Frequency: {}", pitch);
//! }
//! ```

pub use detector::{
    autocorrelation::AutocorrelationDetector, mcleod::McLeodDetector, yin::YINDetector,
    zero_crossing::ZeroCrossingDetector, Algorithm, Detector, PitchDetector,
};
pub use error::{PitchError, PitchResult};
pub use pipeline::{Analysis, Pipeline, Reading};

pub mod config;
pub mod detector;
pub mod error;
pub mod float;
pub mod notes;
pub mod pipeline;
pub mod sink;
pub mod stream;
pub mod utils;
