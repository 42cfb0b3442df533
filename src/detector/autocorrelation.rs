//! Autocorrelation pitch detection. The lag with the strongest self-similarity
//! inside the 50–1000 Hz period range is taken as the period, provided its
//! correlation is a large enough fraction of the zero-lag energy.

use crate::detector::internals::autocorrelation;
use crate::detector::PitchDetector;
use crate::float::{from_f64, from_usize, Float};
use crate::utils::buffer::remove_dc;

/// Highest frequency the autocorrelation detector searches for.
pub const MAX_FREQUENCY: usize = 1000;
/// Lowest frequency the autocorrelation detector searches for.
pub const MIN_FREQUENCY: usize = 50;
/// Default ratio between the chosen peak and the zero-lag correlation.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Shortest lag examined at `sample_rate`, never below one sample.
pub fn min_period(sample_rate: usize) -> usize {
    (sample_rate / MAX_FREQUENCY).max(1)
}

/// Longest lag examined at `sample_rate` for a correlation of `len` lags.
pub fn max_period(sample_rate: usize, len: usize) -> usize {
    (sample_rate / MIN_FREQUENCY).min(len)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutocorrelationDetector<T>
where
    T: Float,
{
    threshold: T,
}

impl<T> AutocorrelationDetector<T>
where
    T: Float,
{
    pub fn new(threshold: T) -> Self {
        AutocorrelationDetector { threshold }
    }

    pub fn threshold(&self) -> T {
        self.threshold
    }
}

impl<T> Default for AutocorrelationDetector<T>
where
    T: Float,
{
    fn default() -> Self {
        AutocorrelationDetector::new(from_f64(DEFAULT_THRESHOLD))
    }
}

impl<T> PitchDetector<T> for AutocorrelationDetector<T>
where
    T: Float,
{
    fn get_pitch(&self, signal: &[T], sample_rate: usize) -> Option<T> {
        let autocorr = autocorrelation(&remove_dc(signal));

        let min_period = min_period(sample_rate);
        let max_period = max_period(sample_rate, autocorr.len());
        if max_period <= min_period {
            return None;
        }

        // First index of the largest correlation inside the lag window.
        let (peak_lag, peak) = autocorr[min_period..max_period]
            .iter()
            .enumerate()
            .fold((0, T::neg_infinity()), |best, (i, &r)| {
                if r > best.1 {
                    (i, r)
                } else {
                    best
                }
            });
        let peak_lag = peak_lag + min_period;

        if peak > self.threshold * autocorr[0] {
            Some(from_usize::<T>(sample_rate) / from_usize::<T>(peak_lag))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lag_window() {
        assert_eq!(min_period(48000), 48);
        assert_eq!(max_period(48000, 4800), 960);
        assert_eq!(max_period(48000, 500), 500);
        assert_eq!(min_period(800), 1);
    }

    #[test]
    fn integer_period_is_exact() {
        // 400 Hz at 48 kHz repeats every 120 samples.
        let signal: Vec<f64> = (0..2048)
            .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 120.0).sin())
            .collect();
        let pitch = AutocorrelationDetector::default()
            .get_pitch(&signal, 48000)
            .unwrap();
        assert_eq!(pitch, 400.0);
    }

    #[test]
    fn frame_shorter_than_lag_window() {
        let detector = AutocorrelationDetector::<f64>::default();
        assert_eq!(detector.get_pitch(&[0.5, -0.5, 0.5, -0.5], 48000), None);
        assert_eq!(detector.get_pitch(&[], 48000), None);
    }
}
