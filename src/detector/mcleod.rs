//! The McLeod pitch method, from *A Smarter Way to Find Pitch* (McLeod & Wyvill, 2005).
//!
//! The *normalized square difference function* (NSDF) rescales the autocorrelation
//! at every lag by the energy of the two overlapping windows,
//! $$ n(t) = \frac{2\sum_{i<N-t} s_i s_{i+t}}{\sqrt{\sum_{i<N-t} s_i^2 \sum_{i<N-t} s_{i+t}^2}}, $$
//! so that a perfectly periodic lag scores the same wherever it lies in the frame.
//!
//! Peaks are picked among *key maxima*: the highest point of each positive run of
//! the NSDF after the trivial run around lag zero. The strongest key maximum wins;
//! maxima within `tolerance` of the strongest count as ties and the earliest (shortest
//! period) is preferred, which keeps exact multiples of the period from stealing the
//! estimate. The chosen lag is refined by quadratic interpolation.

use crate::detector::internals::normalized_square_difference;
use crate::detector::PitchDetector;
use crate::float::{from_f64, from_usize, Float};
use crate::utils::peak::{choose_peak, key_maxima, refine_extremum, Extremum};

/// Default minimum NSDF value for a key maximum.
pub const DEFAULT_THRESHOLD: f64 = 0.1;
/// Default fraction of the strongest key maximum that counts as a tie.
pub const DEFAULT_PEAK_TOLERANCE: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct McLeodDetector<T>
where
    T: Float,
{
    threshold: T,
    tolerance: T,
}

impl<T> McLeodDetector<T>
where
    T: Float,
{
    /// `threshold` applies to NSDF values, which range over `[-2, 2]`.
    pub fn new(threshold: T) -> Self {
        Self::with_tolerance(threshold, from_f64(DEFAULT_PEAK_TOLERANCE))
    }

    pub fn with_tolerance(threshold: T, tolerance: T) -> Self {
        McLeodDetector {
            threshold,
            tolerance,
        }
    }

    pub fn threshold(&self) -> T {
        self.threshold
    }

    pub fn tolerance(&self) -> T {
        self.tolerance
    }
}

impl<T> Default for McLeodDetector<T>
where
    T: Float,
{
    fn default() -> Self {
        McLeodDetector::new(from_f64(DEFAULT_THRESHOLD))
    }
}

impl<T> PitchDetector<T> for McLeodDetector<T>
where
    T: Float,
{
    fn get_pitch(&self, signal: &[T], sample_rate: usize) -> Option<T> {
        let nsdf = normalized_square_difference(signal, signal.len() / 2);

        let peaks = key_maxima(&nsdf);
        let (tau, _) = choose_peak(&peaks, self.threshold, self.tolerance)?;

        let period = refine_extremum(&nsdf, tau, Extremum::Maximum);
        if period <= T::zero() {
            return None;
        }
        Some(from_usize::<T>(sample_rate) / period)
    }
}
