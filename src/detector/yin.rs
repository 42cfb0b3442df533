//! The YIN pitch detection algorithm is based on the algorithm from the paper
//! *[YIN, a fundamental frequency estimator for speech and music](http://recherche.ircam.fr/equipes/pcm/cheveign/ps/2002_JASA_YIN_proof.pdf)*.
//! It is efficient and offers an improvement over basic autocorrelation.
//!
//! The YIN pitch detection algorithm is similar to the [McLeod][crate::detector::mcleod], but it is based on
//! a different normalization of the *mean square difference function*.
//!
//! Let $S=(s_0,s_1,\ldots,s_{W-1})$ be a discrete signal. The *square difference function* at lag $t$
//! is defined by
//! $$ d(t) = \sum_{j=0}^{W-t-1} (s_j-s_{j+t})^2. $$
//! This function is close to zero when the signal "lines up" with itself. However, *close* is a relative term,
//! and the value of $d(t)$ depends on volume, which should not affect the pitch of the signal. For this
//! reason, the signal is normalized. The YIN algorithm computes the *cumulative mean normalized difference function*,
//! $$ d\'(t) = \begin{cases}1&\text{if }t=0\\\\ d(t) / \left[ \tfrac{1}{t}\sum_{i=1}^t d(i) \right] & \text{otherwise}\end{cases}. $$
//! Then, it searches for the first dip of $d\'(t)$ below a given threshold and follows it down to
//! its local minimum.
//!
//! ## Implementation
//! Rather than compute the difference function directly,
//! an [FFT](https://en.wikipedia.org/wiki/Fast_Fourier_transform) is used, providing a dramatic speed increase for large buffers.
//!
//! Lags are searched up to `min(W/2, sample_rate/50)`, so nothing below 50 Hz is reported.
//! After a candidate lag is found, quadratic interpolation is applied to further refine the estimate.

use crate::detector::internals::{cumulative_mean_normalized_difference, difference_function};
use crate::detector::PitchDetector;
use crate::float::{from_f64, from_usize, Float};
use crate::utils::peak::{refine_extremum, Extremum};

/// Lowest frequency YIN searches for.
pub const MIN_FREQUENCY: usize = 50;
/// The absolute threshold suggested by the YIN paper.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YINDetector<T>
where
    T: Float,
{
    threshold: T,
}

impl<T> YINDetector<T>
where
    T: Float,
{
    /// `threshold` is compared against the cumulative mean normalized
    /// difference, which lives in roughly `[0, 2]`; lower is stricter.
    pub fn new(threshold: T) -> Self {
        YINDetector { threshold }
    }

    pub fn threshold(&self) -> T {
        self.threshold
    }

    /// Number of lags examined for a frame of `size` samples.
    pub fn max_lag(size: usize, sample_rate: usize) -> usize {
        (size / 2).min(sample_rate / MIN_FREQUENCY)
    }

    /// STEP 4: The absolute threshold. Walk forward to the first lag whose
    /// normalized difference drops below `threshold`, then keep going while it
    /// still decreases so we land on the bottom of that dip rather than its edge.
    fn find_dip(&self, normalized: &[T]) -> Option<usize> {
        let tau_max = normalized.len();
        if tau_max < 3 {
            return None;
        }

        let mut tau = 1;
        while tau < tau_max - 1 {
            if normalized[tau] < self.threshold {
                while tau + 1 < tau_max && normalized[tau + 1] < normalized[tau] {
                    tau += 1;
                }
                break;
            }
            tau += 1;
        }

        if tau == tau_max - 1 || normalized[tau] >= self.threshold {
            None
        } else {
            Some(tau)
        }
    }
}

impl<T> Default for YINDetector<T>
where
    T: Float,
{
    fn default() -> Self {
        YINDetector::new(from_f64(DEFAULT_THRESHOLD))
    }
}

/// Pitch detection based on the YIN algorithm. See <http://recherche.ircam.fr/equipes/pcm/cheveign/ps/2002_JASA_YIN_proof.pdf>
impl<T> PitchDetector<T> for YINDetector<T>
where
    T: Float,
{
    fn get_pitch(&self, signal: &[T], sample_rate: usize) -> Option<T> {
        let tau_max = Self::max_lag(signal.len(), sample_rate);

        // STEP 2: Calculate the difference function, d_t.
        let mut normalized = difference_function(signal, tau_max);

        // STEP 3: Calculate the cumulative mean normalized difference function, d_t'.
        cumulative_mean_normalized_difference(&mut normalized);

        let tau = self.find_dip(&normalized)?;

        // STEP 5: Use quadratic interpolation to fine-tune the result
        let period = refine_extremum(&normalized, tau, Extremum::Minimum);
        if period <= T::zero() {
            return None;
        }
        Some(from_usize::<T>(sample_rate) / period)

        // STEP 6 of the YIN paper (best local estimate) is not performed.
    }
}
