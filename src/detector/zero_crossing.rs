//! Zero-crossing rate detection. The signal is centered around zero and the
//! average distance between sign changes is taken as half a period.
//!
//! It is by far the cheapest detector and also the least accurate one:
//! harmonics and noise add spurious crossings, so expect errors in the tens
//! of Hz. Useful as a baseline or a fast fallback.

use std::cmp::Ordering;

use crate::detector::PitchDetector;
use crate::float::{from_usize, Float};
use crate::utils::buffer::remove_dc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZeroCrossingDetector;

fn sign<T: Float>(value: T) -> Ordering {
    value.partial_cmp(&T::zero()).unwrap_or(Ordering::Equal)
}

/// Indices `i` where the sign of `signal[i]` differs from that of `signal[i + 1]`.
/// An exact zero counts as its own sign.
pub fn zero_crossings<T: Float>(signal: &[T]) -> Vec<usize> {
    signal
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| sign(pair[0]) != sign(pair[1]))
        .map(|(i, _)| i)
        .collect()
}

impl<T> PitchDetector<T> for ZeroCrossingDetector
where
    T: Float,
{
    fn get_pitch(&self, signal: &[T], sample_rate: usize) -> Option<T> {
        let crossings = zero_crossings(&remove_dc(signal));
        let (first, last) = match crossings.as_slice() {
            [first, .., last] => (*first, *last),
            _ => return None,
        };

        // Mean of the gaps between consecutive crossings.
        let mean_distance = from_usize::<T>(last - first) / from_usize::<T>(crossings.len() - 1);
        if mean_distance <= T::zero() {
            return None;
        }

        Some(from_usize::<T>(sample_rate) / (from_usize::<T>(2) * mean_distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossings_include_exact_zeros() {
        let signal = [1.0f64, 0.0, -1.0, -1.0, 2.0];
        assert_eq!(zero_crossings(&signal), vec![0, 1, 3]);
    }

    #[test]
    fn square_wave_frequency() {
        // Period of 8 samples: crossings every 4 samples.
        let signal: Vec<f64> = (0..64)
            .map(|i| if (i / 4) % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let pitch = ZeroCrossingDetector.get_pitch(&signal, 800).unwrap();
        assert_eq!(pitch, 100.0);
    }

    #[test]
    fn needs_two_crossings() {
        let detector = ZeroCrossingDetector;
        assert_eq!(detector.get_pitch(&[1.0f64, 1.0, -1.0, -1.0], 1000), None);
        assert_eq!(detector.get_pitch(&[0.0f32; 2048], 48000), None);
        assert_eq!(detector.get_pitch(&[] as &[f64], 48000), None);
    }
}
