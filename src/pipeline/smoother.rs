use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::float::{abs, from_f64, Float};

/// Maximum relative deviation from the median for a history to count as stable.
pub const STABILITY_TOLERANCE: f64 = 0.05;

/// Rolling median over the last `window` pitch estimates.
///
/// The smoother reports nothing until it holds two estimates, then reports the
/// median as soon as every estimate is within 5% of it. A full history reports
/// its median regardless, so a wobbling pitch never stalls the output.
#[derive(Debug, Clone)]
pub struct PitchSmoother<T>
where
    T: Float,
{
    window: usize,
    history: VecDeque<T>,
}

impl<T> PitchSmoother<T>
where
    T: Float,
{
    pub fn new(window: usize) -> Self {
        PitchSmoother {
            window,
            history: VecDeque::with_capacity(window),
        }
    }

    /// Record `estimate`, if any, and return the smoothed pitch or `None`
    /// while the history is not yet stable.
    pub fn add(&mut self, estimate: Option<T>) -> Option<T> {
        if let Some(pitch) = estimate {
            if self.window > 0 && self.history.len() >= self.window {
                self.history.pop_front();
            }
            self.history.push_back(pitch);
        }

        if self.history.len() < 2 {
            return None;
        }

        let median = self.median()?;
        if self.is_stable(median) || self.history.len() >= self.window {
            Some(median)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Median of the history; the mean of the middle pair for even lengths.
    fn median(&self) -> Option<T> {
        let mut sorted: Vec<T> = self.history.iter().copied().collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let mid = sorted.len() / 2;
        match sorted.len() {
            0 => None,
            n if n % 2 == 1 => Some(sorted[mid]),
            _ => Some((sorted[mid - 1] + sorted[mid]) / (T::one() + T::one())),
        }
    }

    fn is_stable(&self, median: T) -> bool {
        if median <= T::zero() {
            return false;
        }
        let tolerance = from_f64::<T>(STABILITY_TOLERANCE);
        self.history
            .iter()
            .all(|&pitch| abs(pitch - median) / median < tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_pitch_stabilizes_after_two() {
        let mut smoother = PitchSmoother::new(5);
        assert_eq!(smoother.add(Some(440.0)), None);
        for _ in 0..4 {
            assert_eq!(smoother.add(Some(440.0)), Some(440.0));
        }
        assert_eq!(smoother.len(), 5);
    }

    #[test]
    fn full_history_forces_median() {
        let mut smoother = PitchSmoother::new(3);
        assert_eq!(smoother.add(Some(440.0)), None);
        // 440 and 500 straddle a median of 470 by more than 5%.
        assert_eq!(smoother.add(Some(500.0)), None);
        assert_eq!(smoother.add(Some(300.0)), Some(440.0));
    }

    #[test]
    fn oldest_estimate_is_evicted() {
        let mut smoother = PitchSmoother::new(3);
        smoother.add(Some(100.0));
        smoother.add(Some(440.0));
        smoother.add(Some(441.0));
        assert_eq!(smoother.len(), 3);
        // 100 drops out; 440, 441, 442 are all stable around 441.
        assert_eq!(smoother.add(Some(442.0)), Some(441.0));
        assert_eq!(smoother.len(), 3);
    }

    #[test]
    fn missing_estimate_reuses_history() {
        let mut smoother = PitchSmoother::new(5);
        assert_eq!(smoother.add(None), None);
        smoother.add(Some(220.0));
        assert_eq!(smoother.add(None), None);
        smoother.add(Some(222.0));
        assert_eq!(smoother.add(None), Some(221.0));
        assert_eq!(smoother.len(), 2);
    }

    #[test]
    fn reset_clears_history() {
        let mut smoother = PitchSmoother::new(5);
        smoother.add(Some(440.0f32));
        smoother.add(Some(440.0));
        smoother.reset();
        assert!(smoother.is_empty());
        assert_eq!(smoother.add(Some(440.0)), None);
    }
}
