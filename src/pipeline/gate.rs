use log::debug;

use crate::float::Float;

/// Two-threshold amplitude gate. A closed gate opens once the RMS level rises
/// above `min_rms`; an open gate only closes again when the level falls below
/// `min_rms * hysteresis`, so a signal hovering around the threshold does not
/// make it flap.
#[derive(Debug, Clone)]
pub struct AmplitudeGate<T>
where
    T: Float,
{
    min_rms: T,
    hysteresis: T,
    open: bool,
}

impl<T> AmplitudeGate<T>
where
    T: Float,
{
    /// A closed gate.
    pub fn new(min_rms: T, hysteresis: T) -> Self {
        AmplitudeGate {
            min_rms,
            hysteresis,
            open: false,
        }
    }

    /// Feed the RMS level of one frame; returns whether the gate is open
    /// afterwards.
    pub fn process(&mut self, rms: T) -> bool {
        if self.open {
            if rms < self.min_rms * self.hysteresis {
                debug!("gate closed at rms {}", rms);
                self.open = false;
            }
        } else if rms > self.min_rms {
            debug!("gate opened at rms {}", rms);
            self.open = true;
        }
        self.open
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn min_rms(&self) -> T {
        self.min_rms
    }

    /// Level below which an open gate closes.
    pub fn close_threshold(&self) -> T {
        self.min_rms * self.hysteresis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hysteresis_sequence() {
        let mut gate = AmplitudeGate::new(0.005, 0.8);
        assert!(!gate.process(0.003));
        assert!(gate.process(0.006));
        // Between the closing (0.004) and opening (0.005) thresholds.
        assert!(gate.process(0.0041));
        assert!(!gate.process(0.0035));
    }

    #[test]
    fn closed_gate_needs_opening_threshold() {
        let mut gate = AmplitudeGate::new(0.005f32, 0.8);
        assert!(!gate.is_open());
        assert!(!gate.process(0.0045));
        assert!(!gate.process(0.005));
        assert!(gate.process(0.0051));
        gate.close();
        assert!(!gate.is_open());
    }

    #[test]
    fn close_threshold() {
        let gate = AmplitudeGate::new(0.5f64, 0.5);
        assert_eq!(gate.close_threshold(), 0.25);
        assert_eq!(gate.min_rms(), 0.5);
    }
}
