use pitch_tracker::detector::autocorrelation::AutocorrelationDetector;
use pitch_tracker::detector::mcleod::McLeodDetector;
use pitch_tracker::detector::zero_crossing::ZeroCrossingDetector;
use pitch_tracker::detector::PitchDetector;
use pitch_tracker::detector::{yin::YINDetector, Algorithm};
use pitch_tracker::float::Float;
use pitch_tracker::utils::buffer::new_real_buffer;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SAMPLE_RATE: usize = 48000;
const SIZE: usize = 4800;

#[test]
fn zero_crossing_sin_signal() {
    pure_frequency("ZCR", "sin", 440.0, 50.0);
}

#[test]
fn autocorrelation_sin_signal() {
    pure_frequency("ACF", "sin", 440.0, 10.0);
}

#[test]
fn yin_sin_signal() {
    pure_frequency("YIN", "sin", 440.0, 5.0);
}

#[test]
fn mcleod_sin_signal() {
    pure_frequency("MPM", "sin", 440.0, 5.0);
}

#[test]
fn autocorrelation_square_signal() {
    pure_frequency("ACF", "square", 440.0, 10.0);
}

#[test]
fn yin_square_signal() {
    pure_frequency("YIN", "square", 440.0, 5.0);
}

#[test]
fn mcleod_square_signal() {
    pure_frequency("MPM", "square", 440.0, 5.0);
}

#[test]
fn yin_triangle_signal() {
    pure_frequency("YIN", "triangle", 440.0, 5.0);
}

#[test]
fn mcleod_triangle_signal() {
    pure_frequency("MPM", "triangle", 440.0, 5.0);
}

#[test]
fn silence_has_no_pitch() {
    let silence = vec![0.0f64; 2048];
    for name in ["ZCR", "ACF", "YIN", "MPM"] {
        let detector = detector_factory::<f64>(name);
        match detector.get_pitch(&silence, SAMPLE_RATE) {
            None => {}
            Some(pitch) => assert!(pitch < 50.0, "{} found {} Hz in silence", name, pitch),
        }
    }
}

#[test]
fn noisy_sin_signal() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let signal: Vec<f64> = sin_wave::<f64>(440.0, SIZE, SAMPLE_RATE)
        .into_iter()
        .map(|s| s + 0.1 * gaussian(&mut rng))
        .collect();

    for name in ["ACF", "YIN", "MPM"] {
        let pitch = detector_factory::<f64>(name)
            .get_pitch(&signal, SAMPLE_RATE)
            .unwrap_or_else(|| panic!("{} found no pitch", name));
        println!("{}: {} Hz", name, pitch);
        assert!((pitch - 440.0).abs() < 20.0);
    }
}

#[test]
fn frequency_sweep_is_monotonic() {
    for name in ["YIN", "MPM"] {
        let detector = detector_factory::<f64>(name);
        let pitches: Vec<f64> = (0..=5)
            .map(|step| 400.0 + 10.0 * step as f64)
            .map(|freq| {
                let signal = sin_wave::<f64>(freq, SIZE, SAMPLE_RATE);
                let pitch = detector.get_pitch(&signal, SAMPLE_RATE).unwrap();
                assert!((pitch - freq).abs() < 5.0, "{}: {} Hz for {} Hz", name, pitch, freq);
                pitch
            })
            .collect();

        for pair in pitches.windows(2) {
            assert!(pair[1] > pair[0], "{}: {:?}", name, pitches);
            assert!(pair[1] - pair[0] < 20.0, "{}: {:?}", name, pitches);
        }
    }
}

#[test]
fn detection_is_idempotent() {
    let signal = square_wave::<f64>(330.0, 2048, SAMPLE_RATE);
    for name in ["ZCR", "ACF", "YIN", "MPM"] {
        let detector = detector_factory::<f64>(name);
        let first = detector.get_pitch(&signal, SAMPLE_RATE);
        let second = detector.get_pitch(&signal, SAMPLE_RATE);
        assert_eq!(first, second, "{}", name);
    }
}

#[test]
fn single_precision() {
    let signal = sin_wave::<f32>(440.0, SIZE, SAMPLE_RATE);
    for name in ["YIN", "MPM"] {
        let pitch = detector_factory::<f32>(name)
            .get_pitch(&signal, SAMPLE_RATE)
            .unwrap();
        assert!((pitch - 440.0).abs() < 5.0, "{}: {} Hz", name, pitch);
    }
}

#[test]
fn detectors_can_be_shared_between_threads() {
    let detector = YINDetector::<f64>::default();
    let detector = &detector;
    std::thread::scope(|scope| {
        for freq in [220.0, 330.0, 440.0] {
            scope.spawn(move || {
                let signal = sin_wave::<f64>(freq, SIZE, SAMPLE_RATE);
                let pitch = detector.get_pitch(&signal, SAMPLE_RATE).unwrap();
                assert!((pitch - freq).abs() < 5.0);
            });
        }
    });
}

/// Standard normal sample via the Box-Muller transform.
fn gaussian<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

fn sin_wave<T: Float>(freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    let mut signal = new_real_buffer(size);
    let two_pi = 2.0 * std::f64::consts::PI;
    let dx = two_pi * freq / sample_rate as f64;
    for i in 0..size {
        let x = i as f64 * dx;
        let y = x.sin();
        signal[i] = T::from(y).unwrap();
    }
    signal
}

fn square_wave<T: Float>(freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    let mut signal = new_real_buffer(size);
    let period = sample_rate as f64 / freq;

    for i in 0..size {
        let x = i as f64 / period;
        let frac = x - x.floor();
        let y = match frac >= 0.5 {
            true => -1.0,
            false => 1.0,
        };
        signal[i] = T::from(y).unwrap();
    }
    signal
}

fn triangle_wave<T: Float>(freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    let mut signal = new_real_buffer(size);
    let period = sample_rate as f64 / freq;

    for i in 0..size {
        let x = i as f64 / period;
        let frac = x - x.floor();
        let y = match frac {
            f if f < 0.25 => 4. * f,
            f if f < 0.75 => 1. - 4. * (f - 0.25),
            f => -1. + 4. * (f - 0.75),
        };
        signal[i] = T::from(y).unwrap();
    }
    signal
}

fn detector_factory<T: Float>(name: &str) -> Box<dyn PitchDetector<T>> {
    let algorithm: Algorithm = name.parse().unwrap();
    match algorithm {
        Algorithm::Zcr => Box::new(ZeroCrossingDetector),
        Algorithm::Acf => Box::new(AutocorrelationDetector::<T>::default()),
        Algorithm::Yin => Box::new(YINDetector::<T>::default()),
        Algorithm::Mpm => Box::new(McLeodDetector::<T>::default()),
    }
}

fn signal_factory<T: Float>(name: &str, freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    match name {
        "sin" => sin_wave(freq, size, sample_rate),
        "square" => square_wave(freq, size, sample_rate),
        "triangle" => triangle_wave(freq, size, sample_rate),
        _ => panic!("Unknown wave function {}", name),
    }
}

fn pure_frequency(detector_name: &str, wave_name: &str, freq_in: f64, tolerance: f64) {
    let signal = signal_factory::<f64>(wave_name, freq_in, SIZE, SAMPLE_RATE);
    let detector = detector_factory::<f64>(detector_name);

    match detector.get_pitch(&signal, SAMPLE_RATE) {
        Some(frequency) => {
            println!("{} on {}: {} Hz", detector_name, wave_name, frequency);
            assert!((frequency - freq_in).abs() < tolerance);
        }
        None => panic!("{} found no pitch in {} wave", detector_name, wave_name),
    }
}
