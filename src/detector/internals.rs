use rustfft::FftPlanner;

use crate::float::{from_usize, Float};
use crate::utils::buffer::{
    copy_real_to_complex, cumulative_square_sum, modulus_squared, new_complex_buffer,
    ComplexComponent,
};

/// Compute the linear (non-circular) autocorrelation of `signal` for every lag
/// in `0..signal.len()`:
///
/// > r(t) = sum_{i=0}^{N-t-1} x_i*x_{i+t}
///
/// The signal is zero-padded to at least twice its length so the FFT's
/// circular correlation does not wrap around.
pub fn autocorrelation<T: Float>(signal: &[T]) -> Vec<T> {
    if signal.is_empty() {
        return Vec::new();
    }

    let fft_len = (2 * signal.len()).next_power_of_two();
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_len);
    let inv_fft = planner.plan_fft_inverse(fft_len);

    let mut spectrum = new_complex_buffer(fft_len);
    let mut scratch = new_complex_buffer(
        fft.get_inplace_scratch_len()
            .max(inv_fft.get_inplace_scratch_len()),
    );

    copy_real_to_complex(signal, &mut spectrum, ComplexComponent::Re);
    fft.process_with_scratch(&mut spectrum, &mut scratch);
    modulus_squared(&mut spectrum);
    inv_fft.process_with_scratch(&mut spectrum, &mut scratch);

    // rustfft doesn't normalize, and we went forward and back once.
    let normalization = T::one() / from_usize::<T>(fft_len);
    spectrum[..signal.len()]
        .iter()
        .map(|c| c.re * normalization)
        .collect()
}

/// Compute the square difference function, _d(t)_, of `signal` for lags
/// `0..max_lag`. For a signal _x_ of length _W_ this is
///
///  > d(t) = sum_{j=0}^{W-t-1} (x_j - x_{j+t})^2
///
/// Expanding the square gives `pow(0..W-t) + pow(t..W) - 2*r(t)`, where `r` is
/// the autocorrelation, so the whole function costs one FFT round trip.
pub fn difference_function<T: Float>(signal: &[T], max_lag: usize) -> Vec<T> {
    let max_lag = max_lag.min(signal.len());
    let two = T::one() + T::one();
    let acf = autocorrelation(signal);
    let power = cumulative_square_sum(signal);
    let total = power[signal.len()];

    (0..max_lag)
        .map(|tau| {
            if tau == 0 {
                return T::zero();
            }
            let head = power[signal.len() - tau];
            let tail = total - power[tau];
            // FFT round-off can dip just below zero where the signal repeats exactly.
            (head + tail - two * acf[tau]).max(T::zero())
        })
        .collect()
}

/// Calculate the "cumulative mean normalized difference function" as
/// specified in the YIN paper. If _d(t)_ is the square error function,
/// compute _d'(0) = 1_ and for _t > 0_
///
///  > d'(t) = d(t) / [ (1/t) * sum_{i=1}^t d(i) ]
///
/// A zero running sum (a silent or constant prefix) yields _d'(t) = 1_.
pub fn cumulative_mean_normalized_difference<T: Float>(difference: &mut [T]) {
    if difference.is_empty() {
        return;
    }
    let mut sum = T::zero();
    difference[0] = T::one();
    difference
        .iter_mut()
        .enumerate()
        .skip(1)
        .for_each(|(tau, d)| {
            sum = sum + *d;
            *d = if sum > T::zero() {
                *d * from_usize::<T>(tau) / sum
            } else {
                T::one()
            };
        });
}

/// Compute the normalized square difference function (NSDF) of the McLeod
/// pitch method for lags `0..max_lag`:
///
/// > n(t) = 2 * r(t) / sqrt( sum_{i<N-t} x_i^2 * sum_{i<N-t} x_{i+t}^2 )
///
/// Lags where the divisor vanishes get `0`.
pub fn normalized_square_difference<T: Float>(signal: &[T], max_lag: usize) -> Vec<T> {
    let max_lag = max_lag.min(signal.len());
    let two = T::one() + T::one();
    let acf = autocorrelation(signal);
    let power = cumulative_square_sum(signal);
    let total = power[signal.len()];

    (0..max_lag)
        .map(|tau| {
            let head = power[signal.len() - tau];
            let tail = total - power[tau];
            let divisor = (head * tail).sqrt();
            if divisor > T::zero() && divisor.is_finite() {
                two * acf[tau] / divisor
            } else {
                T::zero()
            }
        })
        .collect()
}
