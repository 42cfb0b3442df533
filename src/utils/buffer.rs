use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;

use crate::float::{from_usize, Float};

pub enum ComplexComponent {
    Re,
    Im,
}

pub fn new_real_buffer<T: Float>(size: usize) -> Vec<T> {
    vec![T::zero(); size]
}

pub fn new_complex_buffer<T: Float>(size: usize) -> Vec<Complex<T>> {
    vec![Complex::zero(); size]
}

pub fn copy_real_to_complex<T: Float>(
    input: &[T],
    output: &mut [Complex<T>],
    component: ComplexComponent,
) {
    assert!(input.len() <= output.len());
    match component {
        ComplexComponent::Re => input.iter().zip(output.iter_mut()).for_each(|(i, o)| {
            o.re = *i;
            o.im = T::zero();
        }),
        ComplexComponent::Im => input.iter().zip(output.iter_mut()).for_each(|(i, o)| {
            o.im = *i;
            o.re = T::zero();
        }),
    }
    output[input.len()..]
        .iter_mut()
        .for_each(|o| *o = Complex::zero())
}

/// Computes |x|^2 for each complex value x in `arr`. This function
/// modifies `arr` in place and leaves the complex component zero.
pub fn modulus_squared<T: Float>(arr: &mut [Complex<T>]) {
    for s in arr {
        s.re = s.re * s.re + s.im * s.im;
        s.im = T::zero();
    }
}

/// Compute the sum of the square of each element of `arr`.
pub fn square_sum<T: Float>(arr: &[T]) -> T {
    arr.iter().map(|&s| s * s).sum::<T>()
}

/// Running sums of squares: `result[i]` is the energy of `arr[..i]`, so the
/// energy of any range `a..b` is `result[b] - result[a]`.
pub fn cumulative_square_sum<T: Float>(arr: &[T]) -> Vec<T> {
    let mut result = Vec::with_capacity(arr.len() + 1);
    result.push(T::zero());
    arr.iter().fold(T::zero(), |acc, &s| {
        let next = acc + s * s;
        result.push(next);
        next
    });
    result
}

/// Arithmetic mean of `arr`, zero for an empty slice.
pub fn mean<T: Float>(arr: &[T]) -> T {
    if arr.is_empty() {
        return T::zero();
    }
    arr.iter().copied().sum::<T>() / from_usize::<T>(arr.len())
}

/// Root mean square amplitude of `arr`, zero for an empty slice.
pub fn rms<T: Float>(arr: &[T]) -> T {
    if arr.is_empty() {
        return T::zero();
    }
    (square_sum(arr) / from_usize::<T>(arr.len())).sqrt()
}

/// A copy of `arr` with its mean subtracted.
pub fn remove_dc<T: Float>(arr: &[T]) -> Vec<T> {
    let offset = mean(arr);
    arr.iter().map(|&s| s - offset).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cumulative_square_sum_ranges() {
        let signal: Vec<f64> = vec![1., -2., 3.];
        let sums = cumulative_square_sum(&signal);

        assert_eq!(sums, vec![0., 1., 5., 14.]);
        // Energy of signal[1..3]
        assert_eq!(sums[3] - sums[1], 13.);
    }

    #[test]
    fn rms_of_constant_and_empty() {
        assert_eq!(rms(&[0.5f64; 16]), 0.5);
        assert_eq!(rms::<f32>(&[]), 0.);
    }

    #[test]
    fn dc_removal() {
        let centered = remove_dc(&[1.0f64, 2., 3.]);
        assert_eq!(centered, vec![-1., 0., 1.]);
        assert_eq!(mean::<f64>(&[]), 0.);
    }

    #[test]
    fn complex_round_trip_pads_with_zeros() {
        let mut output = new_complex_buffer::<f64>(4);
        copy_real_to_complex(&[1., 2.], &mut output, ComplexComponent::Re);
        modulus_squared(&mut output);

        let re: Vec<f64> = output.iter().map(|c| c.re).collect();
        assert_eq!(re, vec![1., 4., 0., 0.]);
        assert!(output.iter().all(|c| c.im == 0.));
    }
}
