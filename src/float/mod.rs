//! Generic [Float] type which acts as a stand-in for `f32` or `f64`.
use rustfft::num_traits::Float as NumFloat;
use rustfft::FftNum;
use std::fmt::{Debug, Display};
use std::iter::Sum;

/// Signals are processed as arrays of [Float]s. A [Float] is normally `f32` or `f64`.
pub trait Float: Display + Debug + NumFloat + FftNum + Sum {}

impl Float for f64 {}
impl Float for f32 {}

/// Convert a sample count or rate to `T`.
pub fn from_usize<T: Float>(n: usize) -> T {
    T::from_usize(n).unwrap_or_else(T::infinity)
}

/// Convert a configuration constant to `T`.
pub fn from_f64<T: Float>(value: f64) -> T {
    T::from_f64(value).unwrap_or_else(T::nan)
}

/// `|x|`. Both `num_traits::Float` and `num_traits::Signed` provide an `abs`,
/// so method syntax is ambiguous on a generic `T`.
pub fn abs<T: Float>(x: T) -> T {
    NumFloat::abs(x)
}

/// Widen `x` for reporting.
pub fn to_f64<T: Float>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}
