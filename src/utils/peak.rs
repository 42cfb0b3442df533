use crate::float::{from_f64, from_usize, Float};

/// Which kind of extremum a lag refinement is looking for. YIN searches for
/// dips in its difference function, McLeod for peaks in its NSDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Minimum,
    Maximum,
}

struct Point<T: Float> {
    x: T,
    y: T,
}

/// Collect the *key maxima* of `arr`: after skipping the positive run that
/// starts at index 0, the position and value of the highest point in every
/// later run of strictly positive values. The last element of `arr` is never
/// scanned. Ties inside a run keep the earliest position.
pub fn key_maxima<T: Float>(arr: &[T]) -> Vec<(usize, T)> {
    let scanned = &arr[..arr.len().saturating_sub(1)];
    let start = scanned
        .iter()
        .position(|&v| v <= T::zero())
        .unwrap_or(scanned.len());

    let mut maxima = Vec::new();
    let mut current: Option<(usize, T)> = None;
    for (i, &v) in scanned.iter().enumerate().skip(start) {
        if v > T::zero() {
            match current {
                Some((_, best)) if best >= v => {}
                _ => current = Some((i, v)),
            }
        } else if let Some(peak) = current.take() {
            maxima.push(peak);
        }
    }
    // A run still open at the end of the scan counts as well.
    maxima.extend(current);
    maxima
}

/// Among the `peaks` above `threshold`, find the largest value and return the
/// earliest peak reaching `tolerance` times that value. A `tolerance` of one
/// selects the global maximum, ties going to the earliest peak.
pub fn choose_peak<T: Float>(peaks: &[(usize, T)], threshold: T, tolerance: T) -> Option<(usize, T)> {
    let candidates: Vec<(usize, T)> = peaks
        .iter()
        .copied()
        .filter(|p| p.1 > threshold)
        .collect();

    let highest = candidates
        .iter()
        .map(|p| p.1)
        .fold(None, |best: Option<T>, v| match best {
            Some(b) if b >= v => Some(b),
            _ => Some(v),
        })?;

    candidates.into_iter().find(|p| p.1 >= tolerance * highest)
}

/// Refine the integer position `idx` of an extremum in `data` to sub-sample
/// precision with a parabola through `idx - 1`, `idx`, `idx + 1`.
///
/// At either edge of `data` only one neighbour exists; the better of `idx` and
/// that neighbour is returned instead. A flat triple (zero curvature) keeps
/// `idx` unchanged.
pub fn refine_extremum<T: Float>(data: &[T], idx: usize, extremum: Extremum) -> T {
    let last = data.len().saturating_sub(1);
    let at = |i: usize| Point {
        x: from_usize(i),
        y: data[i],
    };
    let better = |a: usize, b: usize| match extremum {
        Extremum::Minimum if data[b] < data[a] => b,
        Extremum::Maximum if data[b] > data[a] => b,
        _ => a,
    };

    if last == 0 {
        return from_usize(idx);
    }
    if idx == 0 {
        return from_usize(better(idx, idx + 1));
    }
    if idx >= last {
        return from_usize(better(last, last - 1));
    }

    quadratic_interpolation(at(idx - 1), at(idx), at(idx + 1))
        .map(|point| point.x)
        .unwrap_or_else(|| from_usize(idx))
}

fn quadratic_interpolation<T: Float>(
    left: Point<T>,
    center: Point<T>,
    right: Point<T>,
) -> Option<Point<T>> {
    let denominator = from_f64::<T>(2.0) * center.y - left.y - right.y;
    if denominator == T::zero() {
        return None;
    }
    let shift = from_f64::<T>(0.5) * (right.y - left.y) / denominator;
    if !shift.is_finite() {
        return None;
    }
    let x = center.x + shift;
    let y = center.y + from_f64::<T>(0.25) * (right.y - left.y) * shift;
    Some(Point { x, y })
}
