//! Dense and sparse vector kernels used by alpha-vector arithmetic.
//!
//! Alpha vectors are stored densely (one coefficient per state) while belief
//! states are stored sparsely as `(index, weight)` pairs. The kernels here
//! cover the combinations the backup loop needs.

/// Dot product of two dense vectors.
///
/// Extra trailing entries in the longer slice are ignored.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Dot product of a dense vector with a sparse `(index, weight)` vector.
///
/// Indices outside the dense vector contribute nothing.
pub fn dot_sparse(dense: &[f64], sparse: &[(usize, f64)]) -> f64 {
    sparse
        .iter()
        .filter_map(|&(i, w)| dense.get(i).map(|v| v * w))
        .sum()
}

/// In-place `y += a * x`.
pub fn axpy(y: &mut [f64], a: f64, x: &[f64]) {
    for (yi, xi) in y.iter_mut().zip(x.iter()) {
        *yi += a * xi;
    }
}

/// In-place `y += x`.
pub fn add_assign(y: &mut [f64], x: &[f64]) {
    for (yi, xi) in y.iter_mut().zip(x.iter()) {
        *yi += xi;
    }
}

/// Largest absolute coordinate difference between two vectors.
///
/// Returns `f64::INFINITY` when the lengths differ.
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Minimum and maximum of a slice, ignoring NaN.
///
/// Returns None for an empty slice or one containing only NaN.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut iter = values.iter().copied().filter(|v| !v.is_nan());
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

/// True when every entry is finite.
pub fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}
