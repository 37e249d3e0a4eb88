//! Probability-simplex helpers.
//!
//! Distributions appear in two shapes: dense slices (one weight per index)
//! and sparse `(index, weight)` slices sorted by index. Sampling functions
//! take the uniform draw as an argument so callers own the RNG and results
//! stay reproducible.

/// Tolerance used when checking that weights sum to one.
pub const PROB_TOLERANCE: f64 = 1e-6;

/// Normalize weights in place so they sum to one.
///
/// Returns the original sum, or None if the weights cannot be normalized
/// (empty, negative, non-finite, or zero total mass).
pub fn normalize(weights: &mut [f64]) -> Option<f64> {
    if weights.is_empty() || weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return None;
    }
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return None;
    }
    for w in weights.iter_mut() {
        *w /= sum;
    }
    Some(sum)
}

/// Check that values form a probability distribution within `tol`.
pub fn is_distribution(values: &[f64], tol: f64) -> bool {
    if values.is_empty() {
        return false;
    }
    if values
        .iter()
        .any(|p| !p.is_finite() || *p < -tol || *p > 1.0 + tol)
    {
        return false;
    }
    let sum: f64 = values.iter().sum();
    (sum - 1.0).abs() <= tol
}

/// Map uniform draws in (0, 1] onto a point drawn uniformly from the simplex.
///
/// Uses the normalized-exponential construction: `x_i = -ln(u_i) / Σ_j -ln(u_j)`.
/// Returns None if any draw is outside (0, 1] or all draws equal 1.
pub fn from_uniforms(uniforms: &[f64]) -> Option<Vec<f64>> {
    if uniforms.iter().any(|u| !(*u > 0.0 && *u <= 1.0)) {
        return None;
    }
    let mut weights: Vec<f64> = uniforms.iter().map(|u| -u.ln()).collect();
    normalize(&mut weights)?;
    Some(weights)
}

/// L1 distance between two sparse distributions sorted by index.
pub fn l1_distance_sparse(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let mut total = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let (ia, pa) = a[i];
        let (ib, pb) = b[j];
        if ia == ib {
            total += (pa - pb).abs();
            i += 1;
            j += 1;
        } else if ia < ib {
            total += pa.abs();
            i += 1;
        } else {
            total += pb.abs();
            j += 1;
        }
    }
    total += a[i..].iter().map(|(_, p)| p.abs()).sum::<f64>();
    total += b[j..].iter().map(|(_, p)| p.abs()).sum::<f64>();
    total
}

/// Inverse-CDF sampling over a sparse distribution.
///
/// `u` is a uniform draw in [0, 1). Falls back to the last index with
/// positive mass when rounding leaves `u` beyond the cumulative total.
pub fn sample_sparse(pairs: &[(usize, f64)], u: f64) -> Option<usize> {
    let mut cumulative = 0.0;
    let mut last = None;
    for &(idx, p) in pairs {
        if p <= 0.0 {
            continue;
        }
        cumulative += p;
        last = Some(idx);
        if u < cumulative {
            return Some(idx);
        }
    }
    last
}
