//! Small numeric helpers shared by the calculators and the normalizer.
//!
//! Everything that can fail returns `None` instead of a NaN or infinity, so
//! callers can chain with `?` and absence propagates on its own.

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
///
/// A company's score history is a handful of fiscal years drawn from a
/// longer run, not the whole population, so z-scores over it use the
/// unbiased sample estimate. Fewer than two points give 0.
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    let variance = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64;
    variance.sqrt()
}

/// Z-score of `value` relative to `data`.
/// Returns 0.0 if data has no variance.
pub fn z_score_of(value: f64, data: &[f64]) -> f64 {
    // Rounding in the mean would otherwise turn identical values into ±1
    if data.windows(2).all(|w| w[0] == w[1]) {
        return 0.0;
    }
    let sd = std_dev(data);
    if sd < f64::EPSILON {
        return 0.0;
    }
    (value - mean(data)) / sd
}

/// Keep a value only if it is finite
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Division that is absent for a zero denominator or a non-finite result
pub fn safe_div(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    finite(numerator / denominator)
}
