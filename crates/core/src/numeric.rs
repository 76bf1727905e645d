//! Clamping, normalization, and vector helpers shared by every engine stage.

/// Magnitudes below this are treated as zero vectors.
pub const MAGNITUDE_EPSILON: f64 = 1e-12;

/// Clamp into `[0, 1]`. Non-finite input maps to `0`.
pub fn clamp01(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Clamp into `[0, 100]`. Non-finite input maps to `0`.
pub fn clamp100(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Weighted mean of `(weight, value)` pairs. Non-positive and non-finite
/// weights are skipped; returns `None` when nothing carries weight.
pub fn weighted_average<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for (weight, value) in pairs {
        if !weight.is_finite() || weight <= 0.0 || !value.is_finite() {
            continue;
        }
        weighted_sum += weight * value;
        total_weight += weight;
    }

    if total_weight <= 0.0 {
        None
    } else {
        Some(weighted_sum / total_weight)
    }
}

/// Cosine similarity in `[-1, 1]`; `0` when either side has zero magnitude
/// or the lengths differ.
pub fn cosine_similarity(left: &[f64], right: &[f64]) -> f64 {
    if left.len() != right.len() || left.is_empty() {
        return 0.0;
    }

    let dot: f64 = left.iter().zip(right.iter()).map(|(a, b)| a * b).sum();
    let left_magnitude = left.iter().map(|a| a * a).sum::<f64>().sqrt();
    let right_magnitude = right.iter().map(|b| b * b).sum::<f64>().sqrt();

    if left_magnitude < MAGNITUDE_EPSILON || right_magnitude < MAGNITUDE_EPSILON {
        return 0.0;
    }

    let similarity = dot / (left_magnitude * right_magnitude);
    if similarity.is_finite() {
        similarity.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
