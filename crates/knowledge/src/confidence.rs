//! Retrieval gating: turns the best raw distance into accept/reject plus a
//! calibrated confidence.

use grounded_core::{AppError, AppResult};

/// Default maximum distance at which retrieval is trusted.
pub const DEFAULT_THRESHOLD: f64 = 0.35;

/// Gating decision for one retrieval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Whether the evidence is strong enough to generate an answer
    pub accept: bool,
}

/// Estimate confidence from the best (lowest) raw distance.
///
/// Retrieval is accepted when `best_distance <= threshold`. Confidence falls
/// linearly from 1.0 at distance 0 to 0.0 at the threshold and is clamped
/// outside that range. `threshold` must be positive; callers validate it once
/// at engine construction.
pub fn estimate(best_distance: f64, threshold: f64) -> AppResult<Estimate> {
    if !best_distance.is_finite() {
        return Err(AppError::Index(format!(
            "Retrieval returned a non-finite distance: {}",
            best_distance
        )));
    }

    let accept = best_distance <= threshold;
    let confidence = if best_distance <= 0.0 {
        1.0
    } else {
        (1.0 - best_distance / threshold).clamp(0.0, 1.0)
    };

    Ok(Estimate { confidence, accept })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_or_negative_distance_is_full_confidence() {
        for threshold in [0.01, 0.35, 1.0, 10.0] {
            for distance in [0.0, -0.0, -0.2] {
                let est = estimate(distance, threshold).unwrap();
                assert_eq!(est.confidence, 1.0);
                assert!(est.accept);
            }
        }
    }

    #[test]
    fn test_distance_at_threshold() {
        let est = estimate(0.35, 0.35).unwrap();
        assert_eq!(est.confidence, 0.0);
        assert!(est.accept);
    }

    #[test]
    fn test_distance_above_threshold_rejects() {
        let est = estimate(0.5, 0.35).unwrap();
        assert!(!est.accept);
        assert_eq!(est.confidence, 0.0);
    }

    #[test]
    fn test_linear_inside_threshold() {
        let est = estimate(0.1, 0.35).unwrap();
        assert!(est.accept);
        assert!((est.confidence - 0.7142857142857143).abs() < 1e-12);
    }

    #[test]
    fn test_monotonic_non_increasing() {
        let threshold = DEFAULT_THRESHOLD;
        let mut previous = f64::INFINITY;
        for step in 0..=100 {
            let distance = -0.5 + step as f64 * 0.01;
            let est = estimate(distance, threshold).unwrap();
            assert!(est.confidence <= previous);
            assert!((0.0..=1.0).contains(&est.confidence));
            previous = est.confidence;
        }
    }

    #[test]
    fn test_non_finite_distance_is_error() {
        for distance in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = estimate(distance, DEFAULT_THRESHOLD).unwrap_err();
            assert!(matches!(err, AppError::Index(_)));
        }
    }
}
