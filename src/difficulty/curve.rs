//! Piecewise-linear response curves, deserializable from the tuning tables

use serde::{Deserialize, Serialize};

/// One keyframe: at input `at`, the curve outputs `value`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub at: f32,
    pub value: f32,
}

/// Sorted keyframe list with linear interpolation and clamped ends
///
/// Queries before the first key return the first value; past the last
/// key, the last value. A single-key curve is a constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseCurve {
    keys: Vec<CurveKey>,
}

impl ResponseCurve {
    /// Build from keyframes; they are sorted by input on construction
    pub fn new(mut keys: Vec<CurveKey>) -> Self {
        keys.sort_by(|a, b| a.at.partial_cmp(&b.at).unwrap_or(std::cmp::Ordering::Equal));
        Self { keys }
    }

    pub fn constant(value: f32) -> Self {
        Self { keys: vec![CurveKey { at: 0.0, value }] }
    }

    /// Straight line between two points
    pub fn linear(from: (f32, f32), to: (f32, f32)) -> Self {
        Self::new(vec![
            CurveKey { at: from.0, value: from.1 },
            CurveKey { at: to.0, value: to.1 },
        ])
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn evaluate(&self, x: f32) -> f32 {
        let Some(first) = self.keys.first() else { return 0.0 };
        if x <= first.at {
            return first.value;
        }
        let last = self.keys.last().expect("non-empty");
        if x >= last.at {
            return last.value;
        }
        // x lies strictly between two keys
        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if x <= b.at {
                let span = b.at - a.at;
                if span <= f32::EPSILON {
                    return b.value;
                }
                let t = (x - a.at) / span;
                return a.value + (b.value - a.value) * t;
            }
        }
        last.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolates_between_keys() {
        let curve = ResponseCurve::linear((0.0, 0.0), (10.0, 1.0));
        assert_eq!(curve.evaluate(5.0), 0.5);
        assert_eq!(curve.evaluate(2.5), 0.25);
    }

    #[test]
    fn test_ends_are_clamped() {
        let curve = ResponseCurve::linear((0.0, 0.2), (10.0, 0.8));
        assert_eq!(curve.evaluate(-5.0), 0.2);
        assert_eq!(curve.evaluate(50.0), 0.8);
    }

    #[test]
    fn test_unsorted_keys_are_sorted() {
        let curve = ResponseCurve::new(vec![
            CurveKey { at: 10.0, value: 1.0 },
            CurveKey { at: 0.0, value: 0.0 },
            CurveKey { at: 5.0, value: 0.2 },
        ]);
        assert_eq!(curve.evaluate(0.0), 0.0);
        assert_eq!(curve.evaluate(5.0), 0.2);
        assert!((curve.evaluate(7.5) - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_empty_curve_returns_zero() {
        let curve = ResponseCurve::new(vec![]);
        assert_eq!(curve.evaluate(3.0), 0.0);
    }

    #[test]
    fn test_constant_curve() {
        let curve = ResponseCurve::constant(0.4);
        assert_eq!(curve.evaluate(-1.0), 0.4);
        assert_eq!(curve.evaluate(99.0), 0.4);
    }
}
