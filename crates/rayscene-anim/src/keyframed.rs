//! Keyframed curves.

use crate::AnimError;
use rayscene_math::{bernstein, Range1, Vec3};

/// Offset keeping clamped times inside the last segment.
const END_EPSILON: f64 = 1e-8;

/// A piecewise Bezier curve of 3D values over time.
///
/// `times` holds the segment breakpoints; segment `k` spans
/// `[times[k], times[k + 1]]` and blends the `degree + 1` control values
/// starting at `values[k * (degree + 1)]`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframedValue {
    times: Vec<f64>,
    values: Vec<Vec3>,
    degree: usize,
}

impl KeyframedValue {
    /// Build a curve, checking that times do not decrease and that every
    /// segment has its control values.
    pub fn new(times: Vec<f64>, values: Vec<Vec3>, degree: usize) -> Result<Self, AnimError> {
        if times.len() < 2 {
            return Err(AnimError::TooFewTimes(times.len()));
        }
        if let Some(index) = (1..times.len()).find(|&i| times[i] < times[i - 1]) {
            return Err(AnimError::DecreasingTimes { index });
        }
        let expected = (times.len() - 1) * (degree + 1);
        if values.len() != expected {
            return Err(AnimError::ValueCount {
                expected,
                found: values.len(),
            });
        }
        Ok(Self { times, values, degree })
    }

    /// Piecewise-linear curve through `(time, value)` keys.
    pub fn linear(keys: &[(f64, Vec3)]) -> Result<Self, AnimError> {
        let times = keys.iter().map(|(t, _)| *t).collect();
        let values = keys.windows(2).flat_map(|w| [w[0].1, w[1].1]).collect();
        Self::new(times, values, 1)
    }

    /// Breakpoint times.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Control values.
    pub fn values(&self) -> &[Vec3] {
        &self.values
    }

    /// Bezier degree of each segment.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of segments.
    pub fn segments(&self) -> usize {
        self.values.len() / (self.degree + 1)
    }

    /// `[first time, last time]`.
    pub fn interval(&self) -> Range1 {
        Range1::new(self.times[0], self.times[self.times.len() - 1])
    }

    /// Value at time `t`; times outside the interval are clamped.
    pub fn value(&self, t: f64) -> Vec3 {
        let interval = self.interval();
        let t = t.max(interval.min).min(interval.max - END_EPSILON);

        let k = (1..self.times.len())
            .find(|&j| t >= self.times[j - 1] && t < self.times[j])
            .map_or(0, |j| j - 1);
        let span = self.times[k + 1] - self.times[k];
        let u = if span > 0.0 { (t - self.times[k]) / span } else { 0.0 };

        let base = k * (self.degree + 1);
        (0..=self.degree)
            .map(|i| self.values[base + i] * bernstein(u, i, self.degree))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_curve() {
        let curve = KeyframedValue::linear(&[(0.0, Vec3::zeros()), (2.0, Vec3::new(2.0, 4.0, 0.0))]).unwrap();
        assert_relative_eq!(curve.value(1.0), Vec3::new(1.0, 2.0, 0.0), epsilon = 1e-12);
        assert_eq!(curve.segments(), 1);
        assert_eq!(curve.interval(), Range1::new(0.0, 2.0));
    }

    #[test]
    fn test_clamps_outside_interval() {
        let curve = KeyframedValue::linear(&[(1.0, Vec3::x()), (2.0, Vec3::y())]).unwrap();
        assert_relative_eq!(curve.value(-5.0), Vec3::x(), epsilon = 1e-12);
        assert_relative_eq!(curve.value(10.0), Vec3::y(), epsilon = 1e-6);
    }

    #[test]
    fn test_segment_lookup() {
        let curve = KeyframedValue::linear(&[
            (0.0, Vec3::zeros()),
            (1.0, Vec3::new(1.0, 0.0, 0.0)),
            (3.0, Vec3::new(1.0, 2.0, 0.0)),
        ])
        .unwrap();
        assert_relative_eq!(curve.value(0.5), Vec3::new(0.5, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(curve.value(2.0), Vec3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_cubic_segment_endpoints_and_midpoint() {
        let p = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let curve = KeyframedValue::new(vec![0.0, 1.0], p.to_vec(), 3).unwrap();
        assert_relative_eq!(curve.value(0.0), p[0], epsilon = 1e-12);
        assert_relative_eq!(curve.value(0.5), Vec3::new(0.75, 0.5, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(
            KeyframedValue::new(vec![0.0], vec![], 1),
            Err(AnimError::TooFewTimes(1))
        );
        assert_eq!(
            KeyframedValue::new(vec![0.0, 2.0, 1.0], vec![Vec3::zeros(); 4], 1),
            Err(AnimError::DecreasingTimes { index: 2 })
        );
        assert_eq!(
            KeyframedValue::new(vec![0.0, 1.0], vec![Vec3::zeros(); 3], 1),
            Err(AnimError::ValueCount { expected: 2, found: 3 })
        );
    }
}
