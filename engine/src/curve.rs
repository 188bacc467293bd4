use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

/// Piecewise-linear float curve, clamped to the first and last key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FloatCurve {
    keys: Vec<CurveKey>,
}

impl FloatCurve {
    pub fn new(mut keys: Vec<CurveKey>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    pub fn from_pairs(pairs: &[(f32, f32)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|&(time, value)| CurveKey { time, value })
                .collect(),
        )
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys deserialized from a file are taken as written.
    pub fn is_sorted(&self) -> bool {
        self.keys.windows(2).all(|pair| pair[0].time <= pair[1].time)
    }

    pub fn value_at(&self, time: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };

        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if time >= a.time && time <= b.time {
                let span = b.time - a.time;
                if span <= f32::EPSILON {
                    return b.value;
                }
                let t = (time - a.time) / span;
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
    fn test_empty_curve_evaluates_to_zero() {
        assert_eq!(FloatCurve::default().value_at(3.0), 0.0);
    }

    #[test]
    fn test_interpolates_between_keys() {
        let curve = FloatCurve::from_pairs(&[(0.0, 1.0), (2.0, 0.5), (4.0, 0.3)]);

        assert_eq!(curve.value_at(0.0), 1.0);
        assert!((curve.value_at(1.0) - 0.75).abs() < 1e-6);
        assert!((curve.value_at(3.0) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_clamps_outside_range() {
        let curve = FloatCurve::from_pairs(&[(4.0, 0.3), (0.0, 1.0)]);

        assert!(curve.is_sorted());
        assert_eq!(curve.value_at(-1.0), 1.0);
        assert_eq!(curve.value_at(10.0), 0.3);
    }
}
