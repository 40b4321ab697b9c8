//! Linear rescaling of raw channel values.

use crate::error::{ChartError, Result};

/// Minimum and maximum over the finite entries of `values`.
pub fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Map `values` linearly so that their minimum lands on `vmin` and their maximum on `vmax`.
///
/// Empty input yields empty output. Input whose finite values are all equal has no
/// span to divide by and returns [`ChartError::DegenerateScale`].
pub fn linscale(values: &[f64], vmin: f64, vmax: f64) -> Result<Vec<f64>> {
    let Some((lo, hi)) = value_range(values) else {
        return Ok(Vec::new());
    };
    let span = hi - lo;
    if span == 0.0 {
        return Err(ChartError::DegenerateScale { value: lo });
    }
    Ok(values
        .iter()
        .map(|v| vmin + (v - lo) / span * (vmax - vmin))
        .collect())
}

/// Value range a colormap is stretched over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRange {
    pub lo: f64,
    pub hi: f64,
}

impl ColorRange {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Range of the full channel; `None` when there is no finite value.
    pub fn of(values: &[f64]) -> Option<Self> {
        value_range(values).map(|(lo, hi)| Self { lo, hi })
    }

    /// Position of `v` inside the range, clamped to `[0, 1]`.
    /// A zero-span range maps everything to the colormap midpoint.
    pub fn normalize(&self, v: f64) -> f64 {
        let span = self.hi - self.lo;
        if span == 0.0 || !span.is_finite() {
            return 0.5;
        }
        ((v - self.lo) / span).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn output_spans_target_range() {
        let inputs: [&[f64]; 4] = [
            &[1.0, 2.0, 3.0, 4.0],
            &[-5.0, 12.5, 0.1],
            &[1e-6, 3e-6, 2e-6, 9e-6],
            &[40.0, 10.0, 30.0, 20.0],
        ];
        for values in inputs {
            for (lo, hi) in [(50.0, 500.0), (0.0, 1.0), (10.0, -10.0)] {
                let out = linscale(values, lo, hi).unwrap();
                let (omin, omax) = value_range(&out).unwrap();
                assert!(close(omin, lo.min(hi)), "{values:?} -> {out:?}");
                assert!(close(omax, lo.max(hi)), "{values:?} -> {out:?}");
            }
        }
    }

    #[test]
    fn preserves_order_and_length() {
        let out = linscale(&[1.0, 2.0, 3.0, 4.0], 50.0, 500.0).unwrap();
        assert_eq!(out, vec![50.0, 200.0, 350.0, 500.0]);
    }

    #[test]
    fn degenerate_input_is_rejected() {
        assert_eq!(
            linscale(&[7.0, 7.0, 7.0], 0.0, 1.0),
            Err(ChartError::DegenerateScale { value: 7.0 })
        );
        assert_eq!(linscale(&[], 0.0, 1.0), Ok(vec![]));
    }

    #[test]
    fn non_finite_values_do_not_stretch_range() {
        assert_eq!(value_range(&[f64::NAN, 2.0, 8.0, f64::INFINITY]), Some((2.0, 8.0)));
    }

    #[test]
    fn color_range_normalizes() {
        let r = ColorRange::new(10.0, 40.0);
        assert!(close(r.normalize(20.0), 1.0 / 3.0));
        assert_eq!(r.normalize(-3.0), 0.0);
        assert_eq!(r.normalize(99.0), 1.0);
        assert_eq!(ColorRange::new(3.0, 3.0).normalize(3.0), 0.5);
    }
}
