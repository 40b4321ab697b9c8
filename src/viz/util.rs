//! Utility functions for rendering: marker geometry, axis ranges, tick labels.

use crate::scale::value_range;

/// Largest radius a marker is drawn with, well past any figure diagonal.
pub const MAX_MARKER_RADIUS_PX: i32 = 4096;

/// Radius in pixels of a marker with the given area (square pixels),
/// clamped to `[1, MAX_MARKER_RADIUS_PX]`.
#[inline]
pub fn marker_radius_px(area: f64) -> i32 {
    if area.is_nan() || area <= 0.0 {
        return 1;
    }
    (area.sqrt() / 2.0)
        .round()
        .clamp(1.0, f64::from(MAX_MARKER_RADIUS_PX)) as i32
}

/// Axis range covering `values` with `pad` (fraction of the span) on both sides.
/// Widened to ±1 around a single value, `(0, 1)` when there is nothing finite.
pub fn padded_range(values: &[f64], pad: f64) -> (f64, f64) {
    match value_range(values) {
        None => (0.0, 1.0),
        Some((lo, hi)) if (hi - lo).abs() < f64::EPSILON => (lo - 1.0, hi + 1.0),
        Some((lo, hi)) => {
            let margin = (hi - lo) * pad;
            (lo - margin, hi + margin)
        }
    }
}

/// `count` evenly spaced tick values from `lo` to `hi`.
pub fn ticks(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    if count < 2 {
        return vec![lo];
    }
    let step = (hi - lo) / (count - 1) as f64;
    (0..count).map(|i| lo + step * i as f64).collect()
}

/// Compact tick label: fewer decimals for larger magnitudes, scientific notation
/// outside `[1e-3, 1e6)`.
pub fn format_tick(v: f64) -> String {
    let a = v.abs();
    if a == 0.0 {
        return "0".to_string();
    }
    if !(1.0e-3..1.0e6).contains(&a) {
        return format!("{v:.1e}");
    }
    let prec = if a >= 100.0 {
        0
    } else if a >= 10.0 {
        1
    } else {
        2
    };
    format!("{:.*}", prec, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_from_area() {
        assert_eq!(marker_radius_px(400.0), 10);
        assert_eq!(marker_radius_px(0.0), 1);
        assert_eq!(marker_radius_px(f64::NAN), 1);
        assert_eq!(marker_radius_px(1e20), MAX_MARKER_RADIUS_PX);
        assert_eq!(marker_radius_px(f64::INFINITY), MAX_MARKER_RADIUS_PX);
    }

    #[test]
    fn padded_ranges() {
        assert_eq!(padded_range(&[0.0, 10.0], 0.1), (-1.0, 11.0));
        assert_eq!(padded_range(&[3.0, 3.0], 0.1), (2.0, 4.0));
        assert_eq!(padded_range(&[], 0.1), (0.0, 1.0));
    }

    #[test]
    fn tick_labels() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(1234.4), "1234");
        assert_eq!(format_tick(12.34), "12.3");
        assert_eq!(format_tick(0.5), "0.50");
        assert_eq!(format_tick(2.5e7), "2.5e7");
    }
}
