use partview_protocol::{Bounds, Point, SegmentRecord};
use thiserror::Error;
use tracing::debug;

use crate::config::{BoundsConfig, UnknownSegmentPolicy};
use crate::geometry::{CubicCurve, Curve, Extents, IntoPoint, QuadraticCurve};
use crate::segment::Segment;

#[derive(Debug, Error)]
pub enum BoundsError {
    #[error("unknown segment kind `{kind}`")]
    UnknownSegment { kind: String },
}

/// Reduce a list of segment records into one padded bounding box.
///
/// Per-segment problems never abort the reduction: a record that cannot be
/// interpreted contributes whichever of its raw points are 2D, curves fall
/// back as described on [`segment_extents`], and non-finite points are
/// skipped. When nothing finite is left the result is the fixed
/// `±fallback_half_extent` square around the origin.
///
/// The only error is an unrecognized segment kind under
/// [`UnknownSegmentPolicy::Reject`].
pub fn compute_bounds(
    records: &[SegmentRecord],
    config: &BoundsConfig,
) -> Result<Bounds, BoundsError> {
    let mut acc: Option<Extents> = None;

    for record in records {
        let found = match Segment::try_from(record) {
            Ok(segment) => segment_extents(&segment, config)?,
            Err(err) => {
                debug!(id = ?record.id, error = %err, "malformed segment, using raw points");
                Extents::from_points(
                    record
                        .points
                        .iter()
                        .filter_map(|raw| raw.into_point().ok()),
                )
            }
        };
        if let Some(found) = found {
            acc = Some(match acc {
                Some(acc) => acc.union(found),
                None => found,
            });
        }
    }

    Ok(padded(acc, config))
}

/// Extents of a single segment, or `None` if it has no finite points.
///
/// - lines: every listed point;
/// - Bézier curves: analytic extents, or every control point when the curve
///   cannot be built (conservative);
/// - arcs: analytic extents, then `arc_sample_steps` samples, then the start
///   point plus `(center.x + r, center.y)`;
/// - unknown kinds: every listed point, or an error under
///   [`UnknownSegmentPolicy::Reject`].
pub fn segment_extents(
    segment: &Segment,
    config: &BoundsConfig,
) -> Result<Option<Extents>, BoundsError> {
    let extents = match segment {
        Segment::Line { points } => Extents::from_points(points.iter().copied()),
        Segment::Cubic { control } => match CubicCurve::new(control).and_then(|c| c.extents()) {
            Ok(e) => Some(e),
            Err(err) => {
                debug!(error = %err, "cubic fallback to control points");
                Extents::from_points(control.iter().copied())
            }
        },
        Segment::Quadratic { control } => {
            match QuadraticCurve::new(control).and_then(|c| c.extents()) {
                Ok(e) => Some(e),
                Err(err) => {
                    debug!(error = %err, "quadratic fallback to control points");
                    Extents::from_points(control.iter().copied())
                }
            }
        }
        Segment::Arc { start, center, .. } => {
            let arc = segment.circular_arc();
            match arc.map(|a| a.extents()) {
                Some(Ok(e)) => Some(e),
                other => {
                    if let Some(Err(err)) = other {
                        debug!(error = %err, "arc fallback to sampling");
                    }
                    arc.and_then(|a| a.sampled_extents(config.arc_sample_steps))
                        .or_else(|| {
                            let radius = start.distance(*center);
                            Extents::from_points([
                                *start,
                                Point::new(center.x + radius, center.y),
                            ])
                        })
                }
            }
        }
        Segment::Unknown { kind, points } => match config.unknown_segments {
            UnknownSegmentPolicy::ControlPoints => {
                debug!(kind = %kind, "unknown segment kind, using listed points");
                Extents::from_points(points.iter().copied())
            }
            UnknownSegmentPolicy::Reject => {
                return Err(BoundsError::UnknownSegment { kind: kind.clone() });
            }
        },
    };
    Ok(extents)
}

fn padded(extents: Option<Extents>, config: &BoundsConfig) -> Bounds {
    let Some(e) = extents else {
        let h = config.fallback_half_extent;
        return Bounds::new(-h, -h, h, h);
    };
    let pad_x = pad(e.width(), config);
    let pad_y = pad(e.height(), config);
    Bounds::new(
        e.min.x - pad_x,
        e.min.y - pad_y,
        e.max.x + pad_x,
        e.max.y + pad_y,
    )
}

fn pad(extent: f64, config: &BoundsConfig) -> f64 {
    let pad = extent * config.pad_fraction;
    if pad == 0.0 || !pad.is_finite() {
        config.min_pad
    } else {
        pad
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn bounds(records: &[SegmentRecord]) -> Bounds {
        compute_bounds(records, &BoundsConfig::default()).unwrap()
    }

    fn assert_bounds(b: Bounds, expected: (f64, f64, f64, f64)) {
        assert_abs_diff_eq!(b.min_x, expected.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b.min_y, expected.1, epsilon = 1e-9);
        assert_abs_diff_eq!(b.max_x, expected.2, epsilon = 1e-9);
        assert_abs_diff_eq!(b.max_y, expected.3, epsilon = 1e-9);
    }

    #[test]
    fn empty_input_uses_fallback_square() {
        assert_eq!(bounds(&[]), Bounds::new(-10.0, -10.0, 10.0, 10.0));
    }

    #[test]
    fn all_non_finite_uses_fallback_square() {
        let records = [
            SegmentRecord::new("lineto", vec![vec![f64::NAN, 0.0], vec![f64::INFINITY, 1.0]]),
            SegmentRecord::new("lineto", vec![vec![0.0, f64::NEG_INFINITY]]),
        ];
        assert_eq!(bounds(&records), Bounds::new(-10.0, -10.0, 10.0, 10.0));
    }

    #[test]
    fn lines_are_padded_by_five_percent() {
        let records = [
            SegmentRecord::new("lineto", vec![vec![0.0, 0.0], vec![100.0, 0.0]]),
            SegmentRecord::new("lineto", vec![vec![100.0, 0.0], vec![100.0, 50.0]]),
        ];
        assert_bounds(bounds(&records), (-5.0, -2.5, 105.0, 52.5));
    }

    #[test]
    fn zero_extent_axis_pads_by_one_unit() {
        let records = [SegmentRecord::new(
            "lineto",
            vec![vec![0.0, 3.0], vec![20.0, 3.0]],
        )];
        assert_bounds(bounds(&records), (-1.0, 2.0, 21.0, 4.0));

        let single = [SegmentRecord::new("lineto", vec![vec![2.0, 2.0]])];
        assert_bounds(bounds(&single), (1.0, 1.0, 3.0, 3.0));
    }

    #[test]
    fn non_finite_points_are_skipped() {
        let records = [SegmentRecord::new(
            "lineto",
            vec![vec![0.0, 0.0], vec![f64::NAN, 500.0], vec![10.0, 10.0]],
        )];
        assert_bounds(bounds(&records), (-0.5, -0.5, 10.5, 10.5));
    }

    #[test]
    fn cubic_uses_analytic_extents() {
        let records = [SegmentRecord::new(
            "splineto",
            vec![vec![0.0, 0.0], vec![0.0, 4.0], vec![10.0, 4.0], vec![10.0, 0.0]],
        )];
        // Curve peaks at y=3, not at the control polygon's 4.
        assert_bounds(bounds(&records), (-0.5, -0.15, 10.5, 3.15));
    }

    #[test]
    fn malformed_cubic_falls_back_to_control_points() {
        let records = [SegmentRecord::new(
            "splineto",
            vec![vec![0.0, 0.0], vec![0.0, 4.0], vec![10.0, 4.0]],
        )];
        assert_bounds(bounds(&records), (-0.5, -0.2, 10.5, 4.2));
    }

    #[test]
    fn quadratic_uses_analytic_extents() {
        let records = [SegmentRecord::new(
            "qsplineto",
            vec![vec![0.0, 0.0], vec![5.0, 8.0], vec![10.0, 0.0]],
        )];
        assert_bounds(bounds(&records), (-0.5, -0.2, 10.5, 4.2));
    }

    #[test]
    fn arc_uses_sweep_flag_direction() {
        let points = vec![vec![10.0, 0.0], vec![-10.0, 0.0], vec![0.0, 0.0]];
        // Counter-clockwise half turn from 0° passes through 90° (top).
        let ccw = [SegmentRecord::new("arcto1", points.clone()).with_sweep(PI, true)];
        assert_bounds(bounds(&ccw), (-11.0, -0.5, 11.0, 10.5));
        // Clockwise half turn passes through -90° (bottom).
        let cw = [SegmentRecord::new("arcto1", points).with_sweep(PI, false)];
        assert_bounds(bounds(&cw), (-11.0, -10.5, 11.0, 0.5));
    }

    #[test]
    fn non_finite_arc_falls_back_to_start_and_radius_point() {
        // Sweep is NaN: analytic and sampled extents fail, so the start
        // point and (cx + r, cy) are used.
        let segment = Segment::Arc {
            start: Point::new(0.0, 5.0),
            end: Point::new(5.0, 0.0),
            center: Point::new(0.0, 0.0),
            sweep_angle: f64::NAN,
        };
        let e = segment_extents(&segment, &BoundsConfig::default())
            .unwrap()
            .unwrap();
        assert_abs_diff_eq!(e.min.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(e.max.x, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(e.min.y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(e.max.y, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn malformed_arc_uses_raw_points() {
        let records = [
            SegmentRecord::new("arcto1", vec![vec![0.0, 0.0], vec![4.0, 2.0, 9.0]])
                .with_sweep(FRAC_PI_2, true),
        ];
        // Only the first (2D) point survives.
        assert_bounds(bounds(&records), (-1.0, -1.0, 1.0, 1.0));
    }

    #[test]
    fn unknown_kinds_follow_policy() {
        let records = [
            SegmentRecord::new("lineto", vec![vec![0.0, 0.0], vec![10.0, 10.0]]),
            SegmentRecord::new("ellipseto", vec![vec![20.0, 20.0]]).with_id("e1"),
        ];
        assert_bounds(bounds(&records), (-1.0, -1.0, 21.0, 21.0));

        let strict = BoundsConfig::default().with_unknown_segments(UnknownSegmentPolicy::Reject);
        let err = compute_bounds(&records, &strict).unwrap_err();
        assert!(matches!(err, BoundsError::UnknownSegment { ref kind } if kind == "ellipseto"));
    }

    #[test]
    fn one_bad_segment_does_not_spoil_the_rest() {
        let records = [
            SegmentRecord::new("splineto", vec![vec![f64::NAN, 1.0]]),
            SegmentRecord::new("lineto", vec![vec![0.0, 0.0], vec![20.0, 20.0]]),
            SegmentRecord::new("qsplineto", vec![vec![1.0]]),
        ];
        assert_bounds(bounds(&records), (-1.0, -1.0, 21.0, 21.0));
    }
}
