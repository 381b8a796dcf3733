use std::f64::consts::TAU;

use partview_protocol::{Point, SegmentRecord, ShapeType};

use crate::geometry::{
    CircularArc, CubicCurve, Curve, GeometryError, IntoPoint, QuadraticCurve,
};

/// Coarse samples taken before refining the closest parameter on a curve.
const SCAN_STEPS: u32 = 50;
const NEWTON_STEPS: usize = 10;
/// Finite-difference step for the distance derivatives.
const NEWTON_H: f64 = 1e-4;

/// A path segment interpreted from a [`SegmentRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Line {
        points: Vec<Point>,
    },
    Cubic {
        control: Vec<Point>,
    },
    Quadratic {
        control: Vec<Point>,
    },
    Arc {
        start: Point,
        end: Point,
        center: Point,
        /// Signed sweep: positive is counter-clockwise.
        sweep_angle: f64,
    },
    Unknown {
        kind: String,
        points: Vec<Point>,
    },
}

impl Segment {
    /// Wire name of the segment kind.
    pub fn kind(&self) -> &str {
        match self {
            Self::Line { .. } => "lineto",
            Self::Cubic { .. } => "splineto",
            Self::Quadratic { .. } => "qsplineto",
            Self::Arc { .. } => "arcto1",
            Self::Unknown { kind, .. } => kind,
        }
    }

    /// Every point listed by the record, in order.
    pub fn control_points(&self) -> Vec<Point> {
        match self {
            Self::Line { points } | Self::Unknown { points, .. } => points.clone(),
            Self::Cubic { control } | Self::Quadratic { control } => control.clone(),
            Self::Arc {
                start, end, center, ..
            } => vec![*start, *end, *center],
        }
    }

    /// The arc geometry, with the radius taken from `|start - center|`.
    pub fn circular_arc(&self) -> Option<CircularArc> {
        match self {
            Self::Arc {
                start,
                center,
                sweep_angle,
                ..
            } => Some(CircularArc::through(*start, *sweep_angle, *center)),
            _ => None,
        }
    }

    /// Position at parameter `t ∈ [0, 1]`, or `None` when the segment cannot
    /// be evaluated (too few points, unknown kind).
    pub fn point_at(&self, t: f64) -> Option<Point> {
        match self {
            Self::Line { points } => match points.as_slice() {
                [p0, p1, ..] => Some(Point::new(
                    p0.x + t * (p1.x - p0.x),
                    p0.y + t * (p1.y - p0.y),
                )),
                _ => None,
            },
            Self::Cubic { control } => CubicCurve::new(control).ok().map(|c| c.eval(t)),
            Self::Quadratic { control } => QuadraticCurve::new(control).ok().map(|c| c.eval(t)),
            Self::Arc { .. } => self.circular_arc().map(|arc| arc.eval(t)),
            Self::Unknown { .. } => None,
        }
    }

    /// Parameter `t ∈ [0, 1]` and position of the point on the segment
    /// closest to `target`.
    ///
    /// Lines use the clamped projection. Bézier curves take the best of 51
    /// samples and refine it with up to 10 Newton steps on the squared
    /// distance. Arcs use the angle from the start, measured in the sweep
    /// direction, so a target behind the start clamps to the end.
    ///
    /// Segments that cannot be evaluated report `t = 0` at their first listed
    /// point; `None` only when there is no point at all.
    pub fn closest_t(&self, target: Point) -> Option<(f64, Point)> {
        let t = match self {
            Self::Line { points } => match points.as_slice() {
                [p0, p1, ..] => closest_t_on_line(*p0, *p1, target),
                _ => 0.0,
            },
            Self::Cubic { control } => {
                CubicCurve::new(control).map_or(0.0, |c| closest_t_on_curve(&c, target))
            }
            Self::Quadratic { control } => {
                QuadraticCurve::new(control).map_or(0.0, |c| closest_t_on_curve(&c, target))
            }
            Self::Arc { .. } => self
                .circular_arc()
                .map_or(0.0, |arc| closest_t_on_arc(&arc, target)),
            Self::Unknown { .. } => 0.0,
        };
        let point = self
            .point_at(t)
            .or_else(|| self.control_points().first().copied())?;
        Some((t, point))
    }
}

fn closest_t_on_line(p0: Point, p1: Point, target: Point) -> f64 {
    let (vx, vy) = (p1.x - p0.x, p1.y - p0.y);
    let mut len2 = vx * vx + vy * vy;
    if len2 == 0.0 {
        len2 = 1.0;
    }
    let t = ((target.x - p0.x) * vx + (target.y - p0.y) * vy) / len2;
    if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 }
}

fn closest_t_on_curve(curve: &impl Curve, target: Point) -> f64 {
    let dist2 = |t: f64| {
        let q = curve.eval(t);
        (q.x - target.x).powi(2) + (q.y - target.y).powi(2)
    };
    let d1 = |t: f64| (dist2(t + NEWTON_H) - dist2(t - NEWTON_H)) / (2.0 * NEWTON_H);
    let d2 = |t: f64| (d1(t + NEWTON_H) - d1(t - NEWTON_H)) / (2.0 * NEWTON_H);

    let mut best = (0..=SCAN_STEPS)
        .map(|i| f64::from(i) / f64::from(SCAN_STEPS))
        .fold((0.0, f64::INFINITY), |(best_t, best_d), t| {
            let d = dist2(t);
            if d < best_d { (t, d) } else { (best_t, best_d) }
        })
        .0;

    for _ in 0..NEWTON_STEPS {
        let curvature = d2(best);
        if curvature.abs() < 1e-8 {
            break;
        }
        best -= d1(best) / curvature;
        if !best.is_finite() {
            return 0.0;
        }
        best = best.clamp(0.0, 1.0);
    }
    best
}

fn closest_t_on_arc(arc: &CircularArc, target: Point) -> f64 {
    if arc.sweep_angle == 0.0 || !arc.sweep_angle.is_finite() {
        return 0.0;
    }
    let dir = arc.sweep_angle.signum();
    let angle = (target.y - arc.center.y).atan2(target.x - arc.center.x);
    let delta = ((angle - arc.start_angle) * dir).rem_euclid(TAU) * dir;
    let t = delta / arc.sweep_angle;
    if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 }
}

impl TryFrom<&SegmentRecord> for Segment {
    type Error = GeometryError;

    /// Fails when a listed point is not 2D or an arc has fewer than three
    /// points. A missing sweep angle reads as 0, a missing sweep flag as
    /// clockwise.
    fn try_from(record: &SegmentRecord) -> Result<Self, Self::Error> {
        let points = record
            .points
            .iter()
            .map(IntoPoint::into_point)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(match &record.shape_type {
            ShapeType::Line => Self::Line { points },
            ShapeType::Cubic => Self::Cubic { control: points },
            ShapeType::Quadratic => Self::Quadratic { control: points },
            ShapeType::Arc => {
                let [start, end, center] = match points.as_slice() {
                    [start, end, center, ..] => [*start, *end, *center],
                    _ => {
                        return Err(GeometryError::TooFewPoints {
                            expected: 3,
                            got: points.len(),
                        });
                    }
                };
                let direction = if record.sweep_flag.unwrap_or(false) {
                    1.0
                } else {
                    -1.0
                };
                Self::Arc {
                    start,
                    end,
                    center,
                    sweep_angle: record.sweep_angle.unwrap_or(0.0) * direction,
                }
            }
            ShapeType::Other(kind) => Self::Unknown {
                kind: kind.clone(),
                points,
            },
        })
    }
}
