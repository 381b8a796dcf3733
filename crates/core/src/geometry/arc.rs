use std::f64::consts::{FRAC_PI_2, PI, TAU};

use partview_protocol::Point;

use super::{Curve, Extents, GeometryError, IntoPoint};

/// Cardinal angles with their exact unit vectors. Each is where the arc's x
/// or y coordinate reaches a local extremum.
const CARDINALS: [(f64, f64, f64); 4] = [
    (0.0, 1.0, 0.0),
    (FRAC_PI_2, 0.0, 1.0),
    (PI, -1.0, 0.0),
    (3.0 * FRAC_PI_2, 0.0, -1.0),
];

/// Tight axis-aligned bounding box of a circular arc.
///
/// The arc starts at `start_angle` and sweeps `sweep_angle` radians; a
/// positive sweep runs counter-clockwise, a negative one clockwise. The box
/// covers both endpoints plus every cardinal point strictly inside the sweep.
/// Any sweep of a full turn or more covers the whole circle.
///
/// Fails when `center` is not 2D, when `radius` is negative, or when any input
/// is non-finite. A zero radius yields a single-point box at `center`.
pub fn arc_extents(
    start_angle: f64,
    sweep_angle: f64,
    radius: f64,
    center: impl IntoPoint,
) -> Result<Extents, GeometryError> {
    let center = center.into_point()?;
    if radius < 0.0 {
        return Err(GeometryError::NegativeRadius(radius));
    }
    if !radius.is_finite() {
        return Err(GeometryError::NonFinite("radius"));
    }
    if !center.is_finite() {
        return Err(GeometryError::NonFinite("center"));
    }
    if !start_angle.is_finite() || !sweep_angle.is_finite() {
        return Err(GeometryError::NonFinite("angle"));
    }

    if sweep_angle.abs() >= TAU {
        return Ok(Extents {
            min: Point::new(center.x - radius, center.y - radius),
            max: Point::new(center.x + radius, center.y + radius),
        });
    }

    let on_circle = |angle: f64| {
        Point::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        )
    };

    let end_angle = start_angle + sweep_angle;
    let mut extents = Extents::point(on_circle(start_angle));
    extents.include(on_circle(end_angle));

    let ccw = sweep_angle > 0.0;
    for (cardinal, ux, uy) in CARDINALS {
        let angle = unwrap_toward(cardinal, start_angle, ccw);
        let inside = if ccw {
            angle < end_angle
        } else {
            angle > end_angle
        };
        if inside {
            extents.include(Point::new(center.x + radius * ux, center.y + radius * uy));
        }
    }

    Ok(extents)
}

/// Same as [`arc_extents`], with the start angle derived from a point on the
/// arc. `radius` is taken as given and not checked against the distance from
/// `center` to `start_point`.
pub fn arc_extents_from_start_point(
    start_point: impl IntoPoint,
    sweep_angle: f64,
    radius: f64,
    center: impl IntoPoint,
) -> Result<Extents, GeometryError> {
    let start_point = start_point.into_point()?;
    let center = center.into_point()?;
    let start_angle = (start_point.y - center.y).atan2(start_point.x - center.x);
    arc_extents(start_angle, sweep_angle, radius, center)
}

/// Shift `angle` by whole turns so it is comparable to `start` in the sweep
/// direction: the smallest equivalent `>= start` for counter-clockwise sweeps,
/// the largest equivalent `<= start` otherwise.
fn unwrap_toward(angle: f64, start: f64, ccw: bool) -> f64 {
    if ccw {
        start + (angle - start).rem_euclid(TAU)
    } else {
        start - (start - angle).rem_euclid(TAU)
    }
}

/// A circular arc segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularArc {
    pub start_angle: f64,
    pub sweep_angle: f64,
    pub radius: f64,
    pub center: Point,
}

impl CircularArc {
    pub fn new(start_angle: f64, sweep_angle: f64, radius: f64, center: Point) -> Self {
        Self {
            start_angle,
            sweep_angle,
            radius,
            center,
        }
    }

    /// Arc through `start_point` around `center`, with the radius taken from
    /// their distance.
    pub fn through(start_point: Point, sweep_angle: f64, center: Point) -> Self {
        Self {
            start_angle: (start_point.y - center.y).atan2(start_point.x - center.x),
            sweep_angle,
            radius: start_point.distance(center),
            center,
        }
    }

    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep_angle
    }
}

impl Curve for CircularArc {
    fn eval(&self, t: f64) -> Point {
        let angle = self.start_angle + t * self.sweep_angle;
        Point::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    fn extents(&self) -> Result<Extents, GeometryError> {
        arc_extents(self.start_angle, self.sweep_angle, self.radius, self.center)
    }
}
