use kurbo::{CubicBez, ParamCurve, ParamCurveExtrema, QuadBez};
use partview_protocol::Point;

use super::{Extents, GeometryError};

/// A parametric path segment over `t ∈ [0, 1]` with a known bounding box.
pub trait Curve {
    /// Position at parameter `t`.
    fn eval(&self, t: f64) -> Point;

    /// Exact axis-aligned extents.
    fn extents(&self) -> Result<Extents, GeometryError>;

    /// Extents of `steps + 1` evenly spaced samples, skipping non-finite ones.
    ///
    /// This is an approximation: extrema falling between two samples are
    /// missed, so the result can undershoot the true box. Only use it when
    /// [`Curve::extents`] is unavailable.
    fn sampled_extents(&self, steps: usize) -> Option<Extents> {
        let steps = steps.max(1);
        Extents::from_points((0..=steps).map(|i| self.eval(i as f64 / steps as f64)))
    }
}

/// Cubic Bézier segment `[p0, c1, c2, p3]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicCurve(CubicBez);

impl CubicCurve {
    /// Build from the first four control points.
    pub fn new(control: &[Point]) -> Result<Self, GeometryError> {
        let [p0, p1, p2, p3] = match control {
            [p0, p1, p2, p3, ..] => [*p0, *p1, *p2, *p3],
            _ => {
                return Err(GeometryError::TooFewPoints {
                    expected: 4,
                    got: control.len(),
                });
            }
        };
        check_finite(&[p0, p1, p2, p3])?;
        Ok(Self(CubicBez::new(
            to_kurbo(p0),
            to_kurbo(p1),
            to_kurbo(p2),
            to_kurbo(p3),
        )))
    }
}

impl Curve for CubicCurve {
    fn eval(&self, t: f64) -> Point {
        from_kurbo(self.0.eval(t))
    }

    fn extents(&self) -> Result<Extents, GeometryError> {
        Ok(rect_extents(self.0.bounding_box()))
    }
}

/// Quadratic Bézier segment `[p0, c, p2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticCurve(QuadBez);

impl QuadraticCurve {
    /// Build from the first three control points.
    pub fn new(control: &[Point]) -> Result<Self, GeometryError> {
        let [p0, p1, p2] = match control {
            [p0, p1, p2, ..] => [*p0, *p1, *p2],
            _ => {
                return Err(GeometryError::TooFewPoints {
                    expected: 3,
                    got: control.len(),
                });
            }
        };
        check_finite(&[p0, p1, p2])?;
        Ok(Self(QuadBez::new(to_kurbo(p0), to_kurbo(p1), to_kurbo(p2))))
    }
}

impl Curve for QuadraticCurve {
    fn eval(&self, t: f64) -> Point {
        from_kurbo(self.0.eval(t))
    }

    fn extents(&self) -> Result<Extents, GeometryError> {
        Ok(rect_extents(self.0.bounding_box()))
    }
}

fn check_finite(points: &[Point]) -> Result<(), GeometryError> {
    if points.iter().all(Point::is_finite) {
        Ok(())
    } else {
        Err(GeometryError::NonFinite("control point"))
    }
}

fn to_kurbo(p: Point) -> kurbo::Point {
    kurbo::Point::new(p.x, p.y)
}

fn from_kurbo(p: kurbo::Point) -> Point {
    Point::new(p.x, p.y)
}

fn rect_extents(rect: kurbo::Rect) -> Extents {
    Extents {
        min: Point::new(rect.min_x(), rect.min_y()),
        max: Point::new(rect.max_x(), rect.max_y()),
    }
}
