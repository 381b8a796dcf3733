pub mod arc;
pub mod curve;

pub use arc::{CircularArc, arc_extents, arc_extents_from_start_point};
pub use curve::{CubicCurve, Curve, QuadraticCurve};

use partview_protocol::{Bounds, Point};
use thiserror::Error;

/// Invalid geometric input. Every variant is a caller precondition violation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("point must be 2D, got {0} components")]
    NotTwoDimensional(usize),
    #[error("radius cannot be negative: {0}")]
    NegativeRadius(f64),
    #[error("non-finite {0}")]
    NonFinite(&'static str),
    #[error("expected at least {expected} points, got {got}")]
    TooFewPoints { expected: usize, got: usize },
}

/// Conversion of loosely typed coordinates into a [`Point`].
///
/// Raw coordinate lists coming from segment records are only accepted when
/// they have exactly two components.
pub trait IntoPoint {
    fn into_point(self) -> Result<Point, GeometryError>;
}

impl IntoPoint for Point {
    fn into_point(self) -> Result<Point, GeometryError> {
        Ok(self)
    }
}

impl IntoPoint for [f64; 2] {
    fn into_point(self) -> Result<Point, GeometryError> {
        Ok(Point::from(self))
    }
}

impl IntoPoint for (f64, f64) {
    fn into_point(self) -> Result<Point, GeometryError> {
        Ok(Point::from(self))
    }
}

impl IntoPoint for &[f64] {
    fn into_point(self) -> Result<Point, GeometryError> {
        match self {
            [x, y] => Ok(Point::new(*x, *y)),
            other => Err(GeometryError::NotTwoDimensional(other.len())),
        }
    }
}

impl IntoPoint for &Vec<f64> {
    fn into_point(self) -> Result<Point, GeometryError> {
        self.as_slice().into_point()
    }
}

/// Axis-aligned `[min, max]` corners of a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    pub min: Point,
    pub max: Point,
}

impl Extents {
    /// Degenerate extents covering a single point.
    pub fn point(p: Point) -> Self {
        Self { min: p, max: p }
    }

    /// Min/max over the finite points of `points`, or `None` when there are none.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut extents: Option<Self> = None;
        for p in points.into_iter().filter(Point::is_finite) {
            match extents.as_mut() {
                Some(e) => e.include(p),
                None => extents = Some(Self::point(p)),
            }
        }
        extents
    }

    /// Grow to cover `p`. Non-finite points are ignored.
    pub fn include(&mut self, p: Point) {
        if !p.is_finite() {
            return;
        }
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn union(mut self, other: Extents) -> Self {
        self.include(other.min);
        self.include(other.max);
        self
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn to_bounds(&self) -> Bounds {
        Bounds::new(self.min.x, self.min.y, self.max.x, self.max.y)
    }
}
