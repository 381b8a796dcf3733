use serde::{Deserialize, Serialize};

use crate::types::Matrix;

/// Discriminant of a path segment record.
///
/// Unrecognized kinds are preserved verbatim in [`ShapeType::Other`] so the
/// consumer decides how to treat them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShapeType {
    /// `lineto`: straight line, `[from, to]`.
    Line,
    /// `splineto`: cubic Bézier, `[p0, c1, c2, p3]`.
    Cubic,
    /// `qsplineto`: quadratic Bézier, `[p0, c, p2]`.
    Quadratic,
    /// `arcto1`: circular arc, `[start, end, center]`.
    Arc,
    Other(String),
}

impl ShapeType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Line => "lineto",
            Self::Cubic => "splineto",
            Self::Quadratic => "qsplineto",
            Self::Arc => "arcto1",
            Self::Other(kind) => kind,
        }
    }
}

impl From<String> for ShapeType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "lineto" => Self::Line,
            "splineto" => Self::Cubic,
            "qsplineto" => Self::Quadratic,
            "arcto1" => Self::Arc,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for ShapeType {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<ShapeType> for String {
    fn from(t: ShapeType) -> Self {
        match t {
            ShapeType::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

/// A loosely structured path segment as emitted by the build pipeline.
///
/// Points are kept as raw coordinate lists; they are only validated as 2D
/// when the segment is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_id: Option<String>,
    pub shape_type: ShapeType,
    #[serde(default)]
    pub points: Vec<Vec<f64>>,
    /// Unsigned arc extent in radians (arcs only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep_angle: Option<f64>,
    /// `true` sweeps counter-clockwise, `false` (or absent) clockwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep_flag: Option<bool>,
}

impl SegmentRecord {
    pub fn new(shape_type: impl Into<ShapeType>, points: Vec<Vec<f64>>) -> Self {
        Self {
            id: None,
            path_id: None,
            shape_type: shape_type.into(),
            points,
            sweep_angle: None,
            sweep_flag: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_path(mut self, path_id: impl Into<String>) -> Self {
        self.path_id = Some(path_id.into());
        self
    }

    pub fn with_sweep(mut self, angle: f64, counter_clockwise: bool) -> Self {
        self.sweep_angle = Some(angle);
        self.sweep_flag = Some(counter_clockwise);
        self
    }
}

/// A 2D path trace: segments for one or more paths plus the document transform.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathDocument {
    /// Model to post-transform matrix; absent means identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<Matrix>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub segments: Vec<SegmentRecord>,
}

impl PathDocument {
    /// Distinct path ids in first-seen order.
    pub fn path_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for id in self.segments.iter().filter_map(|s| s.path_id.as_deref()) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Segments belonging to `path_id`, in document order.
    pub fn segments_for_path(&self, path_id: &str) -> Vec<SegmentRecord> {
        self.segments
            .iter()
            .filter(|s| s.path_id.as_deref() == Some(path_id))
            .cloned()
            .collect()
    }
}
