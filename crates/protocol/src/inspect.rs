use serde::{Deserialize, Serialize};

use crate::document::ShapeType;
use crate::types::Point;

/// Where a query point falls on one segment, for the inspector panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<String>,
    pub shape_type: ShapeType,
    /// Curve parameter of the closest point, in `[0, 1]`.
    pub t: f64,
    pub point: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<SegmentDetail>,
}

/// Kind-specific geometry shown next to an inspected segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentDetail {
    Arc {
        radius: f64,
        center: Point,
        /// Signed: positive is counter-clockwise.
        sweep_angle: f64,
    },
    Cubic {
        control1: Point,
        control2: Point,
    },
    Quadratic {
        control: Point,
    },
}
