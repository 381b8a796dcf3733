pub mod document;
pub mod graduation;
pub mod inspect;
pub mod types;

pub use document::{PathDocument, SegmentRecord, ShapeType};
pub use graduation::{AxisLabels, GridResult, Label};
pub use inspect::{Inspection, SegmentDetail};
pub use types::{Bounds, Matrix, Point, ViewBox};
