pub mod bounds;
pub mod config;
pub mod geometry;
pub mod graduations;
pub mod inspect;
pub mod labels;
pub mod segment;
pub mod view;

pub use bounds::{BoundsError, compute_bounds, segment_extents};
pub use config::{BoundsConfig, ConfigError, GridConfig, LabelConfig, UnknownSegmentPolicy, ViewerConfig};
pub use geometry::{Extents, GeometryError, arc_extents};
pub use graduations::{GridParams, compute_graduations};
pub use inspect::inspect;
pub use labels::{LabelParams, Majors, compute_labels};
pub use segment::Segment;
pub use view::{fit_view_box, pan_by_px, wheel_zoom_factor, zoom_about};
