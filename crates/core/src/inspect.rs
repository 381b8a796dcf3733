use partview_protocol::{Inspection, Point, SegmentDetail, SegmentRecord};

use crate::geometry::GeometryError;
use crate::segment::Segment;

/// Closest point on `record` to `target`, with the kind-specific geometry an
/// inspector shows next to it.
///
/// Returns `Ok(None)` for a record without points. Values are not rounded.
pub fn inspect(record: &SegmentRecord, target: Point) -> Result<Option<Inspection>, GeometryError> {
    let segment = Segment::try_from(record)?;
    let Some((t, point)) = segment.closest_t(target) else {
        return Ok(None);
    };
    Ok(Some(Inspection {
        segment_id: record.id.clone(),
        shape_type: record.shape_type.clone(),
        t,
        point,
        detail: detail(&segment),
    }))
}

fn detail(segment: &Segment) -> Option<SegmentDetail> {
    match segment {
        Segment::Arc { .. } => segment.circular_arc().map(|arc| SegmentDetail::Arc {
            radius: arc.radius,
            center: arc.center,
            sweep_angle: arc.sweep_angle,
        }),
        Segment::Cubic { control } => match control.as_slice() {
            [_, control1, control2, ..] => Some(SegmentDetail::Cubic {
                control1: *control1,
                control2: *control2,
            }),
            _ => None,
        },
        Segment::Quadratic { control } => match control.as_slice() {
            [_, control, ..] => Some(SegmentDetail::Quadratic { control: *control }),
            _ => None,
        },
        Segment::Line { .. } | Segment::Unknown { .. } => None,
    }
}
