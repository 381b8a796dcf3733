//! View box helpers: initial fit, wheel zoom about a cursor and drag pan.
//!
//! All view boxes live in post-transform space, i.e. after the document
//! matrix has been applied.

use partview_protocol::{Bounds, Matrix, Point, ViewBox};

/// Fraction of the larger side added around a fitted view box.
const FIT_PAD_FRACTION: f64 = 0.05;
/// Smallest width/height a zoom can produce.
const MIN_VIEW_SIZE: f64 = 1e-3;
/// Per-unit wheel delta zoom base.
const WHEEL_ZOOM_BASE: f64 = 1.0015;

/// Pixels per view unit along one axis. A zero or NaN size reads as 1 and
/// the extent is clamped away from zero.
pub(crate) fn px_per_unit(pixels: f64, extent: f64) -> f64 {
    or_one(pixels) / view_extent(extent)
}

/// View box side usable as a divisor: zero or NaN reads as 1, then clamped
/// to at least `1e-9`.
pub(crate) fn view_extent(extent: f64) -> f64 {
    or_one(extent).max(1e-9)
}

fn or_one(v: f64) -> f64 {
    if v == 0.0 || v.is_nan() { 1.0 } else { v }
}

/// View box showing all of `bounds` after `matrix`, padded by 5% of the
/// larger side on every edge.
///
/// A degenerate box (both sides zero) is padded by one unit instead.
pub fn fit_view_box(bounds: &Bounds, matrix: Option<Matrix>) -> ViewBox {
    let m = matrix.unwrap_or_default();
    let corners = bounds.corners().map(|c| m.apply(c));

    let (mut min, mut max) = (corners[0], corners[0]);
    for p in &corners[1..] {
        min = Point::new(min.x.min(p.x), min.y.min(p.y));
        max = Point::new(max.x.max(p.x), max.y.max(p.y));
    }

    let (w, h) = (max.x - min.x, max.y - min.y);
    let pad = match w.max(h) * FIT_PAD_FRACTION {
        pad if pad > 0.0 && pad.is_finite() => pad,
        _ => 1.0,
    };
    ViewBox::new(min.x - pad, min.y - pad, w + 2.0 * pad, h + 2.0 * pad)
}

/// Zoom factor for a wheel event: `> 1` zooms out, `< 1` zooms in.
pub fn wheel_zoom_factor(delta_y: f64) -> f64 {
    WHEEL_ZOOM_BASE.powf(delta_y)
}

/// Scale `view_box` by `factor`, keeping the point under `anchor_px` fixed.
///
/// `anchor_px` is relative to the top-left of a `width × height` pixel
/// canvas.
pub fn zoom_about(
    view_box: ViewBox,
    anchor_px: Point,
    width: f64,
    height: f64,
    factor: f64,
) -> ViewBox {
    let fx = anchor_px.x / or_one(width);
    let fy = anchor_px.y / or_one(height);
    let anchor = Point::new(
        view_box.x + fx * view_box.w,
        view_box.y + fy * view_box.h,
    );

    let w = (view_box.w * factor).max(MIN_VIEW_SIZE);
    let h = (view_box.h * factor).max(MIN_VIEW_SIZE);
    ViewBox::new(anchor.x - fx * w, anchor.y - fy * h, w, h)
}

/// Shift `view_box` so content follows a pointer drag of `(dx_px, dy_px)`.
pub fn pan_by_px(view_box: ViewBox, dx_px: f64, dy_px: f64, width: f64, height: f64) -> ViewBox {
    ViewBox::new(
        view_box.x - dx_px * view_box.w / or_one(width),
        view_box.y - dy_px * view_box.h / or_one(height),
        view_box.w,
        view_box.h,
    )
}
