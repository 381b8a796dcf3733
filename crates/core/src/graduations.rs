use partview_protocol::{Bounds, GridResult, Matrix, ViewBox};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::GridConfig;
use crate::view::px_per_unit;

/// Smallest exponent tried when shrinking the step; guards against
/// degenerate scales looping forever.
const MIN_EXPONENT: i32 = -24;
/// Tolerance for including a tick that lands on the upper bound.
const RANGE_EPSILON: f64 = 1e-9;
/// Floor for the scale divisor and the desired step.
const TINY: f64 = 1e-9;
/// Tick values are rounded to this many decimal digits.
const TICK_DECIMALS: usize = 10;

/// Inputs for one graduation pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridParams {
    /// Region ticks are generated for, in model space.
    pub bounds: Bounds,
    /// Currently visible rectangle in post-transform space.
    pub view_box: ViewBox,
    pub svg_width: f64,
    pub svg_height: f64,
    /// Model to post-transform matrix; `None` is identity.
    #[serde(default)]
    pub matrix: Option<Matrix>,
}

/// Choose a grid step and enumerate major/minor ticks.
///
/// The view box only sets the scale (pixels per model unit). Tick values
/// come from `params.bounds`, so a tick at 0 stays at 0 however the view is
/// panned.
pub fn compute_graduations(params: &GridParams, config: &GridConfig) -> GridResult {
    let px_per_model = px_per_model(params);
    let step_model = choose_step(px_per_model, config.min_px, config.max_px);
    let minor_step_model = step_model / 5.0;
    let include_minor = minor_step_model * px_per_model >= config.min_minor_px;

    let b = &params.bounds;
    let range = |from, to, by| tick_range(from, to, by, config.max_ticks_per_axis);

    GridResult {
        step_model,
        minor_step_model,
        major_xs: range(b.min_x, b.max_x, step_model),
        major_ys: range(b.min_y, b.max_y, step_model),
        minor_xs: if include_minor {
            range(b.min_x, b.max_x, minor_step_model)
        } else {
            Vec::new()
        },
        minor_ys: if include_minor {
            range(b.min_y, b.max_y, minor_step_model)
        } else {
            Vec::new()
        },
    }
}

/// Average of the horizontal and vertical pixel-per-model-unit scales.
///
/// Each axis scale is `pixels / view box size × transform axis scale`, where
/// the transform axis scale is the norm of that axis' matrix column. Zero
/// pixel or view box sizes read as 1.
pub fn px_per_model(params: &GridParams) -> f64 {
    let (scale_x, scale_y) = params
        .matrix
        .map_or((1.0, 1.0), |m| (axis_scale(m.x_scale()), axis_scale(m.y_scale())));

    let px_per_post_x = px_per_unit(params.svg_width, params.view_box.w);
    let px_per_post_y = px_per_unit(params.svg_height, params.view_box.h);
    (px_per_post_x * scale_x + px_per_post_y * scale_y) / 2.0
}

/// Pick a step from `{1, 5, 10} × 10^k` whose pixel spacing lands in
/// `[min_px, max_px]` where possible.
///
/// Starts from the smallest candidate at or above `min_px / px_per_model`,
/// then shrinks the decade (trying `5×10^k`, then `1×10^k`) while the spacing
/// still exceeds `max_px`.
pub fn choose_step(px_per_model: f64, min_px: f64, max_px: f64) -> f64 {
    let desired = (min_px / px_per_model.max(TINY)).max(TINY);
    let mut exp = desired.log10().floor() as i32;
    let mut step = [1.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * pow10(exp))
        .find(|s| *s >= desired)
        .unwrap_or(10.0 * pow10(exp));

    while step * px_per_model > max_px {
        exp -= 1;
        step = 5.0 * pow10(exp);
        if step * px_per_model > max_px {
            step = pow10(exp);
        }
        if exp < MIN_EXPONENT {
            break;
        }
    }
    step
}

/// Multiples of `step` in `[from, to]`, ascending.
///
/// The upper edge is inclusive with a `1e-9` tolerance. Values are rounded to
/// 10 decimal digits and negative zero is normalized. Returns an empty list
/// for invalid input or when more than `max_ticks` values would be produced.
pub fn tick_range(from: f64, to: f64, step: f64, max_ticks: usize) -> Vec<f64> {
    if !(step > 0.0 && step.is_finite() && from.is_finite() && to.is_finite()) {
        return Vec::new();
    }
    let start = (from / step).ceil() * step;
    let end = to + RANGE_EPSILON;
    if start > end {
        return Vec::new();
    }

    let approx_count = (end - start) / step;
    if approx_count >= max_ticks as f64 {
        warn!(from, to, step, max_ticks, "tick range too dense, skipping");
        return Vec::new();
    }

    let mut ticks = Vec::with_capacity(approx_count as usize + 1);
    let mut i = 0usize;
    loop {
        let v = start + i as f64 * step;
        if v > end {
            break;
        }
        ticks.push(round_tick(v));
        i += 1;
    }
    ticks
}

fn round_tick(v: f64) -> f64 {
    let rounded = format!("{v:.TICK_DECIMALS$}").parse::<f64>().unwrap_or(v);
    if rounded == 0.0 { 0.0 } else { rounded }
}

fn pow10(exp: i32) -> f64 {
    10f64.powf(f64::from(exp))
}

fn axis_scale(s: f64) -> f64 {
    if s > 0.0 && s.is_finite() { s } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use partview_protocol::Point;

    fn params(bounds: Bounds, view_box: ViewBox, matrix: Option<Matrix>) -> GridParams {
        GridParams {
            bounds,
            view_box,
            svg_width: 600.0,
            svg_height: 600.0,
            matrix,
        }
    }

    fn within(values: &[f64], lo: f64, hi: f64) -> bool {
        values.iter().all(|v| *v >= lo - 1e-9 && *v <= hi + 1e-9)
    }

    #[test]
    fn step_spacing_never_exceeds_max_px() {
        for px_per_model in [0.001, 0.37, 1.0, 3.0, 6.0, 42.0, 1000.0, 123456.0] {
            let px = choose_step(px_per_model, 60.0, 140.0) * px_per_model;
            assert!(px <= 140.0, "ppm={px_per_model} px={px}");
        }
    }

    #[test]
    fn step_is_a_nice_number() {
        assert_eq!(choose_step(1.0, 60.0, 140.0), 100.0);
        assert_eq!(choose_step(6.0, 60.0, 140.0), 10.0);
        assert_abs_diff_eq!(choose_step(600.0, 60.0, 140.0), 0.1, epsilon = 1e-12);
        // 50 would be 150px, so the decade shrinks to 5.
        assert_eq!(choose_step(3.0, 60.0, 140.0), 5.0);
    }

    #[test]
    fn keeps_major_ticks_inside_bounds() {
        let bounds = Bounds::new(0.0, 0.0, 200.0, 200.0);
        let res = compute_graduations(
            &params(bounds, ViewBox::new(0.0, 0.0, 200.0, 200.0), Some(Matrix::IDENTITY)),
            &GridConfig::default(),
        );
        assert!(res.step_model > 0.0);
        assert!(!res.major_xs.is_empty());
        assert!(within(&res.major_xs, 0.0, 200.0));
        assert!(within(&res.major_ys, 0.0, 200.0));
        // Every grid intersection lies inside the part.
        for &x in &res.major_xs {
            for &y in &res.major_ys {
                assert!(bounds.contains(Point::new(x, y)), "({x}, {y})");
            }
        }
    }

    #[test]
    fn clamps_for_many_configurations() {
        let cases = [
            (Bounds::new(-37.3, 4.1, 80.9, 9.7), ViewBox::new(0.0, 0.0, 50.0, 20.0)),
            (Bounds::new(-0.013, -0.2, 0.021, 0.4), ViewBox::new(-1.0, 3.0, 0.05, 0.05)),
            (Bounds::new(1e4, -2e4, 3e4, -1e4), ViewBox::new(0.0, 0.0, 9e4, 9e4)),
            (Bounds::new(-10.0, -10.0, 10.0, 10.0), ViewBox::new(5.0, 5.0, 1.0, 1.0)),
        ];
        for (bounds, vb) in cases {
            for matrix in [None, Some(Matrix::new(0.0, 2.0, -2.0, 0.0, 3.0, 4.0))] {
                let res = compute_graduations(&params(bounds, vb, matrix), &GridConfig::default());
                assert!(within(&res.major_xs, bounds.min_x, bounds.max_x), "{res:?}");
                assert!(within(&res.major_ys, bounds.min_y, bounds.max_y), "{res:?}");
                assert!(within(&res.minor_xs, bounds.min_x, bounds.max_x), "{res:?}");
                assert!(within(&res.minor_ys, bounds.min_y, bounds.max_y), "{res:?}");
                assert!(res.major_xs.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn zooming_out_never_shrinks_the_step() {
        let bounds = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let mut last = 0.0;
        for w in [10.0, 50.0, 100.0, 300.0, 1000.0, 5000.0] {
            let res = compute_graduations(
                &params(bounds, ViewBox::new(0.0, 0.0, w, w), Some(Matrix::IDENTITY)),
                &GridConfig::default(),
            );
            assert!(res.step_model >= last, "w={w}");
            last = res.step_model;
        }
    }

    #[test]
    fn wider_view_box_gives_larger_step() {
        let bounds = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let config = GridConfig::default();
        let a = compute_graduations(
            &params(bounds, ViewBox::new(0.0, 0.0, 100.0, 100.0), Some(Matrix::IDENTITY)),
            &config,
        );
        let b = compute_graduations(
            &params(bounds, ViewBox::new(0.0, 0.0, 300.0, 300.0), Some(Matrix::IDENTITY)),
            &config,
        );
        assert!(b.step_model >= a.step_model);
    }

    #[test]
    fn zero_tick_is_independent_of_pan() {
        let bounds = Bounds::new(0.0, 0.0, 200.0, 200.0);
        for vb in [
            ViewBox::new(50.0, 50.0, 100.0, 100.0),
            ViewBox::new(-13.7, 88.1, 100.0, 100.0),
            ViewBox::new(0.0, 0.0, 100.0, 100.0),
        ] {
            let res = compute_graduations(
                &params(bounds, vb, Some(Matrix::IDENTITY)),
                &GridConfig::default(),
            );
            assert_eq!(res.major_xs[0], 0.0);
            assert!(res.major_xs[0].is_sign_positive());
            assert_eq!(res.major_ys[0], 0.0);
        }
    }

    #[test]
    fn bounds_spanning_zero_contain_zero() {
        let res = compute_graduations(
            &params(
                Bounds::new(-37.0, -5.5, 80.0, 12.0),
                ViewBox::new(0.0, 0.0, 100.0, 100.0),
                None,
            ),
            &GridConfig::default(),
        );
        assert!(res.major_xs.contains(&0.0));
        assert!(res.major_ys.contains(&0.0));
    }

    #[test]
    fn minor_ticks_dropped_when_too_dense() {
        // 600px over 100 units: step 10 (60px), minor 2 (12px) kept.
        let dense = compute_graduations(
            &params(
                Bounds::new(0.0, 0.0, 100.0, 100.0),
                ViewBox::new(0.0, 0.0, 100.0, 100.0),
                None,
            ),
            &GridConfig::default(),
        );
        assert_eq!(dense.step_model, 10.0);
        assert_eq!(dense.minor_step_model, 2.0);
        assert_eq!(dense.minor_xs.len(), 51);

        let sparse = compute_graduations(
            &params(
                Bounds::new(0.0, 0.0, 100.0, 100.0),
                ViewBox::new(0.0, 0.0, 100.0, 100.0),
                None,
            ),
            &GridConfig {
                min_minor_px: 20.0,
                ..GridConfig::default()
            },
        );
        assert!(sparse.minor_xs.is_empty());
        assert!(sparse.minor_ys.is_empty());
    }

    #[test]
    fn transform_scale_changes_step() {
        let bounds = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let vb = ViewBox::new(0.0, 0.0, 100.0, 100.0);
        let plain = compute_graduations(&params(bounds, vb, None), &GridConfig::default());
        let scaled = compute_graduations(
            &params(bounds, vb, Some(Matrix::new(10.0, 0.0, 0.0, -10.0, 0.0, 0.0))),
            &GridConfig::default(),
        );
        assert_eq!(plain.step_model, 10.0);
        assert_eq!(scaled.step_model, 1.0);
        // Rotation keeps the scale.
        let rotated = compute_graduations(
            &params(bounds, vb, Some(Matrix::new(0.0, 1.0, -1.0, 0.0, 0.0, 0.0))),
            &GridConfig::default(),
        );
        assert_eq!(rotated.step_model, plain.step_model);
    }

    #[test]
    fn degenerate_inputs_still_produce_a_step() {
        let p = GridParams {
            bounds: Bounds::new(-1.0, -1.0, 1.0, 1.0),
            view_box: ViewBox::new(0.0, 0.0, 0.0, 0.0),
            svg_width: 0.0,
            svg_height: 0.0,
            matrix: Some(Matrix::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0)),
        };
        assert_eq!(px_per_model(&p), 1.0);
        let res = compute_graduations(&p, &GridConfig::default());
        assert_eq!(res.step_model, 100.0);
        assert_eq!(res.major_xs, vec![0.0]);
        assert!(choose_step(f64::INFINITY, 60.0, 140.0) > 0.0);
    }

    #[test]
    fn tick_range_rounds_away_float_noise() {
        assert_eq!(
            tick_range(0.25, 0.95, 0.1, 100),
            vec![0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9]
        );
        assert_eq!(tick_range(-0.5, 0.5, 0.5, 100), vec![-0.5, 0.0, 0.5]);
        // Upper edge within 1e-9 is kept.
        assert_eq!(tick_range(0.0, 0.9999999999, 0.5, 100), vec![0.0, 0.5, 1.0]);
        assert!(tick_range(0.1, 0.2, 0.5, 100).is_empty());
        assert!(tick_range(0.0, 1.0, 0.0, 100).is_empty());
        assert!(tick_range(f64::NAN, 1.0, 0.1, 100).is_empty());
    }

    #[test]
    fn tick_range_respects_cap() {
        assert!(tick_range(0.0, 1000.0, 0.01, 1000).is_empty());
        assert_eq!(tick_range(0.0, 10.0, 1.0, 1000).len(), 11);
    }

    #[test]
    fn negative_zero_is_normalized() {
        let ticks = tick_range(-0.3, 0.3, 1.0, 10);
        assert_eq!(ticks, vec![0.0]);
        assert!(ticks[0].is_sign_positive());
    }
}
