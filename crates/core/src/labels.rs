use partview_protocol::{AxisLabels, GridResult, Label, Matrix, Point, ViewBox};
use serde::{Deserialize, Serialize};

use crate::config::LabelConfig;
use crate::view::view_extent;

const MAX_DECIMALS: usize = 6;
const DECIMAL_TOLERANCE: f64 = 1e-8;

/// Major tick values to label, per axis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Majors {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

/// Inputs for one labelling pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelParams {
    pub majors: Majors,
    pub view_box: ViewBox,
    pub svg_width: f64,
    pub svg_height: f64,
    #[serde(default)]
    pub matrix: Option<Matrix>,
    /// Grid step in model units; sets the number of decimals shown.
    #[serde(default = "default_step_hint")]
    pub step_hint: f64,
}

fn default_step_hint() -> f64 {
    1.0
}

impl LabelParams {
    /// Label the major ticks of `grid` for the given viewport.
    pub fn from_grid(
        grid: &GridResult,
        view_box: ViewBox,
        svg_width: f64,
        svg_height: f64,
        matrix: Option<Matrix>,
    ) -> Self {
        Self {
            majors: Majors {
                xs: grid.major_xs.clone(),
                ys: grid.major_ys.clone(),
            },
            view_box,
            svg_width,
            svg_height,
            matrix,
            step_hint: grid.step_model,
        }
    }
}

/// Place labels for the major ticks, dropping any that would collide.
///
/// X labels are walked in ascending model order and kept when the gap from
/// the previous label's right edge is at least `min_label_px`. Y labels are
/// walked in ascending pixel order (independent of a flipped axis) and kept
/// when at least `max(font_px, min_label_px)` below the previous one.
/// Ticks that map to a non-finite pixel position are skipped.
pub fn compute_labels(params: &LabelParams, config: &LabelConfig) -> AxisLabels {
    let decimals = required_decimals(params.step_hint.abs().max(1e-9));
    let matrix = params.matrix.unwrap_or_default();
    // Pixel sizes are used as given: a zero-width canvas puts every label at 0.
    let scale_x = params.svg_width / view_extent(params.view_box.w);
    let scale_y = params.svg_height / view_extent(params.view_box.h);

    let to_px_x = |v: f64| (matrix.apply(Point::new(v, 0.0)).x - params.view_box.x) * scale_x;
    let to_px_y = |v: f64| (matrix.apply(Point::new(0.0, v)).y - params.view_box.y) * scale_y;
    let label = |v: f64, px: f64| {
        let text = format_tick(v, decimals);
        let half_width_px = text_width(&text, config) / 2.0;
        Label {
            value: v,
            model: v,
            px,
            text,
            half_width_px,
        }
    };

    let mut xs = params.majors.xs.clone();
    xs.sort_by(f64::total_cmp);
    let mut x = Vec::new();
    let mut last_right = f64::NEG_INFINITY;
    for v in xs {
        let px = to_px_x(v);
        if !px.is_finite() {
            continue;
        }
        let candidate = label(v, px);
        let left = px - candidate.half_width_px;
        if left - last_right >= config.min_label_px {
            last_right = px + candidate.half_width_px;
            x.push(candidate);
        }
    }

    let mut ys: Vec<(f64, f64)> = params
        .majors
        .ys
        .iter()
        .map(|&v| (v, to_px_y(v)))
        .filter(|(_, px)| px.is_finite())
        .collect();
    ys.sort_by(|a, b| a.1.total_cmp(&b.1));
    let min_gap = config.font_px.max(config.min_label_px);
    let mut y = Vec::new();
    let mut last_px = f64::NEG_INFINITY;
    for (v, px) in ys {
        if px - last_px >= min_gap {
            y.push(label(v, px));
            last_px = px;
        }
    }

    AxisLabels { x, y }
}

/// Fewest decimals (at most 6) that represent multiples of `step` exactly.
pub fn required_decimals(step: f64) -> usize {
    let mut decimals = 0;
    let mut scaled = step;
    while decimals < MAX_DECIMALS && (scaled.round() - scaled).abs() > DECIMAL_TOLERANCE {
        decimals += 1;
        scaled = step * 10f64.powi(decimals as i32);
    }
    decimals
}

/// Fixed-point text with trailing zeros and a dangling point removed.
pub fn format_tick(value: f64, decimals: usize) -> String {
    let mut text = format!("{value:.decimals$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text.remove(0);
    }
    text
}

fn text_width(text: &str, config: &LabelConfig) -> f64 {
    text.chars().count() as f64 * config.font_px * config.char_width_factor
}
