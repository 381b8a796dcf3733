use anyhow::{Result, bail};
use partview_core::{
    GridParams, LabelParams, ViewerConfig, compute_bounds, compute_graduations, compute_labels,
    fit_view_box,
};
use partview_protocol::{AxisLabels, Bounds, GridResult, PathDocument, SegmentRecord, ViewBox};
use serde::Serialize;

/// Pixel size of the render target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    const DEFAULT: Canvas = Canvas {
        width: 800.0,
        height: 600.0,
    };

    pub fn from_document(document: &PathDocument) -> Self {
        Self {
            width: document.width.unwrap_or(Self::DEFAULT.width),
            height: document.height.unwrap_or(Self::DEFAULT.height),
        }
    }
}

/// Everything a viewer needs for its first paint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub segments: usize,
    pub bounds: Bounds,
    pub view_box: ViewBox,
    pub grid: GridResult,
    pub labels: AxisLabels,
}

impl Report {
    pub fn build(
        document: &PathDocument,
        path: Option<&str>,
        view: Option<ViewBox>,
        canvas: Canvas,
        config: &ViewerConfig,
    ) -> Result<Self> {
        let filtered: Vec<SegmentRecord>;
        let segments = match path {
            Some(id) => {
                filtered = document.segments_for_path(id);
                if filtered.is_empty() {
                    bail!(
                        "no segments for path `{id}` (known: {})",
                        document.path_ids().join(", ")
                    );
                }
                &filtered
            }
            None => &document.segments,
        };

        let bounds = compute_bounds(segments, &config.bounds)?;
        let view_box = view.unwrap_or_else(|| fit_view_box(&bounds, document.matrix));
        let grid = compute_graduations(
            &GridParams {
                bounds,
                view_box,
                svg_width: canvas.width,
                svg_height: canvas.height,
                matrix: document.matrix,
            },
            &config.grid,
        );
        let labels = compute_labels(
            &LabelParams::from_grid(
                &grid,
                view_box,
                canvas.width,
                canvas.height,
                document.matrix,
            ),
            &config.labels,
        );

        Ok(Self {
            path: path.map(str::to_string),
            segments: segments.len(),
            bounds,
            view_box,
            grid,
            labels,
        })
    }
}

/// Parse `x,y,w,h`; width and height must be positive.
pub fn parse_view(s: &str) -> Result<ViewBox, String> {
    match numbers(s, ',')?.as_slice() {
        [x, y, w, h] if *w > 0.0 && *h > 0.0 => Ok(ViewBox::new(*x, *y, *w, *h)),
        [_, _, _, _] => Err(format!("view box size must be positive: `{s}`")),
        _ => Err(format!("expected x,y,w,h, got `{s}`")),
    }
}

/// Parse `WxH` with positive sides.
pub fn parse_size(s: &str) -> Result<Canvas, String> {
    match numbers(s, 'x')?.as_slice() {
        [width, height] if *width > 0.0 && *height > 0.0 => Ok(Canvas {
            width: *width,
            height: *height,
        }),
        _ => Err(format!("expected positive WxH, got `{s}`")),
    }
}

fn numbers(s: &str, sep: char) -> Result<Vec<f64>, String> {
    s.split(sep)
        .map(|part| {
            let part = part.trim();
            match part.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(format!("invalid number `{part}`")),
            }
        })
        .collect()
}
