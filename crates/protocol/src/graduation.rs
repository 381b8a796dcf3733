use serde::{Deserialize, Serialize};

/// Grid step and tick positions for one viewport state.
///
/// Tick values are model-space coordinates derived from the document bounds,
/// so they stay put while the view pans.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridResult {
    pub step_model: f64,
    pub minor_step_model: f64,
    pub major_xs: Vec<f64>,
    pub major_ys: Vec<f64>,
    /// Empty when minor lines would be closer than the minimum pixel spacing.
    pub minor_xs: Vec<f64>,
    pub minor_ys: Vec<f64>,
}

/// One tick label placed in screen space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub value: f64,
    pub model: f64,
    /// Position along the axis in pixels, relative to the view box origin.
    pub px: f64,
    pub text: String,
    pub half_width_px: f64,
}

/// Labels that survived collision decimation, per axis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisLabels {
    pub x: Vec<Label>,
    pub y: Vec<Label>,
}
