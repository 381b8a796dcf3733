use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("min_px ({min_px}) must not exceed max_px ({max_px})")]
    PixelBand { min_px: f64, max_px: f64 },
    #[error("{field} must be at least 1")]
    Zero { field: &'static str },
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

/// What bounds aggregation does with a segment kind it does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownSegmentPolicy {
    /// Include every listed point in the bounds.
    #[default]
    ControlPoints,
    /// Fail the whole aggregation.
    Reject,
}

/// Tuning for bounds aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundsConfig {
    /// Parameter steps used when an arc has to be sampled.
    pub arc_sample_steps: usize,
    /// Padding as a fraction of the box width/height.
    pub pad_fraction: f64,
    /// Padding used on an axis whose extent is zero.
    pub min_pad: f64,
    /// Half side of the origin-centered square used when nothing finite was found.
    pub fallback_half_extent: f64,
    pub unknown_segments: UnknownSegmentPolicy,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            arc_sample_steps: 16,
            pad_fraction: 0.05,
            min_pad: 1.0,
            fallback_half_extent: 10.0,
            unknown_segments: UnknownSegmentPolicy::ControlPoints,
        }
    }
}

impl BoundsConfig {
    pub fn with_arc_sample_steps(mut self, steps: usize) -> Self {
        self.arc_sample_steps = steps;
        self
    }

    pub fn with_padding(mut self, fraction: f64, min_pad: f64) -> Self {
        self.pad_fraction = fraction;
        self.min_pad = min_pad;
        self
    }

    pub fn with_unknown_segments(mut self, policy: UnknownSegmentPolicy) -> Self {
        self.unknown_segments = policy;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arc_sample_steps == 0 {
            return Err(ConfigError::Zero {
                field: "arc_sample_steps",
            });
        }
        if !(self.pad_fraction >= 0.0 && self.pad_fraction.is_finite()) {
            return Err(ConfigError::NotPositive {
                field: "pad_fraction",
                value: self.pad_fraction,
            });
        }
        positive("min_pad", self.min_pad)?;
        positive("fallback_half_extent", self.fallback_half_extent)
    }
}

/// Tuning for grid step selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Lower edge of the target major spacing, in pixels.
    pub min_px: f64,
    /// Upper edge of the target major spacing, in pixels.
    pub max_px: f64,
    /// Minor lines are dropped when closer than this many pixels.
    pub min_minor_px: f64,
    /// Tick ranges longer than this are returned empty.
    pub max_ticks_per_axis: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_px: 60.0,
            max_px: 140.0,
            min_minor_px: 8.0,
            max_ticks_per_axis: 1_000_000,
        }
    }
}

impl GridConfig {
    pub fn with_pixel_band(mut self, min_px: f64, max_px: f64) -> Self {
        self.min_px = min_px;
        self.max_px = max_px;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("min_px", self.min_px)?;
        positive("max_px", self.max_px)?;
        positive("min_minor_px", self.min_minor_px)?;
        if self.min_px > self.max_px {
            return Err(ConfigError::PixelBand {
                min_px: self.min_px,
                max_px: self.max_px,
            });
        }
        if self.max_ticks_per_axis == 0 {
            return Err(ConfigError::Zero {
                field: "max_ticks_per_axis",
            });
        }
        Ok(())
    }
}

/// Tuning for label decimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Minimum gap between neighbouring labels, in pixels.
    pub min_label_px: f64,
    pub font_px: f64,
    /// Estimated glyph width as a fraction of the font size.
    pub char_width_factor: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            min_label_px: 80.0,
            font_px: 16.0,
            char_width_factor: 0.6,
        }
    }
}

impl LabelConfig {
    pub fn with_min_label_px(mut self, px: f64) -> Self {
        self.min_label_px = px;
        self
    }

    pub fn with_font_px(mut self, px: f64) -> Self {
        self.font_px = px;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("min_label_px", self.min_label_px)?;
        positive("font_px", self.font_px)?;
        positive("char_width_factor", self.char_width_factor)
    }
}

/// All engine settings, as read from a JSON config file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub bounds: BoundsConfig,
    pub grid: GridConfig,
    pub labels: LabelConfig,
}

impl ViewerConfig {
    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bounds.validate()?;
        self.grid.validate()?;
        self.labels.validate()
    }
}
