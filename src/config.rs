use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How ROI pixels are pulled out of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    /// Axis-aligned bounding box of the selection polygon, no resampling.
    /// Keeps the edge at its true angle for frequency-domain analysis.
    #[default]
    Crop,
    /// Projective warp of the selection polygon onto an upright rectangle.
    Warp,
}

/// Parameters for one pipeline run. Validated once with [`PipelineConfig::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Band width perpendicular to the edge, in pixels.
    pub extension_width: u32,
    /// Band length along the edge, as a percentage of the edge length.
    pub extension_length: f64,
    /// Offset the band toward the quadrilateral interior.
    pub extend_inwards: bool,
    /// Edge to use: 0 = p1->p2, 1 = p2->p3, 2 = p3->p4, 3 = p4->p1. Clamped.
    pub selected_edge_index: i32,
    pub min_area: f64,
    pub max_area: f64,
    /// Local threshold window (odd).
    pub adaptive_block_size: u32,
    /// Subtracted from the local mean before comparing.
    pub adaptive_constant: f64,
    /// Polygon approximation tolerance as a fraction of the contour perimeter.
    pub approximation_accuracy: f64,
    pub enable_morphology: bool,
    pub open_kernel_size: u32,
    pub close_kernel_size: u32,
    pub strategy: ExtractionStrategy,
    /// Abort when the mask yields more external contours than this.
    pub max_contours: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            extension_width: 20,
            extension_length: 100.0,
            extend_inwards: true,
            selected_edge_index: 0,
            min_area: 1000.0,
            max_area: 1_000_000.0,
            adaptive_block_size: 11,
            adaptive_constant: 7.0,
            approximation_accuracy: 0.02,
            enable_morphology: true,
            open_kernel_size: 3,
            close_kernel_size: 5,
            strategy: ExtractionStrategy::Crop,
            max_contours: None,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edge(mut self, index: i32) -> Self {
        self.selected_edge_index = index;
        self
    }

    pub fn with_strategy(mut self, strategy: ExtractionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_extension(mut self, width: u32, length_percent: f64, inwards: bool) -> Self {
        self.extension_width = width;
        self.extension_length = length_percent;
        self.extend_inwards = inwards;
        self
    }

    pub fn with_area_band(mut self, min_area: f64, max_area: f64) -> Self {
        self.min_area = min_area;
        self.max_area = max_area;
        self
    }

    /// The selected edge, clamped into `0..=3`.
    pub fn edge_index(&self) -> usize {
        self.selected_edge_index.clamp(0, 3) as usize
    }

    /// Fraction of the edge length covered by the band.
    pub fn length_scale(&self) -> f64 {
        self.extension_length / 100.0
    }

    /// Check every parameter. The edge index is clamped, never rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extension_width == 0 {
            return Err(ConfigError::NonPositiveWidth);
        }
        if !self.extension_length.is_finite() || self.extension_length <= 0.0 {
            return Err(ConfigError::NonPositiveLength(self.extension_length));
        }
        if self.adaptive_block_size <= 1 || self.adaptive_block_size % 2 == 0 {
            return Err(ConfigError::InvalidBlockSize(self.adaptive_block_size));
        }
        if !self.adaptive_constant.is_finite() {
            return Err(ConfigError::NonFiniteConstant(self.adaptive_constant));
        }
        if !(self.min_area > 0.0) {
            return Err(ConfigError::NonPositiveMinArea(self.min_area));
        }
        if !(self.max_area > self.min_area) {
            return Err(ConfigError::AreaOrdering {
                min: self.min_area,
                max: self.max_area,
            });
        }
        if !(self.approximation_accuracy > 0.0 && self.approximation_accuracy <= 1.0) {
            return Err(ConfigError::AccuracyOutOfRange(self.approximation_accuracy));
        }
        validate_kernel("open", self.open_kernel_size)?;
        validate_kernel("close", self.close_kernel_size)?;
        Ok(())
    }
}

fn validate_kernel(name: &'static str, size: u32) -> Result<(), ConfigError> {
    // imageproc takes the kernel radius as a u8
    if size == 0 || size % 2 == 0 || size > 511 {
        return Err(ConfigError::InvalidKernelSize { name, size });
    }
    Ok(())
}
