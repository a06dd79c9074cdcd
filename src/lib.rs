pub mod config;
pub mod detection;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod models;
pub mod output;
pub mod results;
pub mod roi;

use image::GrayImage;

pub use config::{ExtractionStrategy, PipelineConfig};
pub use detection::QuadRoiPipeline;
pub use error::{ConfigError, InputError, OutputError, PipelineError, ProcessingError, SkipReason};
pub use frame::{ChannelSelect, RawImage};
pub use models::{Edge, Point2, Quadrilateral, RoiLocation, RoiRecord, SelectionPolygon};
pub use output::{render_overlay, RoiFormat, RoiWriter, SaveOptions};
pub use results::{RunResult, RunSummary};

/// Extract ROIs from a grayscale image with the default configuration.
pub fn extract_rois(image: &GrayImage) -> RunResult {
    QuadRoiPipeline::default().run_gray(image)
}

/// Extract ROIs from a raw interleaved buffer.
pub fn extract_rois_with(
    raw: &RawImage<'_>,
    select: ChannelSelect,
    config: &PipelineConfig,
) -> RunResult {
    QuadRoiPipeline::new(config.clone()).run(raw, select)
}
