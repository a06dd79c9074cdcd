mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from edgeroi for tests
pub use edgeroi::{
    ChannelSelect, ExtractionStrategy, PipelineConfig, Point2, QuadRoiPipeline, RawImage,
    RunResult,
};
