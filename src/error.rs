use thiserror::Error;

/// Problems with the pixel buffer handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("image buffer is empty")]
    EmptyBuffer,

    #[error("image dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("buffer length {actual} does not match {width}x{height}x{channels} = {expected}")]
    LengthMismatch {
        width: u32,
        height: u32,
        channels: u8,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported channel count {0} (expected 1, 3 or 4)")]
    UnsupportedChannels(u8),

    #[error("channel index {index} out of range for a {channels}-channel image")]
    ChannelOutOfRange { index: u8, channels: u8 },
}

/// Configuration validation failures, checked once before a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("extension width must be positive")]
    NonPositiveWidth,

    #[error("extension length must be a positive percentage, got {0}")]
    NonPositiveLength(f64),

    #[error("adaptive block size must be odd and greater than 1, got {0}")]
    InvalidBlockSize(u32),

    #[error("adaptive constant must be finite, got {0}")]
    NonFiniteConstant(f64),

    #[error("minimum area must be positive, got {0}")]
    NonPositiveMinArea(f64),

    #[error("maximum area {max} must be greater than minimum area {min}")]
    AreaOrdering { min: f64, max: f64 },

    #[error("approximation accuracy must be in (0, 1], got {0}")]
    AccuracyOutOfRange(f64),

    #[error("{name} kernel size must be odd and in 1..=511, got {size}")]
    InvalidKernelSize { name: &'static str, size: u32 },

    #[error("JPEG quality must be in 1..=100, got {0}")]
    QualityOutOfRange(u8),
}

/// Unexpected failures in the binarize / contour / filter stages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessingError {
    #[error("found {found} contours, more than the configured limit of {limit}")]
    TooManyContours { found: usize, limit: usize },
}

/// Why a single quadrilateral was dropped. Never aborts a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkipReason {
    #[error("zero-area polygon, centroid undefined")]
    DegenerateMoments,

    #[error("selected edge is {0:.2}px long, below the 10px floor")]
    ShortEdge(f64),

    #[error("edge normal has zero length")]
    ZeroNormal,

    #[error("crop box is empty after clamping to the image")]
    EmptyCrop,

    #[error("warp output would be empty")]
    EmptyWarp,

    #[error("warp output {width}x{height} exceeds the {limit}px side limit")]
    OversizedWarp { width: u32, height: f64, limit: u32 },

    #[error("selection polygon does not define a projective mapping")]
    SingularProjection,
}

/// Any error that aborts a whole run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("input error: {0}")]
    Input(#[from] InputError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("processing error: {0}")]
    Processing(#[from] ProcessingError),
}

/// Failures writing ROI images to disk.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
