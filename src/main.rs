use clap::{Parser, ValueEnum};
use image::{DynamicImage, ImageReader};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use edgeroi::detection::binarize::binarize;
use edgeroi::{
    render_overlay, ChannelSelect, ExtractionStrategy, PipelineConfig, QuadRoiPipeline, RawImage,
    RoiFormat, RoiWriter, SaveOptions,
};

#[derive(Parser)]
#[command(name = "edgeroi")]
#[command(about = "Find quadrilateral targets and cut edge ROIs for sharpness analysis")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// JSON pipeline configuration; flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Band width across the edge, in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Band length as a percentage of the edge length
    #[arg(long)]
    length: Option<f64>,

    /// Place the band outside the quadrilateral
    #[arg(long)]
    outward: bool,

    /// Edge index (0-3, clamped)
    #[arg(long, allow_negative_numbers = true)]
    edge: Option<i32>,

    #[arg(long)]
    min_area: Option<f64>,

    #[arg(long)]
    max_area: Option<f64>,

    /// Adaptive threshold window (odd)
    #[arg(long)]
    block_size: Option<u32>,

    /// Adaptive threshold offset
    #[arg(long, allow_negative_numbers = true)]
    constant: Option<f64>,

    /// Polygon approximation tolerance, fraction of perimeter
    #[arg(long)]
    accuracy: Option<f64>,

    /// Skip the opening/closing pass on the mask
    #[arg(long)]
    no_morphology: bool,

    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Abort when the mask has more contours than this
    #[arg(long)]
    max_contours: Option<usize>,

    /// Grayscale source: "luma" or a channel index
    #[arg(long, default_value = "luma", value_parser = parse_channel)]
    channel: ChannelSelect,

    /// Write each ROI to this directory
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "png")]
    format: FormatArg,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = 95)]
    quality: u8,

    /// Save an annotated copy of the input
    #[arg(long, value_name = "FILE")]
    overlay: Option<PathBuf>,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Crop,
    Warp,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Png,
    Jpeg,
}

fn parse_channel(s: &str) -> Result<ChannelSelect, String> {
    if s.eq_ignore_ascii_case("luma") {
        return Ok(ChannelSelect::Luma);
    }
    s.parse::<u8>()
        .map(ChannelSelect::Channel)
        .map_err(|_| format!("expected \"luma\" or a channel index, got {s:?}"))
}

impl Cli {
    fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let shown = path.display();
                let text = std::fs::read_to_string(path)
                    .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", shown, e))?;
                serde_json::from_str(&text)
                    .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", shown, e))?
            }
            None => PipelineConfig::default(),
        };

        if let Some(width) = self.width {
            config.extension_width = width;
        }
        if let Some(length) = self.length {
            config.extension_length = length;
        }
        if self.outward {
            config.extend_inwards = false;
        }
        if let Some(edge) = self.edge {
            config.selected_edge_index = edge;
        }
        if let Some(min_area) = self.min_area {
            config.min_area = min_area;
        }
        if let Some(max_area) = self.max_area {
            config.max_area = max_area;
        }
        if let Some(block_size) = self.block_size {
            config.adaptive_block_size = block_size;
        }
        if let Some(constant) = self.constant {
            config.adaptive_constant = constant;
        }
        if let Some(accuracy) = self.accuracy {
            config.approximation_accuracy = accuracy;
        }
        if self.no_morphology {
            config.enable_morphology = false;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = match strategy {
                StrategyArg::Crop => ExtractionStrategy::Crop,
                StrategyArg::Warp => ExtractionStrategy::Warp,
            };
        }
        if self.max_contours.is_some() {
            config.max_contours = self.max_contours;
        }
        Ok(config)
    }

    fn save_options(&self) -> SaveOptions {
        SaveOptions {
            format: match self.format {
                FormatArg::Png => RoiFormat::Png,
                FormatArg::Jpeg => RoiFormat::Jpeg,
            },
            jpeg_quality: self.quality,
        }
    }
}

/// Interleaved bytes and channel count of a decoded image.
fn interleaved(img: &DynamicImage) -> (Vec<u8>, u8) {
    match img.color().channel_count() {
        1 => (img.to_luma8().into_raw(), 1),
        3 => (img.to_rgb8().into_raw(), 3),
        _ => (img.to_rgba8().into_raw(), 4),
    }
}

/// The directory must be empty or non-existent.
fn prepare_debug_dir(dir: &Path) -> anyhow::Result<()> {
    if dir.exists() {
        let mut entries = std::fs::read_dir(dir)?;
        if entries.next().is_some() {
            anyhow::bail!("Debug directory is not empty: {}", dir.display());
        }
    } else {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = args.pipeline_config()?;
    let save_options = args.save_options();
    if let Some(debug_dir) = &args.debug_out {
        prepare_debug_dir(debug_dir)?;
    }

    info!(path = %args.image_path.display(), "loading image");
    let img = ImageReader::open(&args.image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    info!(width = img.width(), height = img.height(), "image loaded");

    let (data, channels) = interleaved(&img);
    let raw = RawImage {
        data: &data,
        width: img.width(),
        height: img.height(),
        channels,
    };

    let pipeline = QuadRoiPipeline::new(config.clone());
    let run = pipeline.run(&raw, args.channel);

    if run.success {
        let gray = raw.to_gray(args.channel)?;
        if let Some(debug_dir) = &args.debug_out {
            binarize(&gray, &config).save(debug_dir.join("mask.png"))?;
            render_overlay(&gray, &run).save(debug_dir.join("overlay.png"))?;
            info!(dir = %debug_dir.display(), "saved debug outputs");
        }
        if let Some(path) = &args.overlay {
            render_overlay(&gray, &run).save(path)?;
        }
        if let Some(dir) = &args.out_dir {
            let written = RoiWriter::new(dir, save_options)?.write_all(&run)?;
            info!(count = written.len(), dir = %dir.display(), "saved rois");
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&run.summary())?);
    } else {
        println!("\n=== Edge ROI Extraction Results ===");
        println!("Quadrilaterals detected: {}", run.quadrilateral_count);
        println!("ROIs extracted: {}", run.results.len());
        println!("Elapsed: {:.1} ms", run.elapsed.as_secs_f64() * 1000.0);
        for (i, roi) in run.results.iter().enumerate() {
            println!(
                "  ROI {} (edge {}) at ({}, {}) - {}x{}, quad area {:.0}",
                i + 1,
                roi.edge_index,
                roi.location.x,
                roi.location.y,
                roi.width,
                roi.height,
                roi.area
            );
        }
    }

    if !run.success {
        anyhow::bail!(
            "ROI extraction failed: {}",
            run.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}
