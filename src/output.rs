use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_line_segment_mut};
use tracing::debug;

use crate::error::{ConfigError, OutputError};
use crate::models::{Point2, RoiRecord};
use crate::results::RunResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoiFormat {
    #[default]
    Png,
    Jpeg,
}

impl RoiFormat {
    pub fn extension(self) -> &'static str {
        match self {
            RoiFormat::Png => "png",
            RoiFormat::Jpeg => "jpg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    pub format: RoiFormat,
    /// Only used for JPEG, 1..=100.
    pub jpeg_quality: u8,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            format: RoiFormat::Png,
            jpeg_quality: 95,
        }
    }
}

/// Writes each ROI of a run as its own image file.
pub struct RoiWriter {
    dir: PathBuf,
    options: SaveOptions,
}

impl RoiWriter {
    /// Validate options and create `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>, options: SaveOptions) -> Result<Self, OutputError> {
        if !(1..=100).contains(&options.jpeg_quality) {
            return Err(ConfigError::QualityOutOfRange(options.jpeg_quality).into());
        }
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| OutputError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir, options })
    }

    /// File name for the `index`-th record: `roi_{index:03}_edge{edge}.{ext}`.
    pub fn file_name(&self, index: usize, record: &RoiRecord) -> String {
        format!(
            "roi_{:03}_edge{}.{}",
            index,
            record.edge_index,
            self.options.format.extension()
        )
    }

    /// Write every record in order and return the paths written.
    pub fn write_all(&self, run: &RunResult) -> Result<Vec<PathBuf>, OutputError> {
        run.results
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let path = self.dir.join(self.file_name(i, record));
                self.write_one(&record.image, &path)?;
                debug!(path = %path.display(), "wrote roi");
                Ok(path)
            })
            .collect()
    }

    fn write_one(&self, image: &GrayImage, path: &Path) -> Result<(), OutputError> {
        let encode_err = |source| OutputError::Encode {
            path: path.display().to_string(),
            source,
        };
        match self.options.format {
            RoiFormat::Png => image
                .save_with_format(path, image::ImageFormat::Png)
                .map_err(encode_err),
            RoiFormat::Jpeg => {
                let file = File::create(path).map_err(|source| OutputError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                let mut writer = BufWriter::new(file);
                JpegEncoder::new_with_quality(&mut writer, self.options.jpeg_quality)
                    .encode_image(image)
                    .map_err(encode_err)
            }
        }
    }
}

const QUAD_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const SELECTION_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const CENTER_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

/// Colour copy of `image` with every quadrilateral, selection polygon and
/// centroid of `run` drawn on top.
pub fn render_overlay(image: &GrayImage, run: &RunResult) -> RgbImage {
    let mut canvas = DynamicImage::ImageLuma8(image.clone()).into_rgb8();
    for record in &run.results {
        draw_closed(&mut canvas, &record.quadrilateral, QUAD_COLOR);
        draw_closed(&mut canvas, &record.selection, SELECTION_COLOR);
        draw_cross_mut(
            &mut canvas,
            CENTER_COLOR,
            record.center.x.round() as i32,
            record.center.y.round() as i32,
        );
    }
    canvas
}

fn draw_closed(canvas: &mut RgbImage, points: &[Point2; 4], color: Rgb<u8>) {
    for i in 0..4 {
        draw_line_segment_mut(canvas, points[i].as_f32(), points[(i + 1) % 4].as_f32(), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoiLocation;
    use std::time::Duration;

    fn run_with(records: Vec<RoiRecord>) -> RunResult {
        RunResult {
            quadrilateral_count: records.len(),
            results: records,
            success: true,
            error: None,
            elapsed: Duration::ZERO,
        }
    }

    fn record(edge_index: usize) -> RoiRecord {
        let square = [
            Point2::new(10.0, 10.0),
            Point2::new(30.0, 10.0),
            Point2::new(30.0, 30.0),
            Point2::new(10.0, 30.0),
        ];
        RoiRecord {
            image: GrayImage::from_pixel(8, 4, image::Luma([90])),
            width: 8,
            height: 4,
            center: Point2::new(20.0, 20.0),
            edge_index,
            quadrilateral: square,
            selection: [
                Point2::new(10.0, 10.0),
                Point2::new(30.0, 10.0),
                Point2::new(30.0, 15.0),
                Point2::new(10.0, 15.0),
            ],
            location: RoiLocation { x: 10, y: 10 },
            area: 400.0,
        }
    }

    #[test]
    fn rejects_bad_quality() {
        let dir = tempfile::tempdir().unwrap();
        for quality in [0, 101] {
            let options = SaveOptions {
                format: RoiFormat::Jpeg,
                jpeg_quality: quality,
            };
            assert!(matches!(
                RoiWriter::new(dir.path(), options),
                Err(OutputError::Config(ConfigError::QualityOutOfRange(q))) if q == quality
            ));
        }
    }

    #[test]
    fn writes_png_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RoiWriter::new(dir.path().join("rois"), SaveOptions::default()).unwrap();
        let paths = writer.write_all(&run_with(vec![record(0), record(2)])).unwrap();

        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["roi_000_edge0.png", "roi_001_edge2.png"]);

        let back = image::open(&paths[1]).unwrap().into_luma8();
        assert_eq!(back.dimensions(), (8, 4));
        assert!(back.pixels().all(|p| p[0] == 90));
    }

    #[test]
    fn writes_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let options = SaveOptions {
            format: RoiFormat::Jpeg,
            jpeg_quality: 80,
        };
        let writer = RoiWriter::new(dir.path(), options).unwrap();
        let paths = writer.write_all(&run_with(vec![record(1)])).unwrap();

        assert!(paths[0].ends_with("roi_000_edge1.jpg"));
        let back = image::open(&paths[0]).unwrap();
        assert_eq!((back.width(), back.height()), (8, 4));
    }

    #[test]
    fn overlay_marks_geometry() {
        let gray = GrayImage::from_pixel(40, 40, image::Luma([128]));
        let overlay = render_overlay(&gray, &run_with(vec![record(0)]));

        assert_eq!(overlay.dimensions(), (40, 40));
        // right side of the quadrilateral, below the band
        assert_eq!(*overlay.get_pixel(30, 25), QUAD_COLOR);
        // band edge inside the quadrilateral
        assert_eq!(*overlay.get_pixel(20, 15), SELECTION_COLOR);
        assert_eq!(*overlay.get_pixel(20, 20), CENTER_COLOR);
        assert_eq!(*overlay.get_pixel(2, 2), Rgb([128, 128, 128]));
    }
}
