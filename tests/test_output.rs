mod common;

use common::*;
use edgeroi::{render_overlay, RoiFormat, RoiWriter, SaveOptions};

#[test]
fn test_write_rois_from_run() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let config = PipelineConfig::default().with_extension(10, 100.0, true);
    let run = QuadRoiPipeline::new(config).run_gray(&square_scene());

    let writer = RoiWriter::new(dir.path(), SaveOptions::default())?;
    let paths = writer.write_all(&run)?;
    assert_eq!(paths.len(), 1);
    assert!(paths[0].ends_with("roi_000_edge0.png"));

    let saved = image::open(&paths[0])?.into_luma8();
    assert_eq!(saved, run.results[0].image);
    Ok(())
}

#[test]
fn test_write_jpeg_rois() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let config = PipelineConfig::default()
        .with_extension(10, 100.0, true)
        .with_strategy(ExtractionStrategy::Warp);
    let run = QuadRoiPipeline::new(config).run_gray(&square_scene());

    let options = SaveOptions {
        format: RoiFormat::Jpeg,
        jpeg_quality: 90,
    };
    let paths = RoiWriter::new(dir.path().join("nested/out"), options)?.write_all(&run)?;
    assert!(paths[0].ends_with("roi_000_edge0.jpg"));

    let saved = image::open(&paths[0])?;
    assert_eq!((saved.width(), saved.height()), (10, 40));
    Ok(())
}

#[test]
fn test_failed_run_writes_nothing() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let config = PipelineConfig {
        adaptive_block_size: 4,
        ..Default::default()
    };
    let run = QuadRoiPipeline::new(config).run_gray(&square_scene());

    let paths = RoiWriter::new(dir.path(), SaveOptions::default())?.write_all(&run)?;
    assert!(paths.is_empty());
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

#[test]
fn test_overlay_draws_on_colour_copy() {
    let scene = square_scene();
    let config = PipelineConfig::default().with_extension(10, 100.0, true);
    let run = QuadRoiPipeline::new(config).run_gray(&scene);
    let overlay = render_overlay(&scene, &run);

    assert_eq!(overlay.dimensions(), scene.dimensions());
    // quadrilateral bottom edge
    assert_eq!(overlay.get_pixel(50, 70).0, [0, 255, 0]);
    // selection band bottom edge
    assert_eq!(overlay.get_pixel(50, 40).0, [255, 0, 0]);
    // centroid
    assert_eq!(overlay.get_pixel(50, 50).0, [0, 0, 255]);
    // untouched background stays gray
    assert_eq!(overlay.get_pixel(5, 5).0, [LIGHT, LIGHT, LIGHT]);
}
