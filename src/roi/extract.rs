use image::{imageops, GrayImage, Luma};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};

use crate::config::{ExtractionStrategy, PipelineConfig};
use crate::error::SkipReason;
use crate::models::{Quadrilateral, RoiLocation, RoiRecord, SelectionPolygon};
use crate::roi::builder::RoiGeometry;

/// Largest side a warped ROI may have.
pub const MAX_WARP_SIDE: u32 = 16_384;

/// Pull the pixels of one selection polygon out of `image` with the
/// configured strategy.
pub fn extract(
    image: &GrayImage,
    quad: &Quadrilateral,
    geometry: &RoiGeometry,
    config: &PipelineConfig,
) -> Result<RoiRecord, SkipReason> {
    let (roi, location) = match config.strategy {
        ExtractionStrategy::Crop => crop_roi(image, &geometry.selection)?,
        ExtractionStrategy::Warp => warp_roi(image, &geometry.selection, config.extension_width)?,
    };

    Ok(RoiRecord {
        width: roi.width(),
        height: roi.height(),
        image: roi,
        center: geometry.centroid,
        edge_index: geometry.edge_index,
        quadrilateral: quad.vertices,
        selection: geometry.selection.points,
        location,
        area: quad.area,
    })
}

/// Axis-aligned bounding box of the selection, clamped to the image.
/// Pixels are copied as-is.
pub fn crop_roi(
    image: &GrayImage,
    selection: &SelectionPolygon,
) -> Result<(GrayImage, RoiLocation), SkipReason> {
    let (min_x, min_y, max_x, max_y) = selection.bounds();
    let (width, height) = image.dimensions();

    let x0 = min_x.floor().max(0.0);
    let y0 = min_y.floor().max(0.0);
    let x1 = max_x.ceil().min(width as f64);
    let y1 = max_y.ceil().min(height as f64);
    if !(x1 > x0 && y1 > y0) {
        return Err(SkipReason::EmptyCrop);
    }

    let (x, y) = (x0 as u32, y0 as u32);
    let (w, h) = ((x1 - x0) as u32, (y1 - y0) as u32);
    let roi = imageops::crop_imm(image, x, y, w, h).to_image();
    Ok((
        roi,
        RoiLocation {
            x: x as i64,
            y: y as i64,
        },
    ))
}

/// Projective resample of the selection onto a `band_width` x edge-length
/// rectangle. The selected edge lands on the left column, top to bottom.
/// Samples outside the source are black.
pub fn warp_roi(
    image: &GrayImage,
    selection: &SelectionPolygon,
    band_width: u32,
) -> Result<(GrayImage, RoiLocation), SkipReason> {
    let length = selection.edge_length().round();
    if !(length <= MAX_WARP_SIDE as f64) || band_width > MAX_WARP_SIDE {
        return Err(SkipReason::OversizedWarp {
            width: band_width,
            height: length,
            limit: MAX_WARP_SIDE,
        });
    }
    let out_h = length as u32;
    if band_width == 0 || out_h == 0 {
        return Err(SkipReason::EmptyWarp);
    }

    let (w, h) = (band_width as f32, out_h as f32);
    let dest = [(0.0, 0.0), (0.0, h), (w, h), (w, 0.0)];
    let src = selection.points.map(|p| p.as_f32());
    let projection =
        Projection::from_control_points(src, dest).ok_or(SkipReason::SingularProjection)?;

    let mut roi = GrayImage::new(band_width, out_h);
    warp_into(image, &projection, Interpolation::Bilinear, Luma([0]), &mut roi);

    let origin = selection.points[0];
    Ok((
        roi,
        RoiLocation {
            x: origin.x.round() as i64,
            y: origin.y.round() as i64,
        },
    ))
}
