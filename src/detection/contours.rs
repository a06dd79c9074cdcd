use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;

use crate::geometry::{compress_chain, normalize_winding};

/// Outer borders of the top-level foreground components in a binary mask.
///
/// Borders of holes and of components nested inside holes are dropped.
/// Each returned chain starts at its raster-first point, winds clockwise on
/// screen, and keeps only the points where the boundary changes direction.
pub fn find_external_contours(mask: &GrayImage) -> Vec<Vec<Point<i32>>> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| {
            let mut points = c.points;
            normalize_winding(&mut points);
            compress_chain(&points)
        })
        .filter(|points| !points.is_empty())
        .collect()
}
