use imageproc::point::Point;
use tracing::trace;

use crate::config::PipelineConfig;
use crate::geometry::{approx_poly_dp, area, is_convex, normalize_winding, perimeter};
use crate::models::{Point2, Quadrilateral};

/// Approximate one contour and accept it when it is a convex quadrilateral
/// whose contour area lies in `[min_area, max_area]`.
pub fn approximate_quadrilateral(
    contour: &[Point<i32>],
    config: &PipelineConfig,
) -> Option<Quadrilateral> {
    let contour_area = area(contour);
    if contour_area < config.min_area || contour_area > config.max_area {
        trace!(area = contour_area, "contour outside area band");
        return None;
    }

    let epsilon = config.approximation_accuracy * perimeter(contour);
    let mut poly = approx_poly_dp(contour, epsilon);
    if poly.len() != 4 {
        trace!(vertices = poly.len(), "approximation is not a quadrilateral");
        return None;
    }
    if !is_convex(&poly) {
        trace!("quadrilateral is not convex");
        return None;
    }

    normalize_winding(&mut poly);
    let vertices = [0, 1, 2, 3].map(|i| Point2::new(poly[i].x as f64, poly[i].y as f64));
    Some(Quadrilateral::new(vertices, contour_area))
}

/// Keep the contours that approximate to convex quadrilaterals, in input order.
pub fn filter_quadrilaterals(
    contours: &[Vec<Point<i32>>],
    config: &PipelineConfig,
) -> Vec<Quadrilateral> {
    contours
        .iter()
        .filter_map(|c| approximate_quadrilateral(c, config))
        .collect()
}
