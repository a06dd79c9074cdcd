use crate::config::PipelineConfig;
use crate::error::SkipReason;
use crate::geometry::centroid;
use crate::models::{Point2, Quadrilateral, SelectionPolygon};

/// Edges shorter than this give an unreliable direction.
pub const MIN_EDGE_LENGTH: f64 = 10.0;

/// Oriented selection built from one quadrilateral edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoiGeometry {
    pub centroid: Point2,
    pub edge_index: usize,
    pub selection: SelectionPolygon,
}

/// Build the band of `extension_width` pixels along the selected edge.
///
/// The edge is rescaled about its midpoint by `extension_length / 100`, then
/// offset along the unit normal. The normal is flipped toward the centroid
/// for inward bands and away from it otherwise, so the result does not
/// depend on the quadrilateral's winding.
pub fn build_selection(
    quad: &Quadrilateral,
    config: &PipelineConfig,
) -> Result<RoiGeometry, SkipReason> {
    let center = centroid(&quad.vertices).ok_or(SkipReason::DegenerateMoments)?;

    let edge_index = config.edge_index();
    let edge = quad.edge(edge_index);
    let length = edge.length();
    if length < MIN_EDGE_LENGTH {
        return Err(SkipReason::ShortEdge(length));
    }
    let mut normal = edge.unit_normal().ok_or(SkipReason::ZeroNormal)?;

    let mid = edge.midpoint();
    if (center - mid).dot(normal) < 0.0 {
        normal = normal * -1.0;
    }
    if !config.extend_inwards {
        normal = normal * -1.0;
    }

    let scale = config.length_scale();
    let start = mid + (edge.start - mid) * scale;
    let end = mid + (edge.end - mid) * scale;
    let offset = normal * config.extension_width as f64;

    Ok(RoiGeometry {
        centroid: center,
        edge_index,
        selection: SelectionPolygon {
            points: [start, end, end + offset, start + offset],
        },
    })
}
