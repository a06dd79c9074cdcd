use std::time::{Duration, Instant};

use serde::Serialize;

use crate::models::{Point2, RoiLocation, RoiRecord};

/// Outcome of one pipeline invocation.
///
/// `success` is false only when the run aborted before per-quadrilateral
/// processing; in that case `results` is empty and `error` holds the message.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub results: Vec<RoiRecord>,
    pub success: bool,
    pub error: Option<String>,
    /// Quadrilaterals accepted by the filter, including any later skipped.
    pub quadrilateral_count: usize,
    pub elapsed: Duration,
}

impl RunResult {
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            success: self.success,
            error: self.error.clone(),
            quadrilateral_count: self.quadrilateral_count,
            roi_count: self.results.len(),
            elapsed_ms: self.elapsed.as_secs_f64() * 1000.0,
            rois: self.results.iter().map(RoiSummary::from).collect(),
        }
    }
}

/// Pixel-free view of a [`RunResult`] for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub quadrilateral_count: usize,
    pub roi_count: usize,
    pub elapsed_ms: f64,
    pub rois: Vec<RoiSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoiSummary {
    pub width: u32,
    pub height: u32,
    pub center: Point2,
    pub edge_index: usize,
    pub quadrilateral: [Point2; 4],
    pub selection: [Point2; 4],
    pub location: RoiLocation,
    pub area: f64,
}

impl From<&RoiRecord> for RoiSummary {
    fn from(record: &RoiRecord) -> Self {
        Self {
            width: record.width,
            height: record.height,
            center: record.center,
            edge_index: record.edge_index,
            quadrilateral: record.quadrilateral,
            selection: record.selection,
            location: record.location,
            area: record.area,
        }
    }
}

/// Collects records in detection order and times the run from creation.
pub struct ResultAggregator {
    started: Instant,
    results: Vec<RoiRecord>,
    quadrilateral_count: usize,
}

impl ResultAggregator {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            results: Vec::new(),
            quadrilateral_count: 0,
        }
    }

    pub fn set_quadrilateral_count(&mut self, count: usize) {
        self.quadrilateral_count = count;
    }

    pub fn push(&mut self, record: RoiRecord) {
        self.results.push(record);
    }

    pub fn finish(self) -> RunResult {
        RunResult {
            results: self.results,
            success: true,
            error: None,
            quadrilateral_count: self.quadrilateral_count,
            elapsed: self.started.elapsed(),
        }
    }

    /// Abort: any collected records are discarded.
    pub fn fail(self, error: impl std::fmt::Display) -> RunResult {
        RunResult {
            results: Vec::new(),
            success: false,
            error: Some(error.to_string()),
            quadrilateral_count: 0,
            elapsed: self.started.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;

    fn record(edge_index: usize) -> RoiRecord {
        RoiRecord {
            image: GrayImage::new(4, 2),
            width: 4,
            height: 2,
            center: Point2::new(1.0, 1.0),
            edge_index,
            quadrilateral: [Point2::default(); 4],
            selection: [Point2::default(); 4],
            location: RoiLocation { x: 3, y: 4 },
            area: 12.0,
        }
    }

    #[test]
    fn finish_keeps_order_and_count() {
        let mut agg = ResultAggregator::start();
        agg.set_quadrilateral_count(3);
        agg.push(record(0));
        agg.push(record(2));
        let run = agg.finish();

        assert!(run.success);
        assert!(run.error.is_none());
        assert_eq!(run.quadrilateral_count, 3);
        assert_eq!(
            run.results.iter().map(|r| r.edge_index).collect::<Vec<_>>(),
            [0, 2]
        );
    }

    #[test]
    fn fail_discards_records() {
        let mut agg = ResultAggregator::start();
        agg.push(record(1));
        let run = agg.fail("boom");
        assert!(!run.success);
        assert_eq!(run.error.as_deref(), Some("boom"));
        assert!(run.results.is_empty());
    }

    #[test]
    fn summary_serializes_without_pixels() {
        let mut agg = ResultAggregator::start();
        agg.set_quadrilateral_count(1);
        agg.push(record(1));
        let json = serde_json::to_value(agg.finish().summary()).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["roi_count"], 1);
        assert_eq!(json["rois"][0]["location"]["x"], 3);
        assert!(json.get("error").is_none());
        assert!(json["rois"][0].get("image").is_none());
    }
}
