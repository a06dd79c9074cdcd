pub mod binarize;
pub mod contours;
pub mod quads;

use image::GrayImage;
use tracing::{debug, info, instrument, warn};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, ProcessingError, Result};
use crate::frame::{ChannelSelect, RawImage};
use crate::models::Quadrilateral;
use crate::results::{ResultAggregator, RunResult};
use crate::roi::{build_selection, extract};

/// Detection and ROI extraction orchestrator.
///
/// Stateless between runs: every call takes a buffer and returns a fresh
/// [`RunResult`].
#[derive(Debug, Clone, Default)]
pub struct QuadRoiPipeline {
    pub config: PipelineConfig,
}

impl QuadRoiPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run on a raw caller buffer. Input and config errors come back as a
    /// failed [`RunResult`].
    #[instrument(skip_all, fields(width = raw.width, height = raw.height, channels = raw.channels))]
    pub fn run(&self, raw: &RawImage<'_>, select: ChannelSelect) -> RunResult {
        let agg = ResultAggregator::start();
        let gray = match raw.to_gray(select) {
            Ok(gray) => gray,
            Err(e) => return abort(agg, e.into()),
        };
        self.run_with(agg, &gray)
    }

    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn run_gray(&self, image: &GrayImage) -> RunResult {
        self.run_with(ResultAggregator::start(), image)
    }

    /// Stages 1-3: binarize, trace, filter.
    pub fn detect(&self, image: &GrayImage) -> Result<Vec<Quadrilateral>> {
        self.config.validate()?;

        let mask = binarize::binarize(image, &self.config);
        let contours = contours::find_external_contours(&mask);
        debug!(contours = contours.len(), "traced external contours");

        if let Some(limit) = self.config.max_contours {
            if contours.len() > limit {
                return Err(ProcessingError::TooManyContours {
                    found: contours.len(),
                    limit,
                }
                .into());
            }
        }

        let quads = quads::filter_quadrilaterals(&contours, &self.config);
        debug!(quadrilaterals = quads.len(), "filtered quadrilaterals");
        Ok(quads)
    }

    fn run_with(&self, mut agg: ResultAggregator, image: &GrayImage) -> RunResult {
        let quads = match self.detect(image) {
            Ok(quads) => quads,
            Err(e) => return abort(agg, e),
        };
        agg.set_quadrilateral_count(quads.len());

        for (i, quad) in quads.iter().enumerate() {
            let record = build_selection(quad, &self.config)
                .and_then(|geometry| extract(image, quad, &geometry, &self.config));
            match record {
                Ok(record) => {
                    debug!(
                        quad = i,
                        width = record.width,
                        height = record.height,
                        x = record.location.x,
                        y = record.location.y,
                        "extracted roi"
                    );
                    agg.push(record);
                }
                Err(reason) => warn!(quad = i, %reason, "skipping quadrilateral"),
            }
        }

        let run = agg.finish();
        info!(
            quadrilaterals = run.quadrilateral_count,
            rois = run.results.len(),
            elapsed_ms = run.elapsed.as_millis() as u64,
            "roi extraction complete"
        );
        run
    }
}

fn abort(agg: ResultAggregator, error: PipelineError) -> RunResult {
    warn!(%error, "run aborted");
    agg.fail(error)
}
