//! One-call detection pipeline: extract, link, collapse.

use board_grid_core::{collapse_lines, link_segments, Line};
use image::GrayImage;
use log::info;
use serde::{Deserialize, Serialize};

use crate::extract::{extract_lines, ExtractParams};
use crate::linking::{fit_group, linkable, LinkParams};

/// Parameters for the full grid-line detection pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectParams {
    pub extract: ExtractParams,
    pub link: LinkParams,
}

/// Detect the distinct grid lines of a photographed chessboard.
///
/// Runs the multi-pass extractor, links segments that belong to one
/// physical line, and collapses duplicate detections in polar space.
/// The whole computation is synchronous and deterministic for a given
/// image and parameter set.
pub fn detect_grid_lines(gray: &GrayImage, params: &DetectParams) -> Vec<Line> {
    let segments = extract_lines(gray, &params.extract);
    let linked = link_segments(
        &segments,
        |a, b| linkable(a, b, &params.link),
        fit_group,
    );
    let lines = collapse_lines(&linked);
    info!(
        "{} raw segments -> {} linked -> {} distinct grid lines",
        segments.len(),
        linked.len(),
        lines.len()
    );
    lines
}
