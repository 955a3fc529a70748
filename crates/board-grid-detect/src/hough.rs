//! Progressive probabilistic Hough transform over a binary edge map.
//!
//! Edge pixels vote into a (rho, theta) accumulator one at a time, in
//! scan order so the result is deterministic. As soon as a pixel's vote
//! pushes one of its bins past the vote threshold, the line through
//! that bin is walked in both directions, bridging gaps up to a limit;
//! the walked pixels are consumed (removed from the edge map and
//! un-voted) and the span is emitted as a segment when long enough.

use std::f64::consts::PI;

use board_grid_core::Segment;
use image::GrayImage;
use serde::{Deserialize, Serialize};

const THETA_BINS: usize = 180;

/// Probabilistic Hough tuning knobs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HoughParams {
    /// Minimum accumulator votes before a line is considered.
    pub votes_threshold: u32,
    /// Minimum emitted segment length in pixels.
    pub min_length: f64,
    /// Maximum run of off-pixels bridged while walking a line.
    pub max_gap: u32,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            votes_threshold: 40,
            min_length: 50.0,
            max_gap: 15,
        }
    }
}

/// Detect line segments in a binary edge map (non-zero = edge).
///
/// An empty or edge-free map yields an empty list, not an error.
pub fn detect_segments(edges: &GrayImage, params: &HoughParams) -> Vec<Segment> {
    let (w, h) = edges.dimensions();
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let (sin_t, cos_t): (Vec<f64>, Vec<f64>) = (0..THETA_BINS)
        .map(|t| (t as f64 * PI / THETA_BINS as f64).sin_cos())
        .unzip();

    let max_rho = ((w * w + h * h) as f64).sqrt().ceil() as i64;
    let rho_bins = (2 * max_rho + 1) as usize;
    let mut acc = vec![0u32; THETA_BINS * rho_bins];

    let mut mask: Vec<bool> = edges.pixels().map(|p| p[0] > 0).collect();
    let mut voted = vec![false; mask.len()];

    let bin_index = |t: usize, rho: f64| -> usize {
        let r = rho.round() as i64 + max_rho;
        t * rho_bins + r as usize
    };

    let mut segments = Vec::new();

    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let idx = (y as u32 * w + x as u32) as usize;
            if !mask[idx] {
                continue;
            }

            // Vote across all orientations and remember the best bin
            // this pixel participates in.
            let mut best = (0usize, 0u32);
            for t in 0..THETA_BINS {
                let rho = x as f64 * cos_t[t] + y as f64 * sin_t[t];
                let bin = bin_index(t, rho);
                acc[bin] += 1;
                if acc[bin] > best.1 {
                    best = (t, acc[bin]);
                }
            }
            voted[idx] = true;

            if best.1 < params.votes_threshold {
                continue;
            }

            // Walk along the line direction (perpendicular to the
            // normal angle theta) from this pixel outward.
            let (dir_x, dir_y) = (-sin_t[best.0], cos_t[best.0]);
            let mut span = vec![(x, y)];
            let mut ends = [(x, y); 2];
            for (side, sign) in [1.0f64, -1.0].iter().enumerate() {
                let (mut fx, mut fy) = (x as f64, y as f64);
                let mut gap = 0u32;
                let mut last = (x, y);
                loop {
                    fx += sign * dir_x;
                    fy += sign * dir_y;
                    let (xi, yi) = (fx.round() as i32, fy.round() as i32);
                    if xi < 0 || yi < 0 || xi >= w as i32 || yi >= h as i32 {
                        break;
                    }
                    if mask[(yi as u32 * w + xi as u32) as usize] {
                        last = (xi, yi);
                        gap = 0;
                        span.push((xi, yi));
                    } else {
                        gap += 1;
                        if gap > params.max_gap {
                            break;
                        }
                    }
                }
                ends[side] = last;
            }

            // Consume the walked pixels so they support no further
            // lines, removing any votes they already cast.
            for &(px, py) in &span {
                let i = (py as u32 * w + px as u32) as usize;
                if !mask[i] {
                    continue;
                }
                mask[i] = false;
                if voted[i] {
                    for t in 0..THETA_BINS {
                        let rho = px as f64 * cos_t[t] + py as f64 * sin_t[t];
                        acc[bin_index(t, rho)] -= 1;
                    }
                    voted[i] = false;
                }
            }

            let (dx, dy) = (
                (ends[1].0 - ends[0].0) as f64,
                (ends[1].1 - ends[0].1) as f64,
            );
            if dx.hypot(dy) >= params.min_length {
                segments.push(Segment::new(ends[0].0, ends[0].1, ends[1].0, ends[1].1));
            }
        }
    }

    segments
}
