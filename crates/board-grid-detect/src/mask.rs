//! Isolate a quadrilateral-shaped pixel region.
//!
//! Each quadrilateral edge contributes one half-plane test; a pixel is
//! interior iff it passes all four. The inequality direction per edge
//! comes from a small fixed strategy table keyed on the edge position
//! and its slope sign.

use board_grid_core::{GridError, Line};
use image::RgbImage;
use nalgebra::Point2;

/// One half-plane membership test.
#[derive(Clone, Copy, Debug)]
enum HalfPlane {
    /// `y < slope * x + intercept`.
    Below { slope: f64, intercept: f64 },
    /// `y > slope * x + intercept`.
    Above { slope: f64, intercept: f64 },
    /// `x > threshold`.
    RightOf { x: f64 },
    /// `x < threshold`.
    LeftOf { x: f64 },
}

impl HalfPlane {
    fn contains(&self, x: f64, y: f64) -> bool {
        match *self {
            HalfPlane::Below { slope, intercept } => y < slope * x + intercept,
            HalfPlane::Above { slope, intercept } => y > slope * x + intercept,
            HalfPlane::RightOf { x: threshold } => x > threshold,
            HalfPlane::LeftOf { x: threshold } => x < threshold,
        }
    }
}

/// Interior test for edge `k`, assuming the winding order the caller
/// contracted to provide.
///
/// Edges 0 and 2 pick their inequality from the slope sign (or the
/// vertical sentinel); edges 1 and 3 are fixed below/above tests and
/// cannot be vertical under a valid winding, so a vertical line there
/// fails fast instead of masking nonsense.
fn edge_rule(k: usize, line: Line) -> Result<HalfPlane, GridError> {
    match (k, line) {
        (0, Line::Vertical { x }) => Ok(HalfPlane::RightOf { x }),
        (0, Line::Slanted { slope, intercept }) => Ok(if slope > 0.0 {
            HalfPlane::Below { slope, intercept }
        } else {
            HalfPlane::Above { slope, intercept }
        }),
        (2, Line::Vertical { x }) => Ok(HalfPlane::LeftOf { x }),
        (2, Line::Slanted { slope, intercept }) => Ok(if slope > 0.0 {
            HalfPlane::Above { slope, intercept }
        } else {
            HalfPlane::Below { slope, intercept }
        }),
        (1, Line::Slanted { slope, intercept }) => Ok(HalfPlane::Below { slope, intercept }),
        (3, Line::Slanted { slope, intercept }) => Ok(HalfPlane::Above { slope, intercept }),
        (k, _) => Err(GridError::MalformedQuadrilateral(k)),
    }
}

/// Zero every pixel outside the quadrilateral spanned by `points`.
///
/// `points` must be in a consistent winding order forming a simple
/// quadrilateral, the same winding the board segmentation uses; with an
/// inconsistent winding the mask is meaningless (the detectable case,
/// a vertical edge in position 1 or 3, fails with
/// [`GridError::MalformedQuadrilateral`]).
pub fn mask_quadrilateral(
    points: &[Point2<f64>; 4],
    img: &RgbImage,
) -> Result<RgbImage, GridError> {
    let mut rules = [HalfPlane::RightOf { x: 0.0 }; 4];
    for k in 0..4 {
        rules[k] = edge_rule(k, Line::through(points[k], points[(k + 1) % 4]))?;
    }

    let mut out = RgbImage::new(img.width(), img.height());
    for (x, y, pixel) in img.enumerate_pixels() {
        let (xf, yf) = (x as f64, y as f64);
        if rules.iter().all(|rule| rule.contains(xf, yf)) {
            out.put_pixel(x, y, *pixel);
        }
    }
    Ok(out)
}
