use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::homography::Homography;
use crate::line::Line;
use crate::GridError;

/// Cells per board side.
pub const GRID_CELLS: usize = 8;

/// Canonical square side length.
pub const DEFAULT_SQUARE_SIZE: f64 = 100.0;

/// Inset margins of the piece region as fractions of the square size,
/// applied in the canonical plane before warping: top, right, bottom,
/// left. The wide bottom margin biases the region toward the square's
/// far edge, because a standing piece extends toward the camera. These
/// are empirical constants tied to the assumed camera elevation; do not
/// re-derive them.
pub const PIECE_MARGINS: [f64; 4] = [0.15, 0.15, 0.5, 0.15];

/// Pixel-space description of one board square.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SquareRegion {
    /// The square's four corners, same winding as the board corners.
    pub corners: [Point2<f64>; 4],
    /// Center of the square.
    pub center: Point2<f64>,
    /// Inset sub-region where a standing piece is expected.
    pub piece_region: [Point2<f64>; 4],
}

/// Segment a photographed board into its 64 squares.
///
/// `corners` are the four outer board corners in image pixels, wound the
/// same way as the canonical corners `(0,0), (0,L), (L,L), (L,0)`. The
/// squares come back in row-major `(i, j)` order, `i` outer, `j` inner,
/// both `0..8`, together with the homography used.
///
/// Fails before producing any square when the corner count is not four
/// or the corners are collinear / yield a non-invertible homography;
/// there is no partial board output.
pub fn segment_board(
    corners: &[Point2<f64>],
    square_size: f64,
) -> Result<(Vec<SquareRegion>, Homography), GridError> {
    let corners: &[Point2<f64>; 4] = corners
        .try_into()
        .map_err(|_| GridError::InvalidCornerCount(corners.len()))?;

    let homography = Homography::from_corners(corners, square_size)?;
    let s = square_size;
    let margins = PIECE_MARGINS.map(|fraction| fraction * s);

    let mut squares = Vec::with_capacity(GRID_CELLS * GRID_CELLS);
    for i in 0..GRID_CELLS {
        for j in 0..GRID_CELLS {
            let (i, j) = (i as f64, j as f64);
            let cell = [
                Point2::new(i * s, j * s),
                Point2::new(i * s, (j + 1.0) * s),
                Point2::new((i + 1.0) * s, (j + 1.0) * s),
                Point2::new((i + 1.0) * s, j * s),
            ];

            let inset = [
                Point2::new(cell[0].x + margins[0], cell[0].y + margins[1]),
                Point2::new(cell[1].x + margins[0], cell[1].y - margins[1]),
                Point2::new(cell[2].x - margins[2], cell[2].y - margins[3]),
                Point2::new(cell[3].x - margins[2], cell[3].y + margins[3]),
            ];

            let center = Point2::new((i + 0.5) * s, (j + 0.5) * s);

            squares.push(SquareRegion {
                corners: cell.map(|p| homography.inverse_warp(p)),
                center: homography.inverse_warp(center),
                piece_region: inset.map(|p| homography.inverse_warp(p)),
            });
        }
    }

    debug!("segmented board into {} squares", squares.len());
    Ok((squares, homography))
}

/// Segment a board given its four boundary lines instead of corners.
///
/// Corners are recovered by intersecting edge `k` with edge
/// `(k + 1) % 4` and truncating to integer pixels; parallel consecutive
/// edges fail with [`GridError::ParallelLines`].
pub fn segment_board_from_edges(
    edges: &[Line],
) -> Result<(Vec<SquareRegion>, Homography), GridError> {
    if edges.len() != 4 {
        return Err(GridError::InvalidEdgeCount(edges.len()));
    }

    let mut corners = Vec::with_capacity(4);
    for k in 0..4 {
        let p = edges[k].intersection(&edges[(k + 1) % 4])?;
        corners.push(Point2::new(p.x.trunc(), p.y.trunc()));
    }

    segment_board(&corners, DEFAULT_SQUARE_SIZE)
}
