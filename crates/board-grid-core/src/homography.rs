use nalgebra::{Matrix3, Point2, SMatrix, SVector, Vector3};
use serde::{Deserialize, Serialize};

use crate::GridError;

/// Doubled triangle areas below this count as collinear corner triples.
const COLLINEAR_EPS: f64 = 1e-6;

/// Projective transform from photograph pixels to the canonical board
/// plane (side `8 * square_size`), plus its precomputed inverse.
///
/// One homography is computed per board and shared read-only by all 64
/// square computations.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Homography {
    h: Matrix3<f64>,
    h_inv: Matrix3<f64>,
}

impl Homography {
    /// Fit the homography mapping the four image-space board `corners`
    /// onto the canonical square corners
    /// `(0,0), (0,L), (L,L), (L,0)` with `L = 8 * square_size`.
    ///
    /// Corner order must match that canonical winding. Fails with
    /// [`GridError::DegenerateCorners`] when any three corners are
    /// collinear and [`GridError::SingularHomography`] when the fit is
    /// not invertible, before any square math runs.
    pub fn from_corners(corners: &[Point2<f64>; 4], square_size: f64) -> Result<Self, GridError> {
        if !(square_size > 0.0) {
            return Err(GridError::InvalidSquareSize(square_size));
        }
        check_no_collinear_triple(corners)?;

        let l = 8.0 * square_size;
        let canonical = [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, l),
            Point2::new(l, l),
            Point2::new(l, 0.0),
        ];

        let h = solve_four_point(corners, &canonical).ok_or(GridError::SingularHomography)?;
        let h_inv = h.try_inverse().ok_or(GridError::SingularHomography)?;
        Ok(Self { h, h_inv })
    }

    /// Image pixel -> canonical board plane.
    pub fn apply(&self, p: Point2<f64>) -> Point2<f64> {
        project(&self.h, p)
    }

    /// Canonical board plane -> image pixel (`inverseWarpPoint`).
    pub fn inverse_warp(&self, p: Point2<f64>) -> Point2<f64> {
        project(&self.h_inv, p)
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.h
    }
}

fn project(h: &Matrix3<f64>, p: Point2<f64>) -> Point2<f64> {
    let v = h * Vector3::new(p.x, p.y, 1.0);
    Point2::new(v[0] / v[2], v[1] / v[2])
}

fn check_no_collinear_triple(corners: &[Point2<f64>; 4]) -> Result<(), GridError> {
    for skip in 0..4 {
        let tri: Vec<&Point2<f64>> = corners
            .iter()
            .enumerate()
            .filter(|&(k, _)| k != skip)
            .map(|(_, p)| p)
            .collect();
        let cross = (tri[1].x - tri[0].x) * (tri[2].y - tri[0].y)
            - (tri[1].y - tri[0].y) * (tri[2].x - tri[0].x);
        if cross.abs() < COLLINEAR_EPS {
            return Err(GridError::DegenerateCorners);
        }
    }
    Ok(())
}

/// Direct linear transform for exactly four correspondences.
///
/// With `h33` pinned to 1 the eight remaining entries satisfy, for each
/// pair `(x, y) -> (u, v)`:
///
/// ```text
/// h11 x + h12 y + h13 - u h31 x - u h32 y = u
/// h21 x + h22 y + h23 - v h31 x - v h32 y = v
/// ```
fn solve_four_point(src: &[Point2<f64>; 4], dst: &[Point2<f64>; 4]) -> Option<Matrix3<f64>> {
    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();

    for k in 0..4 {
        let (x, y) = (src[k].x, src[k].y);
        let (u, v) = (dst[k].x, dst[k].y);

        let r0 = 2 * k;
        a[(r0, 0)] = x;
        a[(r0, 1)] = y;
        a[(r0, 2)] = 1.0;
        a[(r0, 6)] = -u * x;
        a[(r0, 7)] = -u * y;
        b[r0] = u;

        let r1 = r0 + 1;
        a[(r1, 3)] = x;
        a[(r1, 4)] = y;
        a[(r1, 5)] = 1.0;
        a[(r1, 6)] = -v * x;
        a[(r1, 7)] = -v * y;
        b[r1] = v;
    }

    let x = a.lu().solve(&b)?;
    Some(Matrix3::new(
        x[0], x[1], x[2], //
        x[3], x[4], x[5], //
        x[6], x[7], 1.0,
    ))
}
