//! Default collaborators for the segment linker: a geometric
//! linkability predicate and a least-squares group reducer.

use std::f64::consts::PI;

use board_grid_core::{Line, Segment};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Tolerances deciding whether two segments lie on one physical line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkParams {
    /// Maximum undirected orientation difference in radians.
    pub max_angle_diff: f64,
    /// Maximum perpendicular distance between a segment's midpoint and
    /// the other segment's carrying line.
    pub max_perpendicular_dist: f64,
    /// Maximum gap between the segments along their shared direction.
    pub max_endpoint_gap: f64,
}

impl Default for LinkParams {
    fn default() -> Self {
        Self {
            max_angle_diff: 5.0_f64.to_radians(),
            max_perpendicular_dist: 8.0,
            max_endpoint_gap: 50.0,
        }
    }
}

/// Undirected angle difference in `[0, π/2]`.
fn axis_angle_diff(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(PI);
    diff.min(PI - diff)
}

/// Whether two raw segments belong to the same physical grid line:
/// nearly parallel, mutually close to each other's carrying line, and
/// either overlapping along the shared direction or separated by a
/// small endpoint gap.
pub fn linkable(a: &Segment, b: &Segment, params: &LinkParams) -> bool {
    if axis_angle_diff(a.orientation(), b.orientation()) > params.max_angle_diff {
        return false;
    }

    let offset = a
        .line()
        .distance_to(b.midpoint())
        .max(b.line().distance_to(a.midpoint()));
    if offset > params.max_perpendicular_dist {
        return false;
    }

    axis_gap(a, b) <= params.max_endpoint_gap
}

/// Gap between the two segments projected onto `a`'s direction; zero
/// when the projections overlap.
fn axis_gap(a: &Segment, b: &Segment) -> f64 {
    let theta = a.orientation();
    let (sin_t, cos_t) = theta.sin_cos();
    let project = |p: Point2<f64>| p.x * cos_t + p.y * sin_t;

    let ends = |s: &Segment| {
        let t1 = project(Point2::new(s.p1.x as f64, s.p1.y as f64));
        let t2 = project(Point2::new(s.p2.x as f64, s.p2.y as f64));
        (t1.min(t2), t1.max(t2))
    };

    let (a_lo, a_hi) = ends(a);
    let (b_lo, b_hi) = ends(b);
    (a_lo.max(b_lo) - a_hi.min(b_hi)).max(0.0)
}

/// Reduce a group of colinear segments to one representative line via a
/// total-least-squares fit through all endpoints.
///
/// The principal direction comes from the 2x2 endpoint covariance; a
/// near-vertical principal direction yields the vertical sentinel
/// through the group's mean x.
pub fn fit_group(group: &[Segment]) -> Line {
    let mut points: Vec<Point2<f64>> = Vec::with_capacity(group.len() * 2);
    for s in group {
        points.push(Point2::new(s.p1.x as f64, s.p1.y as f64));
        points.push(Point2::new(s.p2.x as f64, s.p2.y as f64));
    }

    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for p in &points {
        let (dx, dy) = (p.x - cx, p.y - cy);
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    // Principal axis of the covariance matrix (largest eigenvalue).
    let theta = 0.5 * (2.0 * sxy).atan2(sxx - syy);
    let (dir_y, dir_x) = theta.sin_cos();

    if dir_x.abs() < 1e-6 {
        Line::Vertical { x: cx }
    } else {
        let slope = dir_y / dir_x;
        Line::Slanted {
            slope,
            intercept: cy - slope * cx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn collinear_segments_with_small_gap_link() {
        let a = Segment::new(0, 0, 100, 0);
        let b = Segment::new(120, 1, 220, 1);
        assert!(linkable(&a, &b, &LinkParams::default()));
    }

    #[test]
    fn perpendicular_segments_do_not_link() {
        let a = Segment::new(0, 0, 100, 0);
        let b = Segment::new(50, -50, 50, 50);
        assert!(!linkable(&a, &b, &LinkParams::default()));
    }

    #[test]
    fn parallel_but_offset_segments_do_not_link() {
        let a = Segment::new(0, 0, 100, 0);
        let b = Segment::new(0, 30, 100, 30);
        assert!(!linkable(&a, &b, &LinkParams::default()));
    }

    #[test]
    fn distant_collinear_segments_do_not_link() {
        let a = Segment::new(0, 0, 100, 0);
        let b = Segment::new(300, 0, 400, 0);
        assert!(!linkable(&a, &b, &LinkParams::default()));
    }

    #[test]
    fn overlapping_segments_have_zero_gap() {
        let a = Segment::new(0, 0, 100, 0);
        let b = Segment::new(50, 0, 150, 0);
        assert_relative_eq!(axis_gap(&a, &b), 0.0);
    }

    #[test]
    fn fit_recovers_slanted_line() {
        let group = [Segment::new(0, 1, 10, 21), Segment::new(20, 41, 30, 61)];
        match fit_group(&group) {
            Line::Slanted { slope, intercept } => {
                assert_relative_eq!(slope, 2.0, epsilon = 1e-9);
                assert_relative_eq!(intercept, 1.0, epsilon = 1e-9);
            }
            other => panic!("expected slanted line, got {other:?}"),
        }
    }

    #[test]
    fn fit_recovers_vertical_line() {
        let group = [Segment::new(7, 0, 7, 50), Segment::new(7, 60, 7, 120)];
        match fit_group(&group) {
            Line::Vertical { x } => assert_relative_eq!(x, 7.0),
            other => panic!("expected vertical line, got {other:?}"),
        }
    }
}
