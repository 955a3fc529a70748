use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::GridError;

/// Slopes closer than this are treated as equal (parallel lines),
/// x-spans smaller than this make a line vertical.
const SLOPE_EPS: f64 = 1e-9;

/// A raw line segment as reported by the detector.
///
/// Endpoints are integer pixel positions; a segment is never mutated
/// after detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub p1: Point2<i32>,
    pub p2: Point2<i32>,
}

impl Segment {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            p1: Point2::new(x1, y1),
            p2: Point2::new(x2, y2),
        }
    }

    pub fn length(&self) -> f64 {
        let dx = (self.p2.x - self.p1.x) as f64;
        let dy = (self.p2.y - self.p1.y) as f64;
        dx.hypot(dy)
    }

    pub fn midpoint(&self) -> Point2<f64> {
        Point2::new(
            (self.p1.x + self.p2.x) as f64 / 2.0,
            (self.p1.y + self.p2.y) as f64 / 2.0,
        )
    }

    /// Undirected orientation in `[0, π)`.
    pub fn orientation(&self) -> f64 {
        let dy = (self.p2.y - self.p1.y) as f64;
        let dx = (self.p2.x - self.p1.x) as f64;
        let mut theta = dy.atan2(dx);
        if theta < 0.0 {
            theta += std::f64::consts::PI;
        }
        if theta >= std::f64::consts::PI {
            theta -= std::f64::consts::PI;
        }
        theta
    }

    /// The infinite line carrying this segment.
    pub fn line(&self) -> Line {
        Line::through(
            Point2::new(self.p1.x as f64, self.p1.y as f64),
            Point2::new(self.p2.x as f64, self.p2.y as f64),
        )
    }
}

/// An infinite line in slope-intercept form, with a dedicated sentinel
/// for vertical lines where the slope is undefined.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Line {
    /// `y = slope * x + intercept`.
    Slanted { slope: f64, intercept: f64 },
    /// `x = const`.
    Vertical { x: f64 },
}

/// Polar form of an undirected line: `x cos θ + y sin θ = ρ`.
///
/// The representation `(ρ, θ)` describes the same line as `(−ρ, θ + π)`;
/// [`crate::wraparound_distance`] accounts for that ambiguity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolarLine {
    pub rho: f64,
    pub theta: f64,
}

impl Line {
    /// The line through two points (`getLine`).
    pub fn through(p1: Point2<f64>, p2: Point2<f64>) -> Self {
        if (p1.x - p2.x).abs() < SLOPE_EPS {
            Line::Vertical { x: p1.x }
        } else {
            let slope = (p2.y - p1.y) / (p2.x - p1.x);
            let intercept = p1.y - slope * p1.x;
            Line::Slanted { slope, intercept }
        }
    }

    /// Where this line crosses `other`.
    ///
    /// Parallel input (including two vertical lines) fails with
    /// [`GridError::ParallelLines`]; a coordinate is never NaN.
    pub fn intersection(&self, other: &Line) -> Result<Point2<f64>, GridError> {
        match (*self, *other) {
            (Line::Vertical { .. }, Line::Vertical { .. }) => Err(GridError::ParallelLines),
            (Line::Vertical { x }, Line::Slanted { slope, intercept }) => {
                Ok(Point2::new(x, slope * x + intercept))
            }
            (Line::Slanted { slope, intercept }, Line::Vertical { x }) => {
                Ok(Point2::new(x, slope * x + intercept))
            }
            (
                Line::Slanted {
                    slope: a1,
                    intercept: b1,
                },
                Line::Slanted {
                    slope: a2,
                    intercept: b2,
                },
            ) => {
                if (a1 - a2).abs() < SLOPE_EPS {
                    return Err(GridError::ParallelLines);
                }
                let x = (b2 - b1) / (a1 - a2);
                Ok(Point2::new(x, a1 * x + b1))
            }
        }
    }

    /// Perpendicular distance from a point to this line.
    pub fn distance_to(&self, p: Point2<f64>) -> f64 {
        match *self {
            Line::Vertical { x } => (p.x - x).abs(),
            Line::Slanted { slope, intercept } => {
                (slope * p.x - p.y + intercept).abs() / slope.hypot(1.0)
            }
        }
    }

    /// Convert to polar form with `θ ∈ [0, π)`.
    ///
    /// Vertical lines map to `θ = 0, ρ = x`; a slanted line `y = ax + b`
    /// maps to the normal `(-a, 1) / √(a² + 1)`, which keeps `sin θ > 0`.
    /// The conversion is deterministic and invertible via
    /// [`Line::from_polar`].
    pub fn to_polar(&self) -> PolarLine {
        match *self {
            Line::Vertical { x } => PolarLine { rho: x, theta: 0.0 },
            Line::Slanted { slope, intercept } => {
                let norm = slope.hypot(1.0);
                PolarLine {
                    rho: intercept / norm,
                    theta: 1.0_f64.atan2(-slope),
                }
            }
        }
    }

    /// Inverse of [`Line::to_polar`].
    pub fn from_polar(p: &PolarLine) -> Self {
        let (sin_t, cos_t) = p.theta.sin_cos();
        if sin_t.abs() < SLOPE_EPS {
            Line::Vertical { x: p.rho / cos_t }
        } else {
            Line::Slanted {
                slope: -cos_t / sin_t,
                intercept: p.rho / sin_t,
            }
        }
    }
}
