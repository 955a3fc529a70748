use std::f64::consts::PI;

use log::debug;

use crate::dsu::DisjointSet;
use crate::line::{Line, PolarLine};

/// Clustering radius in normalized polar space.
pub const CLUSTER_RADIUS: f64 = 0.02;

/// Distance between two *normalized* polar points (ρ scaled by the set
/// maximum, θ scaled by π).
///
/// Besides the direct Euclidean distance, a wrapped term compares one
/// point against the mirrored representation of the other
/// (`(ρ, θ) ≡ (−ρ, θ + π)`, which after normalization is `θ + 1`), so
/// duplicate detections that landed on opposite sides of the ambiguity
/// are still close. The metric is reflexive and symmetric.
pub fn wraparound_distance(a: &PolarLine, b: &PolarLine) -> f64 {
    let direct = (a.rho - b.rho).hypot(a.theta - b.theta);
    let dt = if a.theta < b.theta {
        b.theta - a.theta + 1.0
    } else {
        a.theta - b.theta + 1.0
    };
    let wrapped = (a.rho + b.rho).hypot(dt);
    direct.min(wrapped)
}

/// Collapse near-duplicate lines to one representative each.
///
/// Lines are converted to polar form, normalized (ρ by the maximum
/// absolute ρ in the set, θ by π) and clustered as connected components
/// under [`wraparound_distance`] with radius [`CLUSTER_RADIUS`]. A line
/// within the radius of nothing seeds its own cluster, so the result is
/// a partition: every input line lands in exactly one cluster, and each
/// cluster contributes its lowest-index member to the output, in
/// ascending cluster-id order.
///
/// Running the collapse on an already-collapsed set returns it
/// unchanged.
pub fn collapse_lines(lines: &[Line]) -> Vec<Line> {
    if lines.is_empty() {
        return Vec::new();
    }

    let mut polar: Vec<PolarLine> = lines.iter().map(Line::to_polar).collect();

    let max_rho = polar.iter().map(|p| p.rho.abs()).fold(0.0, f64::max);
    // All-zero ρ (every line through the origin) leaves ρ untouched.
    let rho_scale = if max_rho > 0.0 { max_rho } else { 1.0 };
    for p in &mut polar {
        p.rho /= rho_scale;
        p.theta /= PI;
    }

    let mut clusters = DisjointSet::new(polar.len());
    for i in 0..polar.len() {
        for j in (i + 1)..polar.len() {
            if wraparound_distance(&polar[i], &polar[j]) <= CLUSTER_RADIUS {
                clusters.union(i, j);
            }
        }
    }

    let groups = clusters.groups();
    debug!("collapsed {} lines into {} clusters", lines.len(), groups.len());

    // Groups are first-occurrence ordered with ascending members, so the
    // first member is the smallest original index.
    groups.iter().map(|group| lines[group[0]]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn distance_is_reflexive_and_symmetric() {
        let points = [
            PolarLine {
                rho: 0.3,
                theta: 0.1,
            },
            PolarLine {
                rho: -0.8,
                theta: 0.9,
            },
            PolarLine {
                rho: 0.0,
                theta: 0.5,
            },
        ];
        for a in &points {
            assert_relative_eq!(wraparound_distance(a, a), 0.0);
            for b in &points {
                assert_relative_eq!(wraparound_distance(a, b), wraparound_distance(b, a));
            }
        }
    }

    #[test]
    fn near_duplicates_collapse_to_first_occurrence() {
        let lines = [
            Line::Slanted {
                slope: 1.0,
                intercept: 100.0,
            },
            Line::Slanted {
                slope: 1.001,
                intercept: 100.2,
            },
            Line::Slanted {
                slope: -1.0,
                intercept: 50.0,
            },
        ];
        let collapsed = collapse_lines(&lines);
        assert_eq!(collapsed, vec![lines[0], lines[2]]);
    }

    #[test]
    fn collapse_is_idempotent_on_separated_set() {
        let lines = [
            Line::Slanted {
                slope: 0.0,
                intercept: 0.0,
            },
            Line::Slanted {
                slope: 0.0,
                intercept: 100.0,
            },
            Line::Vertical { x: 50.0 },
            Line::Vertical { x: 150.0 },
        ];
        let once = collapse_lines(&lines);
        assert_eq!(once, lines.to_vec());
        let twice = collapse_lines(&once);
        assert_eq!(twice, once);
    }

    #[test]
    fn every_output_line_is_an_input_line() {
        let lines: Vec<Line> = (0..10)
            .map(|k| Line::Slanted {
                slope: 0.1 * k as f64,
                intercept: 10.0 * k as f64,
            })
            .collect();
        let collapsed = collapse_lines(&lines);
        assert!(!collapsed.is_empty());
        assert!(collapsed.iter().all(|l| lines.contains(l)));
    }

    #[test]
    fn empty_input_is_fine() {
        assert!(collapse_lines(&[]).is_empty());
    }
}
