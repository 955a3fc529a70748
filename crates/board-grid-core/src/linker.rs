use log::debug;

use crate::dsu::DisjointSet;
use crate::line::{Line, Segment};

/// Merge raw segments that belong to the same physical grid line.
///
/// `linkable` decides whether two segments lie on one line (geometric
/// colinearity / proximity, supplied by the caller); `reduce` collapses
/// a linked group into a single slope-intercept line. Every unordered
/// pair is tested once, which makes the predicate loop O(n²) in segment
/// count — the dominant cost of this stage.
///
/// Every segment ends up in exactly one group; a segment that links to
/// nothing forms a singleton group and is still reduced. Output order
/// follows group discovery order (ascending first-member index).
pub fn link_segments<P, R>(segments: &[Segment], mut linkable: P, mut reduce: R) -> Vec<Line>
where
    P: FnMut(&Segment, &Segment) -> bool,
    R: FnMut(&[Segment]) -> Line,
{
    let mut sets = DisjointSet::new(segments.len());
    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            if linkable(&segments[i], &segments[j]) {
                sets.union(i, j);
            }
        }
    }

    let groups = sets.groups();
    debug!(
        "linked {} segments into {} groups",
        segments.len(),
        groups.len()
    );

    groups
        .iter()
        .map(|group| {
            let members: Vec<Segment> = group.iter().map(|&k| segments[k]).collect();
            reduce(&members)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_member_line(group: &[Segment]) -> Line {
        group[0].line()
    }

    #[test]
    fn chains_link_transitively() {
        // 0 links 1, 1 links 2; 3 links nothing.
        let segments = [
            Segment::new(0, 0, 10, 0),
            Segment::new(12, 0, 20, 0),
            Segment::new(22, 0, 30, 0),
            Segment::new(0, 50, 0, 80),
        ];
        let adjacent = |a: &Segment, b: &Segment| {
            a.p1.y == b.p1.y && ((b.p1.x - a.p2.x).abs() <= 2 || (a.p1.x - b.p2.x).abs() <= 2)
        };
        let lines = link_segments(&segments, adjacent, first_member_line);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn unlinked_segments_become_singleton_lines() {
        let segments = [Segment::new(0, 0, 10, 0), Segment::new(0, 5, 10, 5)];
        let lines = link_segments(&segments, |_, _| false, first_member_line);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], segments[0].line());
        assert_eq!(lines[1], segments[1].line());
    }

    #[test]
    fn empty_input_yields_no_lines() {
        let lines = link_segments(&[], |_, _| true, first_member_line);
        assert!(lines.is_empty());
    }

    #[test]
    fn reducer_sees_whole_group() {
        let segments = [
            Segment::new(0, 0, 10, 0),
            Segment::new(10, 0, 20, 0),
            Segment::new(20, 0, 30, 0),
        ];
        let mut sizes = Vec::new();
        link_segments(
            &segments,
            |_, _| true,
            |group| {
                sizes.push(group.len());
                group[0].line()
            },
        );
        assert_eq!(sizes, vec![3]);
    }
}
