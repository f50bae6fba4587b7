use std::collections::HashSet;

use crate::geometry::{LineString, Point, VertexKey};

/// An undirected segment: the unordered pair of its end vertex keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentKey(VertexKey, VertexKey);

impl SegmentKey {
    #[must_use]
    pub fn new(a: VertexKey, b: VertexKey) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    #[must_use]
    pub fn between(a: &Point, b: &Point) -> Self {
        Self::new(a.key(), b.key())
    }
}

/// The set of undirected segments between consecutive points.
#[must_use]
pub fn line_segments(points: &[Point]) -> HashSet<SegmentKey> {
    points
        .windows(2)
        .map(|w| SegmentKey::between(&w[0], &w[1]))
        .collect()
}

/// Rebuilds the shared line from the trigger component.
///
/// Walks `trigger_part` and collects runs of consecutive points whose
/// segment is in `keep`, breaking a run after any point in `split_points`.
/// Returns the run holding `trigger`. For a ring whose walk starts and
/// ends inside the same run, the last and first runs are joined. Returns
/// `None` if `trigger` is not a kept segment of the walk.
#[must_use]
pub fn build_shared_line(
    trigger_part: &[Point],
    keep: &HashSet<SegmentKey>,
    trigger: SegmentKey,
    split_points: &HashSet<VertexKey>,
) -> Option<LineString> {
    let mut parts: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut trigger_in_part = None;

    for pair in trigger_part.windows(2) {
        let (vertex, next) = (pair[0], pair[1]);
        let segment = SegmentKey::between(&vertex, &next);

        if keep.contains(&segment) {
            if segment == trigger {
                trigger_in_part = Some(parts.len());
            }
            if current.is_empty() {
                current.push(vertex);
            }
            current.push(next);
        } else if !current.is_empty() {
            parts.push(std::mem::take(&mut current));
        }

        if split_points.contains(&next.key()) && !current.is_empty() {
            parts.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }

    let trigger_in_part = trigger_in_part?;
    let last = parts.len() - 1;
    if is_split_ring(&parts) && (trigger_in_part == 0 || trigger_in_part == last) {
        let mut joined = parts[last].clone();
        joined.extend_from_slice(&parts[0][1..]);
        return Some(LineString::new(joined));
    }
    parts.into_iter().nth(trigger_in_part).map(LineString::new)
}

/// A ring walk split in the middle has its first run start where its last
/// run ends.
fn is_split_ring(parts: &[Vec<Point>]) -> bool {
    match (parts.first().and_then(|p| p.first()), parts.last().and_then(|p| p.last())) {
        (Some(first), Some(last)) => parts.len() >= 2 && first.same_xy(last),
        _ => false,
    }
}
