use crate::geometry::{Geometry, Point};
use crate::math::distance_2d::point_to_segment_dist_sq;

/// Finds the segment of a geometry closest to a location.
///
/// Only consecutive vertices inside one line or ring form a segment.
/// Among equally close segments the first one in vertex order wins.
pub struct ClosestSegment<'a> {
    geometry: &'a Geometry,
    location: Point,
}

impl<'a> ClosestSegment<'a> {
    /// Creates a new `ClosestSegment` query.
    #[must_use]
    pub fn new(geometry: &'a Geometry, location: Point) -> Self {
        Self { geometry, location }
    }

    /// Returns the vertex numbers `(after - 1, after)` of the closest
    /// segment, or `None` if the geometry has no segments.
    #[must_use]
    pub fn execute(&self) -> Option<(usize, usize)> {
        let p = self.location.xy();
        let mut best: Option<(f64, usize)> = None;
        let mut offset = 0;
        for component in self.geometry.components() {
            let points = component.points();
            for (i, pair) in points.windows(2).enumerate() {
                let dist = point_to_segment_dist_sq(&p, &pair[0].xy(), &pair[1].xy());
                if best.is_none_or(|(d, _)| dist < d) {
                    best = Some((dist, offset + i + 1));
                }
            }
            offset += points.len();
        }
        best.map(|(_, after)| (after - 1, after))
    }
}
